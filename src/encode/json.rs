use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::instrument;

use super::mapping::MappingDocument;
use crate::error::Result;
use crate::model::EntityModel;

const INDENT: &[u8] = b"    ";

/// Encodes the model as a JSON object keyed by level, then by entity id.
#[instrument(level = "debug", skip(model))]
pub fn encode(model: &EntityModel, minified: bool) -> Result<String> {
    let document = MappingDocument::new(model);
    if minified {
        return Ok(serde_json::to_string(&document)?);
    }

    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(String::from_utf8(buffer)?)
}
