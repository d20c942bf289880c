use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::instrument;

use crate::decode::FLAT_COLUMNS;
use crate::error::{DtbError, Result};
use crate::model::EntityModel;

/// Encodes the flat rows as comma-separated values.
///
/// The verbose form quotes every non-numeric field; the minified form only
/// quotes fields that need escaping. Rows without a sub-district simply have
/// fewer fields.
#[instrument(level = "debug", skip(model), fields(rows = model.flat_rows().len()))]
pub fn encode(model: &EntityModel, minified: bool) -> Result<String> {
    let quote_style = if minified {
        QuoteStyle::Necessary
    } else {
        QuoteStyle::NonNumeric
    };
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .quote_style(quote_style)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(FLAT_COLUMNS)?;
    for row in model.flat_rows() {
        writer.write_record(row.flat_values().iter().map(ToString::to_string))?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|err| DtbError::Io(err.into_error()))?;
    Ok(String::from_utf8(buffer)?)
}
