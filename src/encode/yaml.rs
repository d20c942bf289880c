use tracing::instrument;

use super::mapping::{MappingDocument, entry_fields};
use crate::error::Result;
use crate::model::{EntityModel, Value};

/// Encodes the model as YAML.
///
/// The verbose form is a block-style document. The minified form is a single
/// flow mapping of the same shape.
#[instrument(level = "debug", skip(model))]
pub fn encode(model: &EntityModel, minified: bool) -> Result<String> {
    let document = MappingDocument::new(model);
    if minified {
        Ok(flow_document(&document))
    } else {
        Ok(serde_yaml_ng::to_string(&document)?)
    }
}

fn flow_document(document: &MappingDocument<'_>) -> String {
    let mut out = String::from("{");
    for (level_index, (level, records)) in document.levels().iter().enumerate() {
        if level_index > 0 {
            out.push(',');
        }
        out.push_str(level.name());
        out.push_str(": {");
        for (record_index, record) in records.iter().enumerate() {
            if record_index > 0 {
                out.push(',');
            }
            out.push_str(&record.id.to_string());
            out.push_str(": {");
            for (field_index, (name, value)) in entry_fields(record).enumerate() {
                if field_index > 0 {
                    out.push(',');
                }
                out.push_str(name);
                out.push_str(": ");
                push_scalar(&mut out, value);
            }
            out.push('}');
        }
        out.push('}');
    }
    out.push_str("}\n");
    out
}

fn push_scalar(out: &mut String, value: Value<'_>) {
    match value {
        Value::Int(number) => out.push_str(&number.to_string()),
        Value::Text(text) => push_quoted(out, text),
    }
}

/// Writes `text` as a double-quoted scalar. Characters outside YAML's
/// printable set, line breaks and the byte order mark are written as escapes.
fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            ch if is_plain_printable(ch) => out.push(ch),
            ch if u32::from(ch) <= 0xFF => out.push_str(&format!("\\x{:02X}", u32::from(ch))),
            ch if u32::from(ch) <= 0xFFFF => out.push_str(&format!("\\u{:04X}", u32::from(ch))),
            ch => out.push_str(&format!("\\U{:08X}", u32::from(ch))),
        }
    }
    out.push('"');
}

fn is_plain_printable(ch: char) -> bool {
    matches!(
        ch,
        ' '..='~'
            | '\u{A0}'..='\u{2027}'
            | '\u{202A}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FEFE}'
            | '\u{FF00}'..='\u{FFFD}'
    ) || u32::from(ch) >= 0x10000
}
