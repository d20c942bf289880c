use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::instrument;

use super::DATASET_NAME;
use crate::error::Result;
use crate::model::{EntityModel, Level};

const ENTITY_ELEMENT: &str = "row";
const FIELD_ELEMENT: &str = "field";
const INDENT_SIZE: usize = 4;

/// Encodes the model as an XML document.
///
/// ```text
/// <dtb>
///     <!-- uf -->
///     <uf>
///         <row>
///             <field name="id">11</field>
///             <field name="nome">Rondônia</field>
///         </row>
///     </uf>
/// </dtb>
/// ```
#[instrument(level = "debug", skip(model))]
pub fn encode(model: &EntityModel, minified: bool) -> Result<String> {
    let mut writer = if minified {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(DATASET_NAME)))?;
    for level in Level::ALL {
        write_level(&mut writer, model, level, minified)?;
    }
    writer.write_event(Event::End(BytesEnd::new(DATASET_NAME)))?;

    let mut buffer = writer.into_inner();
    if !minified {
        buffer.push(b'\n');
    }
    Ok(String::from_utf8(buffer)?)
}

fn write_level(
    writer: &mut Writer<Vec<u8>>,
    model: &EntityModel,
    level: Level,
    minified: bool,
) -> Result<()> {
    if !minified {
        let comment = format!(" {} ", level.name());
        writer.write_event(Event::Comment(BytesText::new(&comment)))?;
    }

    writer.write_event(Event::Start(BytesStart::new(level.name())))?;
    for record in model.records(level) {
        writer.write_event(Event::Start(BytesStart::new(ENTITY_ELEMENT)))?;
        for (name, value) in record.fields() {
            let text = value.to_string();
            let start = BytesStart::new(FIELD_ELEMENT).with_attributes([("name", name)]);
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(FIELD_ELEMENT)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(ENTITY_ELEMENT)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(level.name())))?;
    Ok(())
}
