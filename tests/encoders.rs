mod common;

use std::collections::BTreeMap;

use dtb_export::encode::{delimited, document, json, relational, yaml};
use dtb_export::model::{EntityModel, Level, Value};
use dtb_export::normalize::build_model;
use pretty_assertions::assert_eq;

type LevelFields = BTreeMap<i64, BTreeMap<String, String>>;

fn expected_fields(model: &EntityModel, level: Level) -> LevelFields {
    model
        .records(level)
        .iter()
        .map(|record| {
            let fields: BTreeMap<String, String> = record
                .fields()
                .skip(1)
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            (record.id, fields)
        })
        .collect()
}

fn json_fields(json: &serde_json::Value, level: Level) -> LevelFields {
    json[level.name()]
        .as_object()
        .expect("level object")
        .iter()
        .map(|(id, fields)| {
            let fields: BTreeMap<String, String> = fields
                .as_object()
                .expect("entity object")
                .iter()
                .map(|(name, value)| {
                    let text = match value {
                        serde_json::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    (name.clone(), text)
                })
                .collect();
            (id.parse::<i64>().expect("numeric key"), fields)
        })
        .collect()
}

fn xml_fields(xml: &str) -> BTreeMap<String, LevelFields> {
    let document = roxmltree::Document::parse(xml).expect("XML parsed");
    let root = document.root_element();
    assert_eq!(root.tag_name().name(), "dtb");

    root.children()
        .filter(|node| node.is_element())
        .map(|level| {
            let entities: LevelFields = level
                .children()
                .filter(|node| node.is_element())
                .map(|row| {
                    let mut fields: BTreeMap<String, String> = row
                        .children()
                        .filter(|node| node.is_element())
                        .map(|field| {
                            (
                                field.attribute("name").expect("field name").to_string(),
                                field.text().unwrap_or_default().to_string(),
                            )
                        })
                        .collect();
                    let id = fields.remove("id").expect("id field");
                    (id.parse::<i64>().expect("numeric id"), fields)
                })
                .collect();
            (level.tag_name().name().to_string(), entities)
        })
        .collect()
}

#[test]
fn csv_has_one_line_per_source_row() {
    let model = common::sample_model();
    let csv = delimited::encode(&model, false).expect("CSV encoded");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), model.flat_rows().len() + 1);
    assert_eq!(
        lines[0],
        "\"uf\",\"nome_uf\",\"mesorregiao\",\"nome_mesorregiao\",\"microrregiao\",\
         \"nome_microrregiao\",\"municipio\",\"nome_municipio\",\"distrito\",\
         \"nome_distrito\",\"subdistrito\",\"nome_subdistrito\""
    );
    assert_eq!(
        lines[1],
        "11,\"Rondônia\",1102,\"Leste Rondoniense\",11006,\"Cacoal\",1100015,\
         \"Alta Floresta D'Oeste\",110001505,\"Alta Floresta D'Oeste\""
    );
    assert_eq!(
        lines[3],
        "35,\"São Paulo\",3515,\"Metropolitana de São Paulo\",35061,\"São Paulo\",\
         3550308,\"São Paulo\",355030860,\"São Paulo\",35503086001,\"Sé\""
    );
}

#[test]
fn minified_csv_quotes_only_when_needed() {
    let model = common::sample_model();
    let csv = delimited::encode(&model, true).expect("CSV encoded");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "uf,nome_uf,mesorregiao,nome_mesorregiao,microrregiao,nome_microrregiao,\
         municipio,nome_municipio,distrito,nome_distrito,subdistrito,nome_subdistrito"
    );
    let field_counts: Vec<usize> = lines[1..]
        .iter()
        .map(|line| line.split(',').count())
        .collect();
    assert_eq!(field_counts, vec![10, 10, 12, 12]);
}

#[test]
fn json_and_xml_expose_the_same_entities() {
    let model = common::sample_model();
    let json: serde_json::Value =
        serde_json::from_str(&json::encode(&model, false).expect("JSON encoded"))
            .expect("JSON parsed");
    let xml = xml_fields(&document::encode(&model, false).expect("XML encoded"));

    let xml_levels: Vec<&str> = xml.keys().map(String::as_str).collect();
    let mut level_names: Vec<&str> = Level::ALL.iter().map(|level| level.name()).collect();
    level_names.sort_unstable();
    assert_eq!(xml_levels, level_names);

    for level in Level::ALL {
        let expected = expected_fields(&model, level);
        assert_eq!(json_fields(&json, level), expected);
        assert_eq!(xml[level.name()], expected);
    }
}

#[test]
fn json_keeps_hierarchy_and_insertion_order() {
    let model = common::sample_model();
    let compact = json::encode(&model, true).expect("JSON encoded");
    let pretty = json::encode(&model, false).expect("JSON encoded");

    for text in [&compact, &pretty] {
        let positions: Vec<usize> = Level::ALL
            .iter()
            .map(|level| text.find(&format!("\"{}\":", level.name())).expect("level key"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        let first = text.find("\"110001505\"").expect("first district");
        let second = text.find("\"110001510\"").expect("second district");
        let third = text.find("\"355030860\"").expect("third district");
        assert!(first < second && second < third);
    }

    assert!(!compact.contains('\n'));
    assert!(pretty.contains("\n    \"uf\": {\n        \"11\": {\n            \"nome\": \"Rondônia\""));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&compact).expect("compact parsed"),
        serde_json::from_str::<serde_json::Value>(&pretty).expect("pretty parsed")
    );
}

#[test]
fn minified_yaml_matches_block_yaml() {
    let model = common::sample_model();
    let block = yaml::encode(&model, false).expect("YAML encoded");
    let flow = yaml::encode(&model, true).expect("YAML encoded");

    assert_eq!(flow.lines().count(), 1);
    let block_value: serde_yaml_ng::Value = serde_yaml_ng::from_str(&block).expect("block parsed");
    let flow_value: serde_yaml_ng::Value = serde_yaml_ng::from_str(&flow).expect("flow parsed");
    assert_eq!(block_value, flow_value);

    let mut rows = common::raw_rows();
    for row in rows.iter_mut().filter(|row| row.fields[0] == "11") {
        row.fields[1] = "Ro\u{7f}n\u{85}d\tô\u{2028}nia".to_string();
    }
    let unusual = build_model(rows).expect("model built");
    let block_unusual: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(&yaml::encode(&unusual, false).expect("YAML encoded"))
            .expect("block parsed");
    let flow_unusual = yaml::encode(&unusual, true).expect("YAML encoded");
    assert_eq!(flow_unusual.lines().count(), 1);
    let flow_unusual: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(&flow_unusual).expect("flow parsed");
    assert_eq!(block_unusual, flow_unusual);
    assert_eq!(
        flow_unusual["uf"][11_usize]["nome"].as_str(),
        Some("Ro\u{7f}n\u{85}d\tô\u{2028}nia")
    );

    let ufs = block_value["uf"].as_mapping().expect("uf mapping");
    let (key, rondonia) = ufs.iter().next().expect("first uf");
    assert_eq!(key.as_i64(), Some(11));
    assert_eq!(rondonia["nome"].as_str(), Some("Rondônia"));

    let districts = block_value["distrito"].as_mapping().expect("distrito mapping");
    let ids: Vec<i64> = districts.iter().filter_map(|(key, _)| key.as_i64()).collect();
    assert_eq!(ids, vec![110001505, 110001510, 355030860]);
}

#[test]
fn xml_verbose_mode_names_each_level() {
    let model = common::sample_model();
    let verbose = document::encode(&model, false).expect("XML encoded");
    let minified = document::encode(&model, true).expect("XML encoded");

    assert!(verbose.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    for level in Level::ALL {
        assert!(verbose.contains(&format!("<!-- {} -->", level.name())));
    }
    assert!(verbose.contains("<field name=\"id\">11</field>"));
    assert!(!minified.contains("<!--"));
    assert!(!minified.contains('\n'));
    assert_eq!(xml_fields(&verbose), xml_fields(&minified));
}

fn unescape(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            out.extend(chars.next());
        } else {
            out.push(ch);
        }
    }
    out
}

#[test]
fn sql_inserts_carry_entity_values() {
    let model = common::sample_model();
    let sql = relational::encode(&model, false).expect("SQL encoded");

    for level in Level::ALL {
        let prefix = format!("INSERT INTO {} (", level.name());
        let inserts: Vec<&str> = sql.lines().filter(|line| line.starts_with(&prefix)).collect();
        let records = model.records(level);
        assert_eq!(inserts.len(), records.len());

        for (insert, record) in inserts.iter().zip(&records) {
            let values = insert
                .split_once(" VALUES (")
                .and_then(|(_, rest)| rest.strip_suffix(");"))
                .expect("values clause");
            let parts: Vec<&str> = values.splitn(record.values.len(), ", ").collect();
            for (part, value) in parts.iter().zip(&record.values) {
                match value {
                    Value::Int(number) => assert_eq!(*part, number.to_string()),
                    Value::Text(text) => {
                        let quoted = part
                            .strip_prefix('\'')
                            .and_then(|rest| rest.strip_suffix('\''))
                            .expect("quoted literal");
                        assert_eq!(unescape(quoted), *text);
                    }
                }
            }
        }
    }

    assert!(sql.contains("'Alta Floresta D\\'Oeste'"));
    assert!(sql.contains("\nCREATE TABLE IF NOT EXISTS subdistrito (id BIGINT NOT NULL, "));

    let statements: Vec<&str> = sql
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .collect();
    let entities: usize = Level::ALL.iter().map(|level| model.len(*level)).sum();
    assert_eq!(statements.len(), Level::ALL.len() + entities);
    assert!(statements.iter().all(|line| line.ends_with(';')));
}

#[test]
fn minified_sql_only_changes_formatting() {
    let model = common::sample_model();
    let verbose = relational::encode(&model, false).expect("SQL encoded");
    let minified = relational::encode(&model, true).expect("SQL encoded");

    assert!(!minified.contains("--"));
    assert_eq!(minified.lines().count(), 1);

    let strip = |text: &str| -> String {
        text.lines()
            .filter(|line| !line.starts_with("--"))
            .flat_map(str::chars)
            .filter(|ch| !ch.is_whitespace())
            .collect()
    };
    assert_eq!(strip(&verbose), strip(&minified));
}
