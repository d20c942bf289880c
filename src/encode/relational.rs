use std::sync::LazyLock;

use regex::Regex;
use tracing::instrument;

use crate::error::Result;
use crate::model::{EntityModel, Level, Record, Value};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static PADDING_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([(),;])").expect("valid regex"));

static PADDING_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([(,;])\s+").expect("valid regex"));

const BANNER_RULE: &str = "-- ------------------------------------------------------------";

/// Encodes the model as SQL: one `CREATE TABLE` per level followed by one
/// `INSERT` per entity.
#[instrument(level = "debug", skip(model))]
pub fn encode(model: &EntityModel, minified: bool) -> Result<String> {
    if minified {
        return Ok(compact_script(model));
    }

    let mut out = String::new();
    for level in Level::ALL {
        out.push_str(&banner(level));
        out.push_str(&create_table(level));
        out.push_str("\n\n");
        for record in model.records(level) {
            out.push_str(&insert(&record, false));
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}

/// All statements on one line, separated by a single space.
fn compact_script(model: &EntityModel) -> String {
    let mut statements = Vec::new();
    for level in Level::ALL {
        statements.push(minify(&create_table(level)));
        statements.extend(
            model
                .records(level)
                .iter()
                .map(|record| insert(record, true)),
        );
    }
    let mut out = statements.join(" ");
    out.push('\n');
    out
}

/// Column type of a level's id, sized to the magnitude of its composed ids.
pub fn id_type(level: Level) -> &'static str {
    match level {
        Level::Uf | Level::Mesorregiao => "SMALLINT",
        Level::Microrregiao | Level::Municipio | Level::Distrito => "INT",
        Level::Subdistrito => "BIGINT",
    }
}

fn name_type(level: Level) -> &'static str {
    match level {
        Level::Uf => "VARCHAR(32)",
        _ => "VARCHAR(64)",
    }
}

fn banner(level: Level) -> String {
    format!("{BANNER_RULE}\n-- {}\n{BANNER_RULE}\n\n", level.name())
}

/// Fixed schema of a level's table, as a single-line statement.
pub fn create_table(level: Level) -> String {
    let table = level.name();
    let mut columns = Vec::new();

    columns.push(format!("id {} NOT NULL", id_type(level)));
    for ancestor in level.ancestors() {
        columns.push(format!(
            "id_{} {} NOT NULL",
            ancestor.name(),
            id_type(*ancestor)
        ));
    }
    columns.push(format!("nome {} NOT NULL", name_type(level)));
    columns.push(format!("CONSTRAINT pk_{table} PRIMARY KEY (id)"));
    for ancestor in level.ancestors() {
        let parent = ancestor.name();
        columns.push(format!(
            "CONSTRAINT fk_{table}_{parent} FOREIGN KEY (id_{parent}) REFERENCES {parent} (id)"
        ));
    }

    format!("CREATE TABLE IF NOT EXISTS {table} ({});", columns.join(", "))
}

/// Builds the `INSERT` of one entity from its typed values.
fn insert(record: &Record<'_>, minified: bool) -> String {
    let (separator, gap) = if minified { (",", "") } else { (", ", " ") };
    let columns = record.level.fields().join(separator);
    let values = record
        .values
        .iter()
        .map(|value| literal(*value))
        .collect::<Vec<_>>()
        .join(separator);

    format!(
        "INSERT INTO {}{gap}({columns}) VALUES{gap}({values});",
        record.level.name()
    )
}

fn literal(value: Value<'_>) -> String {
    match value {
        Value::Int(number) => number.to_string(),
        Value::Text(text) => format!("'{}'", escape(text)),
    }
}

/// Backslash-escapes backslashes and both quote characters.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '\'' | '"') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Collapses whitespace in a statement that carries no literal data.
fn minify(statement: &str) -> String {
    let single_spaced = WHITESPACE_RUN.replace_all(statement.trim(), " ");
    let tightened = PADDING_BEFORE.replace_all(&single_spaced, "$1");
    PADDING_AFTER.replace_all(&tightened, "$1").into_owned()
}
