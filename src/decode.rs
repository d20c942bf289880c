//! Decoding of raw spreadsheet rows into composed territorial identifiers.
//!
//! Every level's identifier is formed by concatenating the digit strings of
//! the codes that make up the published territorial code, most significant
//! first, and reading the result as one integer:
//!
//! | level        | composition                                   |
//! |--------------|-----------------------------------------------|
//! | uf           | uf                                            |
//! | mesorregiao  | uf ++ mesorregiao                             |
//! | microrregiao | uf ++ microrregiao                            |
//! | municipio    | uf ++ municipio                               |
//! | distrito     | uf ++ municipio ++ distrito                   |
//! | subdistrito  | uf ++ municipio ++ distrito ++ subdistrito    |

use crate::error::{DtbError, Result};
use crate::model::{Level, Value};

/// Number of positional columns in a source row.
pub const COLUMN_COUNT: usize = 12;

/// Header of the flat (delimited-text) representation, one id and one name
/// column per level.
pub const FLAT_COLUMNS: [&str; COLUMN_COUNT] = [
    "uf",
    "nome_uf",
    "mesorregiao",
    "nome_mesorregiao",
    "microrregiao",
    "nome_microrregiao",
    "municipio",
    "nome_municipio",
    "distrito",
    "nome_distrito",
    "subdistrito",
    "nome_subdistrito",
];

/// One row exactly as read from the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line of the row within the worksheet.
    pub line: usize,
    /// Code/name pairs for the six levels, in hierarchy order.
    pub fields: [String; COLUMN_COUNT],
}

impl RawRow {
    pub fn new(line: usize, fields: [String; COLUMN_COUNT]) -> Self {
        Self { line, fields }
    }

    fn code(&self, level: Level) -> &str {
        self.fields[column(level)].trim()
    }

    fn name(&self, level: Level) -> &str {
        self.fields[column(level) + 1].trim()
    }
}

/// Composed id and display name of one level of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Named {
    pub id: i64,
    pub nome: String,
}

/// A row with every level's identifier composed.
///
/// The model keeps these verbatim as the flat rows used by the delimited-text
/// encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    pub uf: Named,
    pub mesorregiao: Named,
    pub microrregiao: Named,
    pub municipio: Named,
    pub distrito: Named,
    pub subdistrito: Option<Named>,
}

impl DecodedRow {
    /// Values in [`FLAT_COLUMNS`] order. Sub-district values are dropped, not
    /// blanked, when the row has no sub-district.
    pub fn flat_values(&self) -> Vec<Value<'_>> {
        let levels = [
            Some(&self.uf),
            Some(&self.mesorregiao),
            Some(&self.microrregiao),
            Some(&self.municipio),
            Some(&self.distrito),
            self.subdistrito.as_ref(),
        ];
        levels
            .into_iter()
            .flatten()
            .flat_map(|named| [Value::Int(named.id), Value::Text(&named.nome)])
            .collect()
    }
}

/// Fixed width of each level's local code in the source spreadsheet.
pub fn code_width(level: Level) -> usize {
    match level {
        Level::Uf => 2,
        Level::Mesorregiao => 2,
        Level::Microrregiao => 3,
        Level::Municipio => 5,
        Level::Distrito => 2,
        Level::Subdistrito => 2,
    }
}

/// Codes whose concatenation forms the identifier of `level`.
fn composition(level: Level) -> &'static [Level] {
    match level {
        Level::Uf => &[Level::Uf],
        Level::Mesorregiao => &[Level::Uf, Level::Mesorregiao],
        Level::Microrregiao => &[Level::Uf, Level::Microrregiao],
        Level::Municipio => &[Level::Uf, Level::Municipio],
        Level::Distrito => &[Level::Uf, Level::Municipio, Level::Distrito],
        Level::Subdistrito => &[
            Level::Uf,
            Level::Municipio,
            Level::Distrito,
            Level::Subdistrito,
        ],
    }
}

fn column(level: Level) -> usize {
    match level {
        Level::Uf => 0,
        Level::Mesorregiao => 2,
        Level::Microrregiao => 4,
        Level::Municipio => 6,
        Level::Distrito => 8,
        Level::Subdistrito => 10,
    }
}

/// Decodes one raw row, failing on the first malformed code.
pub fn decode_row(row: &RawRow) -> Result<DecodedRow> {
    let named = |level: Level| -> Result<Named> {
        Ok(Named {
            id: compose(row, level)?,
            nome: row.name(level).to_string(),
        })
    };

    let subdistrito = if row.code(Level::Subdistrito).is_empty() {
        None
    } else {
        Some(named(Level::Subdistrito)?)
    };

    Ok(DecodedRow {
        uf: named(Level::Uf)?,
        mesorregiao: named(Level::Mesorregiao)?,
        microrregiao: named(Level::Microrregiao)?,
        municipio: named(Level::Municipio)?,
        distrito: named(Level::Distrito)?,
        subdistrito,
    })
}

fn compose(row: &RawRow, level: Level) -> Result<i64> {
    let mut digits = String::with_capacity(13);
    for &part in composition(level) {
        digits.push_str(&normalized_code(row, part)?);
    }
    digits.parse::<i64>().map_err(|_| invalid_code(row, level))
}

/// Validates a code and left-pads it to its fixed width. Codes already at or
/// beyond the width are kept as given.
fn normalized_code(row: &RawRow, level: Level) -> Result<String> {
    let code = row.code(level);
    if code.is_empty() || !code.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid_code(row, level));
    }
    let width = code_width(level);
    Ok(format!("{code:0>width$}"))
}

fn invalid_code(row: &RawRow, level: Level) -> DtbError {
    DtbError::InvalidCode {
        level,
        value: row.code(level).to_string(),
        line: row.line,
    }
}
