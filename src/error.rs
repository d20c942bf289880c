use std::path::PathBuf;

use thiserror::Error;

use crate::model::Level;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, DtbError>;

/// Error type covering the different failure cases that can occur while the
/// dataset is acquired, normalized, or encoded.
#[derive(Debug, Error)]
pub enum DtbError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the archive download fails for reasons other than a missing year.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when the publisher has no archive for the requested year.
    #[error("DTB dataset for year {year} is not available")]
    YearUnavailable { year: u16 },

    /// Errors bubbled up while unpacking the downloaded archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Raised when the archive does not carry a spreadsheet.
    #[error("no spreadsheet found in archive")]
    MissingSpreadsheet,

    /// Errors bubbled up from the legacy (BIFF) spreadsheet reader.
    #[error("XLS read error: {0}")]
    XlsRead(#[from] calamine::XlsError),

    /// Errors bubbled up from the XLSX spreadsheet reader.
    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    /// Raised when a sheet does not follow the expected layout.
    #[error("invalid spreadsheet: {0}")]
    InvalidSpreadsheet(String),

    /// Raised when a code column does not hold a decimal digit string.
    #[error("invalid {level} code '{value}' on line {line}")]
    InvalidCode {
        level: Level,
        value: String,
        line: usize,
    },

    /// Raised when two rows describe the same entity id with different fields.
    #[error("conflicting {level} records for id {id}")]
    ConflictingEntity { level: Level, id: i64 },

    /// Raised when an export format name is not recognised.
    #[error("unsupported format '{0}' (expected one of csv, json, sql, xml, yaml)")]
    UnsupportedFormat(String),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when YAML serialization fails.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Raised when the XML writer fails.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Raised when the CSV writer fails.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when an encoder produces bytes that are not valid UTF-8.
    #[error("encoded output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
