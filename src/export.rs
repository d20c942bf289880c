use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, instrument};

use crate::config::{ExportOptions, OUTPUT_STEM};
use crate::encode::{delimited, document, json, relational, yaml};
use crate::error::{DtbError, Result};
use crate::model::EntityModel;

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Csv,
    Json,
    Sql,
    Xml,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Csv,
        Format::Json,
        Format::Sql,
        Format::Xml,
        Format::Yaml,
    ];

    /// Format name, also used as the file extension.
    pub fn name(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Sql => "sql",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
        }
    }

    /// Runs the matching encoder over the model.
    pub fn encode(self, model: &EntityModel, minified: bool) -> Result<String> {
        match self {
            Format::Csv => delimited::encode(model, minified),
            Format::Json => json::encode(model, minified),
            Format::Sql => relational::encode(model, minified),
            Format::Xml => document::encode(model, minified),
            Format::Yaml => yaml::encode(model, minified),
        }
    }

    /// Name of the file written when output is requested without a path.
    pub fn default_file_name(self) -> String {
        format!("{OUTPUT_STEM}.{}", self.name())
    }
}

impl FromStr for Format {
    type Err = DtbError;

    fn from_str(value: &str) -> Result<Self> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| DtbError::UnsupportedFormat(value.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the encoded output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Resolves an output request: no request writes to standard output, a
    /// bare request writes `dtb.<format>`, and an explicit path is used as is.
    pub fn from_request(request: Option<Option<PathBuf>>, format: Format) -> Self {
        match request {
            None => Destination::Stdout,
            Some(None) => Destination::File(PathBuf::from(format.default_file_name())),
            Some(Some(path)) => Destination::File(path),
        }
    }
}

/// Encodes the model into a single in-memory document.
#[instrument(
    level = "info",
    skip_all,
    fields(format = %options.format, minified = options.minified)
)]
pub fn encode(model: &EntityModel, options: &ExportOptions) -> Result<String> {
    let content = options.format.encode(model, options.minified)?;
    info!(bytes = content.len(), "dataset encoded");
    Ok(content)
}

/// Encodes the model and writes it to the destination. Nothing is written
/// unless encoding succeeds.
pub fn export(
    model: &EntityModel,
    options: &ExportOptions,
    destination: &Destination,
) -> Result<()> {
    let content = encode(model, options)?;
    write_output(&content, destination)
}

/// Writes fully encoded content to a file or standard output.
pub fn write_output(content: &str, destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
        Destination::File(path) => write_file(path, content)?,
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    info!(path = %path.display(), "output written");
    Ok(())
}
