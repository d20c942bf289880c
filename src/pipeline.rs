//! End-to-end export runs: acquire the spreadsheet, normalize it and emit
//! the requested encoding.

use std::path::Path;

use tracing::{info, instrument};

use crate::config::ExportOptions;
use crate::error::Result;
use crate::export::{self, Destination};
use crate::io::{fetch, spreadsheet};
use crate::model::EntityModel;
use crate::normalize::build_model;

/// Downloads the dataset of `year` and exports it.
#[instrument(level = "info", skip_all, fields(year = year, format = %options.format))]
pub fn export_year(year: u16, options: &ExportOptions, destination: &Destination) -> Result<()> {
    let client = fetch::create_client()?;
    let bytes = fetch::fetch_spreadsheet(&client, year)?;
    let model = model_from_bytes(&bytes)?;
    export::export(&model, options, destination)
}

/// Exports a spreadsheet already present on disk.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), format = %options.format)
)]
pub fn export_file(input: &Path, options: &ExportOptions, destination: &Destination) -> Result<()> {
    let rows = spreadsheet::read_rows_from_path(input)?;
    info!(row_count = rows.len(), "read rows from spreadsheet");
    let model = build_model(rows)?;
    export::export(&model, options, destination)
}

/// Builds the entity model from spreadsheet bytes.
pub fn model_from_bytes(bytes: &[u8]) -> Result<EntityModel> {
    let rows = spreadsheet::read_rows(bytes)?;
    info!(row_count = rows.len(), "read rows from spreadsheet");
    build_model(rows)
}
