//! Download of the yearly DTB archive.

use std::io::{Cursor, Read};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, info, instrument};
use zip::ZipArchive;

use crate::config::{HTTP_TIMEOUT_SECS, archive_url};
use crate::error::{DtbError, Result};

/// User agent string identifying this tool.
const USER_AGENT: &str = concat!("dtb-export/", env!("CARGO_PKG_VERSION"));

/// Marker of the most detailed spreadsheet inside an archive.
const PREFERRED_ENTRY_MARKER: &str = "SUBDISTRITO";

/// Create a configured HTTP client.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Downloads the archive published for `year` and returns the spreadsheet
/// it contains.
#[instrument(level = "info", skip(client))]
pub fn fetch_spreadsheet(client: &Client, year: u16) -> Result<Vec<u8>> {
    let archive = download_archive(client, year)?;
    extract_spreadsheet(&archive)
}

/// Downloads the raw archive bytes. A missing archive means the year was
/// never published.
pub fn download_archive(client: &Client, year: u16) -> Result<Vec<u8>> {
    let url = archive_url(year);
    debug!(%url, "downloading archive");

    let response = client.get(&url).send()?;
    if response.status() == StatusCode::NOT_FOUND {
        return Err(DtbError::YearUnavailable { year });
    }
    let bytes = response.error_for_status()?.bytes()?;
    info!(bytes = bytes.len(), "archive downloaded");
    Ok(bytes.to_vec())
}

/// Pulls the spreadsheet out of a zip archive, preferring the sub-district
/// report when the archive carries several.
pub fn extract_spreadsheet(archive: &[u8]) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(archive))?;

    let mut candidates = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_file() && is_spreadsheet(entry.name()) {
            candidates.push((index, entry.name().to_string()));
        }
    }

    let (index, name) = candidates
        .iter()
        .find(|(_, name)| name.to_uppercase().contains(PREFERRED_ENTRY_MARKER))
        .or_else(|| candidates.first())
        .cloned()
        .ok_or(DtbError::MissingSpreadsheet)?;

    let mut entry = archive.by_index(index)?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    debug!(entry = %name, bytes = bytes.len(), "spreadsheet extracted");
    Ok(bytes)
}

fn is_spreadsheet(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".xls") || lower.ends_with(".xlsx")
}
