//! Configuration constants and the options consumed by the export pipeline.

use crate::export::Format;

/// Location of the yearly territorial division archives.
pub const ARCHIVE_BASE_URL: &str =
    "https://geoftp.ibge.gov.br/organizacao_do_territorio/estrutura_territorial/divisao_territorial";

/// HTTP timeout in seconds. The archives are a few megabytes.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Year exported when none is requested.
pub const DEFAULT_YEAR: u16 = 2018;

/// Stem of auto-generated output file names (`dtb.<format>`).
pub const OUTPUT_STEM: &str = "dtb";

/// URL of the archive published for `year`.
pub fn archive_url(year: u16) -> String {
    format!("{ARCHIVE_BASE_URL}/{year}/dtb_{year}.zip")
}

/// Options that shape the encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: Format,
    pub minified: bool,
}

impl ExportOptions {
    pub fn new(format: Format, minified: bool) -> Self {
        Self { format, minified }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new(Format::Json, false)
    }
}
