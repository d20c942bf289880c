use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{DataType, Range, Reader, Xls, Xlsx};
use tracing::{debug, instrument};

use crate::decode::{COLUMN_COUNT, RawRow};
use crate::error::{DtbError, Result};

/// Leading bytes of a zip container, which is what `.xlsx` files are.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Reads the territorial rows from a spreadsheet file on disk.
#[instrument(level = "info", skip_all, fields(input = %path.display()))]
pub fn read_rows_from_path(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(DtbError::MissingInput(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    read_rows(&bytes)
}

/// Reads the territorial rows from the first worksheet of a legacy `.xls` or
/// an `.xlsx` byte stream. The header row and blank rows are skipped.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let cursor = Cursor::new(bytes);
    let range = if bytes.starts_with(ZIP_MAGIC) {
        let mut workbook: Xlsx<_> = Xlsx::new(cursor)?;
        first_sheet(&mut workbook)?
    } else {
        let mut workbook: Xls<_> = Xls::new(cursor)?;
        first_sheet(&mut workbook)?
    };

    let rows = rows_from_range(&range);
    debug!(rows = rows.len(), "spreadsheet rows read");
    Ok(rows)
}

fn first_sheet<RS, R>(workbook: &mut R) -> Result<Range<DataType>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    DtbError: From<R::Error>,
{
    let range_result = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DtbError::InvalidSpreadsheet("workbook has no worksheets".into()))?;
    Ok(range_result?)
}

fn rows_from_range(range: &Range<DataType>) -> Vec<RawRow> {
    let first_line = range.start().map_or(0, |(row, _)| row as usize) + 1;

    range
        .rows()
        .enumerate()
        .skip(1)
        .filter_map(|(offset, row)| {
            let fields: [String; COLUMN_COUNT] =
                std::array::from_fn(|col| cell_to_string(row.get(col)));
            if fields.iter().all(String::is_empty) {
                return None;
            }
            Some(RawRow::new(first_line + offset, fields))
        })
        .collect()
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.trim().to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Float(value)) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
