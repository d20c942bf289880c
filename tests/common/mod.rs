#![allow(dead_code)]

use std::path::Path;

use dtb_export::decode::{COLUMN_COUNT, FLAT_COLUMNS, RawRow};
use dtb_export::model::EntityModel;
use dtb_export::normalize::build_model;
use rust_xlsxwriter::Workbook;

/// Four source rows: two districts without sub-districts in Rondônia and two
/// sub-districts of one district in São Paulo.
pub const SOURCE_ROWS: [[&str; COLUMN_COUNT]; 4] = [
    [
        "11",
        "Rondônia",
        "02",
        "Leste Rondoniense",
        "006",
        "Cacoal",
        "00015",
        "Alta Floresta D'Oeste",
        "05",
        "Alta Floresta D'Oeste",
        "",
        "",
    ],
    [
        "11",
        "Rondônia",
        "02",
        "Leste Rondoniense",
        "006",
        "Cacoal",
        "00015",
        "Alta Floresta D'Oeste",
        "10",
        "Filadélfia D'Oeste",
        "",
        "",
    ],
    [
        "35",
        "São Paulo",
        "15",
        "Metropolitana de São Paulo",
        "061",
        "São Paulo",
        "50308",
        "São Paulo",
        "60",
        "São Paulo",
        "01",
        "Sé",
    ],
    [
        "35",
        "São Paulo",
        "15",
        "Metropolitana de São Paulo",
        "061",
        "São Paulo",
        "50308",
        "São Paulo",
        "60",
        "São Paulo",
        "02",
        "Bela Vista",
    ],
];

pub fn raw_rows() -> Vec<RawRow> {
    SOURCE_ROWS
        .iter()
        .enumerate()
        .map(|(index, fields)| RawRow::new(index + 2, fields.map(str::to_string)))
        .collect()
}

pub fn sample_model() -> EntityModel {
    build_model(raw_rows()).expect("model built")
}

/// Writes the source rows as a workbook. Uf and mesorregiao codes are stored
/// as numbers, the way spreadsheet tools tend to keep them.
pub fn write_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in FLAT_COLUMNS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .expect("header written");
    }

    for (row_idx, row) in SOURCE_ROWS.iter().enumerate() {
        let line = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            if col == 0 || col == 2 {
                let number: f64 = cell.parse().expect("numeric code");
                worksheet
                    .write_number(line, col as u16, number)
                    .expect("number written");
            } else {
                worksheet
                    .write_string(line, col as u16, *cell)
                    .expect("cell written");
            }
        }
    }

    workbook.save(path).expect("workbook saved");
}
