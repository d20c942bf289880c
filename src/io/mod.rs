pub mod fetch;
pub mod spreadsheet;
