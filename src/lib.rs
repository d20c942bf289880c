//! Core library for the `dtb` command line application.
//!
//! The library turns the denormalized rows of the Brazilian territorial
//! division spreadsheet into six related entity tables and renders them as
//! CSV, JSON, SQL, XML or YAML. Row decoding lives in [`decode`], the
//! per-level entity tables in [`model`], the row-to-entity normalization in
//! [`normalize`], the encoders under [`encode`], and format selection plus
//! output handling in [`export`]. Spreadsheet reading and archive download are
//! thin adapters under [`io`], wired together by [`pipeline`].

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod export;
pub mod io;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use config::ExportOptions;
pub use error::{DtbError, Result};
pub use export::{Destination, Format};
pub use model::{EntityModel, Level};
