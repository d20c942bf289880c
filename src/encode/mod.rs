//! Encoders turning a completed [`EntityModel`](crate::model::EntityModel)
//! into a self-contained output document.
//!
//! Every encoder writes levels in hierarchy order, entities in first-seen
//! order and fields in [`Level::fields`](crate::model::Level::fields) order.
//! The `minified` flag only changes formatting, never content.

pub mod delimited;
pub mod document;
pub mod json;
mod mapping;
pub mod relational;
pub mod yaml;

/// Root name of the dataset, used for the document root element.
pub const DATASET_NAME: &str = "dtb";
