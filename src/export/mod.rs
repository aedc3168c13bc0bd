//! Export of the record store
//!
//! - CSV: the exact record file format, readable back by the store
//! - JSON: machine-readable document with metadata
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_records_csv;
pub use self::json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_full_yaml;
