pub use crate::catalog::{
    catalog_from_tle_set, parse_catalog, parse_catalog_json, parse_catalog_text, CatalogError,
    RawCatalog, RawElementEntry,
};
pub use crate::parser::{parse_unstructured_tle_set, ParseError};

pub mod catalog;
pub mod parser;

/// Length of a well-formed element line, checksum included
pub const ELEMENT_LINE_LEN: usize = 69;

/// Optional prefix on the name line of the three-line format
pub const NAME_LINE_PREFIX: &str = "0 ";
