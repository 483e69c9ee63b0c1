//! Element catalogs: satellite name to element lines, as handed over by a
//! retrieval source before normalization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tletypes::prelude::*;
use tracing::debug;

use crate::parser::parse_unstructured_tle_set;

pub type RawCatalog = BTreeMap<String, RawElementEntry>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid JSON element catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON element catalog must be an object keyed by satellite name")]
    NotAnObject,
    #[error("Unparsable element text at line {line}")]
    Text { line: usize },
}

/// One catalog entry. Upstreams disagree on what to call the two element
/// lines, `line1`/`line2` and `tle1`/`tle2` are synonyms.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct RawElementEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tle1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tle2: Option<String>,
}

impl RawElementEntry {
    pub fn from_lines(lines: ElementLines) -> Self {
        Self {
            line1: Some(lines.line1),
            line2: Some(lines.line2),
            tle1: None,
            tle2: None,
        }
    }

    /// Collapses both naming conventions into element lines.
    /// The `line*` keys win, empty strings count as absent.
    pub fn normalize(&self) -> Option<ElementLines> {
        let line1 = first_present(&self.line1, &self.tle1)?;
        let line2 = first_present(&self.line2, &self.tle2)?;
        Some(ElementLines::new(line1, line2))
    }
}

fn first_present<'a>(key: &'a Option<String>, alias: &'a Option<String>) -> Option<&'a str> {
    [key, alias]
        .into_iter()
        .flatten()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
}

/// Parses either catalog shape, JSON when the content is an object
pub fn parse_catalog(content: &str) -> Result<RawCatalog, CatalogError> {
    if content.trim_start().starts_with('{') {
        parse_catalog_json(content)
    } else {
        parse_catalog_text(content)
    }
}

/// Parses a JSON object of `name -> {line1, line2}` (or `{tle1, tle2}`).
/// Entries of the wrong shape are kept as empty entries, they fail
/// normalization downstream instead of failing the whole catalog.
pub fn parse_catalog_json(content: &str) -> Result<RawCatalog, CatalogError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Object(entries) = value else {
        return Err(CatalogError::NotAnObject);
    };

    Ok(entries
        .into_iter()
        .map(|(name, entry)| {
            let entry = serde_json::from_value(entry).unwrap_or_else(|e| {
                debug!(name = %name, error = %e, "Malformed catalog entry");
                RawElementEntry::default()
            });
            (name, entry)
        })
        .collect())
}

/// Parses three-line element text. The whole input must parse.
pub fn parse_catalog_text(content: &str) -> Result<RawCatalog, CatalogError> {
    let (rest, tle_set) = parse_unstructured_tle_set(content).map_err(|_| CatalogError::Text {
        line: 1,
    })?;
    if !rest.is_empty() {
        let line = content[..content.len() - rest.len()].lines().count() + 1;
        return Err(CatalogError::Text { line });
    }
    Ok(catalog_from_tle_set(tle_set))
}

/// Later records replace earlier ones with the same name
pub fn catalog_from_tle_set<I: IntoIterator<Item = UnstructuredTle>>(tle_set: I) -> RawCatalog {
    tle_set
        .into_iter()
        .map(|tle| (tle.satellite_name, RawElementEntry::from_lines(tle.lines)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn both_key_conventions() {
        let json = format!(
            r#"{{
                "ISS (ZARYA)": {{ "line1": "{ISS_LINE1}", "line2": "{ISS_LINE2}" }},
                "ISS COPY": {{ "tle1": "{ISS_LINE1}", "tle2": "{ISS_LINE2}" }}
            }}"#
        );
        let catalog = parse_catalog(&json).unwrap();
        assert_eq!(catalog.len(), 2);
        let expected = ElementLines::new(ISS_LINE1, ISS_LINE2);
        assert_eq!(catalog["ISS (ZARYA)"].normalize(), Some(expected.clone()));
        assert_eq!(catalog["ISS COPY"].normalize(), Some(expected));
    }

    #[test]
    fn empty_line_falls_back_to_alias() {
        let entry = RawElementEntry {
            line1: Some(String::new()),
            line2: Some(ISS_LINE2.to_owned()),
            tle1: Some(ISS_LINE1.to_owned()),
            tle2: Some("ignored".to_owned()),
        };
        assert_eq!(
            entry.normalize(),
            Some(ElementLines::new(ISS_LINE1, ISS_LINE2))
        );
    }

    #[test]
    fn missing_lines_do_not_normalize() {
        let json = indoc! {r#"{
            "HALF": { "line1": "1 25544U" },
            "WRONG SHAPE": 42,
            "NUMBERS": { "line1": 1, "line2": 2 }
        }"#};
        let catalog = parse_catalog_json(json).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.values().all(|e| e.normalize().is_none()));
    }

    #[test]
    fn top_level_must_be_object() {
        assert!(matches!(
            parse_catalog_json("[1, 2]"),
            Err(CatalogError::NotAnObject)
        ));
        assert!(matches!(
            parse_catalog_json("{ nope"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn text_catalog_latest_wins() {
        let text = format!("SAT\n{ISS_LINE1}\n{ISS_LINE2}\nSAT\n{ISS_LINE1}\n2 99999 rest\n");
        let catalog = parse_catalog(&text).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog["SAT"].normalize().map(|l| l.line2),
            Some("2 99999 rest".to_owned())
        );
    }

    #[test]
    fn text_catalog_reports_bad_line() {
        let text = format!("SAT\n{ISS_LINE1}\n{ISS_LINE2}\n\nGARBAGE\nMORE GARBAGE\n");
        assert!(matches!(
            parse_catalog_text(&text),
            Err(CatalogError::Text { line: 5 })
        ));
    }
}
