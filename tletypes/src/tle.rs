use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The two fixed-format lines of an orbital element set
/// https://en.wikipedia.org/wiki/Two-line_element_set
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize)]
#[display(fmt = "{{line1: {}, line2: {}}}", "line1", "line2")]
pub struct ElementLines {
    pub line1: String,
    pub line2: String,
}

impl ElementLines {
    pub fn new<L1: Into<String>, L2: Into<String>>(line1: L1, line2: L2) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// Satellite catalog number, columns 3-7 of line 1
    pub fn catalog_number(&self) -> Option<u32> {
        self.line1.get(2..7)?.trim().parse().ok()
    }
}

/// Unstructured TLE, a name line followed by the element lines
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UnstructuredTle {
    pub satellite_name: String,
    pub lines: ElementLines,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_number() {
        let lines = ElementLines::new(
            "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927",
            "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537",
        );
        assert_eq!(lines.catalog_number(), Some(25544));
        assert_eq!(ElementLines::new("1", "2").catalog_number(), None);
    }
}
