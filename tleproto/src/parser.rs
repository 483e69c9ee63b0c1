//! A simplistic parser for three-line orbital element text

use crate::NAME_LINE_PREFIX;
use nom::{
    branch::alt,
    character::complete::{line_ending, multispace0, not_line_ending, space0},
    combinator::{eof, verify},
    error::ErrorKind,
    multi::{fold_many0, many0},
    sequence::terminated,
};
use tletypes::prelude::*;

pub type Result<I, O, E = ParseError<I>> = std::result::Result<(I, O), nom::Err<E>>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError<I> {
    #[error("Element line {0} is malformed")]
    ElementLine(u8),
    #[error("Parse error")]
    Nom(I, ErrorKind),
}

/// Parses consecutive name/line1/line2 records, stopping at the first
/// record that doesn't fit. Blank lines between records are allowed.
/// Records keep their file order.
pub fn parse_unstructured_tle_set(set: &str) -> Result<&str, Vec<UnstructuredTle>> {
    let (s, _) = multispace0(set)?;
    let (s, tle_set) = fold_many0(tle, Vec::new, |mut tle_set: Vec<UnstructuredTle>, tle| {
        tle_set.push(tle);
        tle_set
    })(s)?;
    let (s, _) = multispace0(s)?;
    Ok((s, tle_set))
}

fn tle(s: &str) -> Result<&str, UnstructuredTle> {
    let (s, name) = name_line(s)?;
    let (s, line1) = element_line(s, 1)?;
    let (s, line2) = element_line(s, 2)?;
    let (s, _) = many0(terminated(space0, line_ending))(s)?;

    let name = name.trim();
    let name = name.strip_prefix(NAME_LINE_PREFIX).unwrap_or(name).trim();
    Ok((
        s,
        UnstructuredTle {
            satellite_name: name.to_string(),
            lines: ElementLines::new(line1, line2),
        },
    ))
}

fn name_line(s: &str) -> Result<&str, &str> {
    let (s, name) = verify(not_line_ending, |n: &str| !n.trim().is_empty())(s)?;
    let (s, _) = line_ending(s)?;
    Ok((s, name))
}

fn element_line(s: &str, number: u8) -> Result<&str, &str> {
    let (rest, line) = terminated(not_line_ending, alt((line_ending, eof)))(s)?;
    let line = line.trim_end();
    let bytes = line.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' + number || bytes[1] != b' ' {
        return Err(nom::Err::Error(ParseError::ElementLine(number)));
    }
    Ok((rest, line))
}

impl<I> nom::error::ParseError<I> for ParseError<I> {
    fn from_error_kind(s: I, kind: ErrorKind) -> Self {
        ParseError::Nom(s, kind)
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const TLE_SET: &str = indoc! {r#"GEO1
        1 37481U 11019A   23190.45078927 -.00000009  00000-0  00000+0 0  9991
        2 37481   2.3847  40.6385 0001640  70.7486  43.7146  1.00272292 44578

        GEO2
        1 39120U 13011A   23190.50177227 -.00000262  00000-0  00000+0 0  9997
        2 39120   2.3950  38.7964 0001772  68.0002 323.0070  1.00271163 37822
        "#};

    #[test]
    fn parse_tle() {
        let (s, tle_set) = parse_unstructured_tle_set(TLE_SET).unwrap();
        assert!(s.is_empty());
        assert_eq!(tle_set.len(), 2);
        assert_eq!(tle_set[0].satellite_name, "GEO1");
        assert_eq!(tle_set[1].satellite_name, "GEO2");
        assert_eq!(tle_set[1].lines.catalog_number(), Some(39120));
    }

    #[test]
    fn name_line_prefix_and_padding() {
        let set = "0 ISS (ZARYA)            \r\n\
            1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927\r\n\
            2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
        let (s, tle_set) = parse_unstructured_tle_set(set).unwrap();
        assert!(s.is_empty());
        assert_eq!(tle_set.len(), 1);
        assert_eq!(tle_set[0].satellite_name, "ISS (ZARYA)");
        assert!(tle_set[0].lines.line2.ends_with("563537"));
    }

    #[test]
    fn stops_at_malformed_record() {
        let set = indoc! {r#"GEO1
            1 37481U 11019A   23190.45078927 -.00000009  00000-0  00000+0 0  9991
            2 37481   2.3847  40.6385 0001640  70.7486  43.7146  1.00272292 44578
            BROKEN
            2 39120   2.3950  38.7964 0001772  68.0002 323.0070  1.00271163 37822
            1 39120U 13011A   23190.50177227 -.00000262  00000-0  00000+0 0  9997
            "#};
        let (s, tle_set) = parse_unstructured_tle_set(set).unwrap();
        assert_eq!(tle_set.len(), 1);
        assert!(s.starts_with("BROKEN"));
    }

    #[test]
    fn element_line_number_checked() {
        assert_eq!(
            element_line("2 25544  51.6416", 1),
            Err(nom::Err::Error(ParseError::ElementLine(1)))
        );
        assert_eq!(element_line("1 25544U\n", 1), Ok(("", "1 25544U")));
    }
}
