//! Visibility filtering and ranking.

use std::cmp::Reverse;

use crate::report::SatelliteReport;

/// Satellites at or below this elevation are dropped unless popular [deg]
pub const HORIZON_MARGIN_DEG: f64 = -5.0;

/// Upper bound on the published report list
pub const MAX_REPORTS: usize = 20;

/// Well-known amateur radio satellites
pub const AMATEUR_SATELLITES: &[&str] = &[
    "ISS (ZARYA)",
    "SO-50",
    "AO-91",
    "AO-92",
    "CAS-4A",
    "CAS-4B",
    "XW-2A",
    "XW-2B",
    "JO-97",
    "RS-44",
];

/// A curated list of satellite names. A satellite is popular when its
/// catalog name contains one of the entries.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PopularCatalog {
    names: Vec<String>,
}

impl Default for PopularCatalog {
    fn default() -> Self {
        Self::new(AMATEUR_SATELLITES.iter().copied())
    }
}

impl PopularCatalog {
    /// Empty names are ignored, they would match everything
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|n: &String| !n.is_empty())
                .collect(),
        }
    }

    pub fn is_popular(&self, satellite_name: &str) -> bool {
        self.names.iter().any(|n| satellite_name.contains(n.as_str()))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Near the horizon or popular
pub fn is_relevant(report: &SatelliteReport) -> bool {
    report.popular || report.raw_elevation() > HORIZON_MARGIN_DEG
}

/// Keeps the relevant reports, highest rounded elevation first, at most
/// [`MAX_REPORTS`] of them. Ties keep their input order.
pub fn filter_and_rank<I>(reports: I) -> Vec<SatelliteReport>
where
    I: IntoIterator<Item = SatelliteReport>,
{
    let mut ranked: Vec<SatelliteReport> = reports.into_iter().filter(is_relevant).collect();
    ranked.sort_by_key(|r| Reverse(r.elevation));
    ranked.truncate(MAX_REPORTS);
    ranked
}
