use derive_more::Display;
use serde::Serialize;
use tletypes::prelude::*;

/// One satellite as presented to consumers.
///
/// Positions and angles are rounded to whole units for display, the
/// unrounded elevation is kept for the horizon filter.
#[derive(Clone, PartialEq, Debug, Display, Serialize)]
#[display(
    fmt = "{}: az {}° el {}° range {} km alt {} km",
    "name",
    "azimuth",
    "elevation",
    "range",
    "altitude"
)]
pub struct SatelliteReport {
    pub name: String,

    /// Sub-satellite latitude [deg]
    pub latitude: f64,

    /// Sub-satellite longitude [deg]
    pub longitude: f64,

    /// [km]
    pub altitude: i32,

    /// [deg]
    pub azimuth: i32,

    /// [deg]
    pub elevation: i32,

    /// [km]
    pub range: i32,

    /// Strictly above the horizon
    pub visible: bool,

    /// Member of the popular satellite catalog
    pub popular: bool,

    #[serde(skip)]
    raw_elevation: f64,
}

impl SatelliteReport {
    pub fn new<N: Into<String>>(name: N, geodetic: &Geodetic, look: &LookAngles, popular: bool) -> Self {
        Self {
            name: name.into(),
            latitude: geodetic.latitude,
            longitude: geodetic.longitude,
            altitude: round(geodetic.altitude),
            azimuth: round(look.azimuth),
            elevation: round(look.elevation),
            range: round(look.range),
            visible: look.elevation > 0.0,
            popular,
            raw_elevation: look.elevation,
        }
    }

    /// Elevation before rounding [deg]
    pub fn raw_elevation(&self) -> f64 {
        self.raw_elevation
    }
}

/// Halves round toward positive infinity, so -4.5 becomes -4
fn round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
