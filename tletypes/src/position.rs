use derive_more::Display;
use serde::Serialize;

/// Satellite state in the TEME inertial frame, as produced by SGP4
#[derive(Copy, Clone, PartialEq, Debug, Default, Display)]
#[display(fmt = "{{pos: {}, vel: {}}}", "position", "velocity")]
pub struct InertialPosition {
    /// Position [km], expressed in TEME
    pub position: na::Vector3<f64>,

    /// Velocity [km/s], expressed in TEME
    pub velocity: na::Vector3<f64>,
}

impl InertialPosition {
    pub fn new(position: [f64; 3], velocity: [f64; 3]) -> Self {
        Self {
            position: position.into(),
            velocity: velocity.into(),
        }
    }
}

/// WGS-84 geodetic coordinates
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display, Serialize)]
#[display(
    fmt = "{{lat: {}, lon: {}, alt: {}}}",
    "latitude",
    "longitude",
    "altitude"
)]
pub struct Geodetic {
    /// [deg]
    pub latitude: f64,
    /// [deg], in [-180, 180]
    pub longitude: f64,
    /// Height above the ellipsoid [km]
    pub altitude: f64,
}

/// Target direction and distance as seen by a ground observer
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display, Serialize)]
#[display(fmt = "{{az: {}, el: {}, range: {}}}", "azimuth", "elevation", "range")]
pub struct LookAngles {
    /// Clockwise from true north [deg], in [0, 360)
    pub azimuth: f64,
    /// Above the local horizon [deg], in [-90, 90]
    pub elevation: f64,
    /// Slant range [km]
    pub range: f64,
}
