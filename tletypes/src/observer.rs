use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Observer height above sea level [km].
/// Precise observer altitude is not tracked.
pub const OBSERVER_HEIGHT_KM: f64 = 0.1;

/// A ground observer
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Display, Serialize, Deserialize)]
#[display(fmt = "{{lat: {}, lon: {}}}", "latitude", "longitude")]
pub struct ObserverLocation {
    /// Geodetic latitude [deg]
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Geodetic longitude [deg]
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl ObserverLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Height above sea level [km]
    pub const fn height(&self) -> f64 {
        OBSERVER_HEIGHT_KM
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}
