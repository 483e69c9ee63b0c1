//! Reference-frame conversions from the TEME inertial frame to geodetic
//! coordinates and to topocentric look angles.
//!
//! Angles are radians internally and degrees at the boundary, distances
//! are kilometers throughout.

use na::Vector3;
use nav_types::{NVector, ECEF, WGS84};
use std::f64::consts::PI;
use tletypes::prelude::*;

use crate::units::{Angle, Length, Timestamp};

/// WGS-84 equatorial radius [km]
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// Greenwich mean sidereal time (IAU 1982), UTC standing in for UT1
pub fn gmst(t: Timestamp) -> Angle {
    let years = sgp4::julian_years_since_j2000(&t.as_utc().naive_utc());
    Angle::from_radians(sgp4::iau_epoch_to_sidereal_time(years)).wrap_two_pi()
}

/// Rotates a TEME vector about the polar axis into the Earth-fixed frame
pub fn teme_to_ecef(teme: &Vector3<f64>, gmst: Angle) -> Vector3<f64> {
    let (sin_g, cos_g) = gmst.as_radians().sin_cos();
    Vector3::new(
        teme.x * cos_g + teme.y * sin_g,
        -teme.x * sin_g + teme.y * cos_g,
        teme.z,
    )
}

/// Sub-satellite point and height above the WGS-84 ellipsoid
pub fn to_geodetic(state: &InertialPosition, t: Timestamp) -> Geodetic {
    let r = teme_to_ecef(&state.position, gmst(t));
    let ecef = ECEF::new(
        Length::from_kilometers(r.x).as_meters(),
        Length::from_kilometers(r.y).as_meters(),
        Length::from_kilometers(r.z).as_meters(),
    );
    let nvec: NVector<f64> = ecef.into();
    let pos = WGS84::<f64>::from(nvec);
    Geodetic {
        latitude: pos.latitude_degrees(),
        longitude: pos.longitude_degrees(),
        altitude: Length::from_meters(pos.altitude()).as_kilometers(),
    }
}

/// Observer position in the Earth-fixed frame [km]
pub fn observer_ecef(observer: &ObserverLocation) -> Vector3<f64> {
    let height = Length::from_kilometers(observer.height());
    let nvec: NVector<f64> =
        WGS84::from_degrees_and_meters(observer.latitude, observer.longitude, height.as_meters())
            .into();
    let ecef = ECEF::from(nvec);
    Vector3::new(
        Length::from_meters(ecef.x()).as_kilometers(),
        Length::from_meters(ecef.y()).as_kilometers(),
        Length::from_meters(ecef.z()).as_kilometers(),
    )
}

/// Look angles from the observer to an Earth-fixed target [km]
pub fn look_angles_ecef(observer: &ObserverLocation, target: &Vector3<f64>) -> LookAngles {
    let d = target - observer_ecef(observer);

    let (sin_lat, cos_lat) = Angle::from_degrees(observer.latitude).as_radians().sin_cos();
    let (sin_lon, cos_lon) = Angle::from_degrees(observer.longitude).as_radians().sin_cos();

    // South-east-zenith topocentric components
    let south = sin_lat * cos_lon * d.x + sin_lat * sin_lon * d.y - cos_lat * d.z;
    let east = -sin_lon * d.x + cos_lon * d.y;
    let zenith = cos_lat * cos_lon * d.x + cos_lat * sin_lon * d.y + sin_lat * d.z;

    let elevation = zenith.atan2(south.hypot(east));
    let azimuth = Angle::from_radians((-east).atan2(south) + PI).wrap_two_pi();

    LookAngles {
        azimuth: azimuth.as_degrees(),
        elevation: elevation.to_degrees(),
        range: d.norm(),
    }
}

/// Look angles from the observer to a satellite at `t`
pub fn to_look_angles(observer: &ObserverLocation, state: &InertialPosition, t: Timestamp) -> LookAngles {
    let target = teme_to_ecef(&state.position, gmst(t));
    look_angles_ecef(observer, &target)
}
