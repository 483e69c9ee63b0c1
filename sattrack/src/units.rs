//! A lightweight uom-ish library. The real thing breaks rust-analyzer.

use std::f64::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tletypes::time::UtcTimestamp;

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Length {
    kilometers: f64,
}

impl std::fmt::Debug for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", self.kilometers)
    }
}

impl Length {
    pub fn from_meters(meters: f64) -> Length {
        Length {
            kilometers: meters / 1000.0,
        }
    }

    pub fn from_kilometers(kilometers: f64) -> Length {
        Length { kilometers }
    }

    pub fn as_meters(&self) -> f64 {
        self.kilometers * 1000.0
    }

    pub fn as_kilometers(&self) -> f64 {
        self.kilometers
    }
}

impl Add<Length> for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Self::Output {
        Length::from_kilometers(self.as_kilometers() + rhs.as_kilometers())
    }
}

impl Sub<Length> for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Self::Output {
        Length::from_kilometers(self.as_kilometers() - rhs.as_kilometers())
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f64,
}

impl std::fmt::Debug for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.as_degrees())
    }
}

impl Angle {
    pub fn from_degrees(degrees: f64) -> Angle {
        Angle {
            radians: degrees.to_radians(),
        }
    }

    pub fn from_radians(radians: f64) -> Angle {
        Angle { radians }
    }

    pub fn as_degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    pub fn as_radians(&self) -> f64 {
        self.radians
    }

    /// Wrapped into [0, 2π)
    pub fn wrap_two_pi(&self) -> Angle {
        Angle::from_radians(self.radians.rem_euclid(TAU))
    }

    /// Wrapped into [-π, π)
    pub fn wrap_pi(&self) -> Angle {
        Angle::from_radians((self.radians + PI).rem_euclid(TAU) - PI)
    }
}

impl Add<Angle> for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Self::Output {
        Angle::from_radians(self.as_radians() + rhs.as_radians())
    }
}

impl Sub<Angle> for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Self::Output {
        Angle::from_radians(self.as_radians() - rhs.as_radians())
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Time {
    seconds: f64,
}

impl std::fmt::Debug for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} s", self.seconds)
    }
}

impl Time {
    pub fn from_chrono_duration(duration: chrono::Duration) -> Time {
        let seconds = match duration.num_microseconds() {
            Some(us) => us as f64 / 1_000_000.0,
            None => duration.num_milliseconds() as f64 / 1_000.0,
        };
        Time { seconds }
    }

    pub const fn from_secs(seconds: f64) -> Time {
        Time { seconds }
    }

    pub fn from_minutes(minutes: f64) -> Time {
        Self::from_secs(minutes * 60.0)
    }

    pub fn from_hours(hours: f64) -> Time {
        Self::from_minutes(hours * 60.0)
    }

    pub fn as_secs(&self) -> f64 {
        self.seconds
    }

    pub fn as_minutes(&self) -> f64 {
        self.seconds / 60.0
    }

    /// Negative times clamp to zero
    pub fn as_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.seconds.max(0.0))
    }
}

impl Add<Time> for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Self::Output {
        Time::from_secs(self.as_secs() + rhs.as_secs())
    }
}

impl Sub<Time> for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Self::Output {
        Time::from_secs(self.as_secs() - rhs.as_secs())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Timestamp {
    utc: UtcTimestamp,
}

impl std::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.utc)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.utc)
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    /// RFC 3339, e.g. 2020-07-12T21:00:00Z
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let utc = DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc);
        Ok(Timestamp::from_utc(utc))
    }
}

impl Timestamp {
    pub fn now() -> Timestamp {
        Timestamp::from_utc(Utc::now())
    }

    pub fn from_utc(utc: UtcTimestamp) -> Timestamp {
        Timestamp { utc }
    }

    pub fn from_naive_utc(naive: NaiveDateTime) -> Timestamp {
        Timestamp::from_utc(DateTime::from_naive_utc_and_offset(naive, Utc))
    }

    pub fn as_utc(&self) -> &UtcTimestamp {
        &self.utc
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Time;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        Time::from_chrono_duration(*self.as_utc() - *rhs.as_utc())
    }
}

impl Add<Time> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Time) -> Self::Output {
        let mut ts = self;
        ts += rhs;
        ts
    }
}

impl AddAssign<Time> for Timestamp {
    fn add_assign(&mut self, rhs: Time) {
        self.utc += chrono::Duration::microseconds((rhs.as_secs() * 1_000_000.0) as i64);
    }
}
