//! GPS coordinate handling
//!
//! This module turns the degrees/minutes/seconds readings stored in image
//! metadata into signed decimal degrees:
//! - `tags` shapes raw metadata tags into an optional [`GpsRecord`]
//! - `exif` reads those tags from image files
//! - [`to_decimal_degrees`] and [`Coordinate::from_record`] do the conversion

pub mod exif;
pub mod tags;

pub use tags::{GpsTag, RawTags, TagValue, extract_gps, try_extract_gps};

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// An unsigned EXIF rational (numerator / denominator)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: u32,
    pub den: u32,
}

impl Rational {
    pub fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Value as a float, or `None` when the denominator is zero
    pub fn to_f64(self) -> Option<f64> {
        if self.den == 0 {
            None
        } else {
            Some(self.num as f64 / self.den as f64)
        }
    }
}

impl From<(u32, u32)> for Rational {
    fn from((num, den): (u32, u32)) -> Self {
        Self::new(num, den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Degrees, minutes and seconds of one angular reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
    pub degrees: Rational,
    pub minutes: Rational,
    pub seconds: Rational,
}

impl Dms {
    /// Build from `(numerator, denominator)` pairs
    pub fn new(degrees: (u32, u32), minutes: (u32, u32), seconds: (u32, u32)) -> Self {
        Self {
            degrees: degrees.into(),
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    /// Build from an ordered slice; anything but exactly three values is rejected
    pub fn from_slice(values: &[Rational]) -> Option<Self> {
        match values {
            [degrees, minutes, seconds] => Some(Self {
                degrees: *degrees,
                minutes: *minutes,
                seconds: *seconds,
            }),
            _ => None,
        }
    }
}

/// Compass direction recorded next to a DMS reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Parse an EXIF reference value (`N`, `S`, `E` or `W`)
    ///
    /// EXIF ASCII values may carry trailing NULs or padding, which are ignored.
    pub fn from_ref(value: &str) -> Option<Self> {
        match value.trim_matches(|c: char| c == '\0' || c.is_whitespace()) {
            "N" => Some(Hemisphere::North),
            "S" => Some(Hemisphere::South),
            "E" => Some(Hemisphere::East),
            "W" => Some(Hemisphere::West),
            _ => None,
        }
    }

    /// The axis this direction belongs to
    pub fn axis(self) -> Axis {
        match self {
            Hemisphere::North | Hemisphere::South => Axis::Latitude,
            Hemisphere::East | Hemisphere::West => Axis::Longitude,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Hemisphere::South | Hemisphere::West => -1.0,
            Hemisphere::North | Hemisphere::East => 1.0,
        }
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest valid magnitude in decimal degrees
    pub fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

/// GPS readings of one file, always complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsRecord {
    pub latitude: Dms,
    pub latitude_ref: Hemisphere,
    pub longitude: Dms,
    pub longitude_ref: Hemisphere,
}

/// A resolved pair of signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_range(latitude, Axis::Latitude)?;
        check_range(longitude, Axis::Longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Convert both axes of a GPS record
    pub fn from_record(record: &GpsRecord) -> Result<Self> {
        expect_axis(record.latitude_ref, Axis::Latitude)?;
        expect_axis(record.longitude_ref, Axis::Longitude)?;

        let latitude = to_decimal_degrees(&record.latitude, record.latitude_ref)?;
        let longitude = to_decimal_degrees(&record.longitude, record.longitude_ref)?;

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Convert a DMS reading into signed decimal degrees
///
/// `value = deg + min / 60 + sec / 3600`, negated for `S` and `W`. The axis
/// (and therefore the valid range) follows from the hemisphere.
pub fn to_decimal_degrees(dms: &Dms, hemisphere: Hemisphere) -> Result<f64> {
    let axis = hemisphere.axis();

    let degrees = component(dms.degrees, "degrees", axis)?;
    let minutes = component(dms.minutes, "minutes", axis)?;
    let seconds = component(dms.seconds, "seconds", axis)?;

    let mut value = 0.0;
    value += degrees / 1.0;
    value += minutes / 60.0;
    value += seconds / 3600.0;
    value *= hemisphere.sign();

    check_range(value, axis)?;
    Ok(value)
}

fn component(value: Rational, unit: &str, axis: Axis) -> Result<f64> {
    value.to_f64().ok_or_else(|| {
        Error::MalformedCoordinate(format!(
            "{} {} has a zero denominator ({})",
            axis.name(),
            unit,
            value
        ))
    })
}

fn check_range(value: f64, axis: Axis) -> Result<()> {
    if !value.is_finite() || value.abs() > axis.limit() {
        return Err(Error::MalformedCoordinate(format!(
            "{} {} is outside [-{limit}, {limit}]",
            axis.name(),
            value,
            limit = axis.limit()
        )));
    }
    Ok(())
}

fn expect_axis(hemisphere: Hemisphere, axis: Axis) -> Result<()> {
    if hemisphere.axis() != axis {
        return Err(Error::MalformedCoordinate(format!(
            "{:?} is not a valid {} reference",
            hemisphere,
            axis.name()
        )));
    }
    Ok(())
}
