//! Shaping raw metadata tags into a GPS record
//!
//! The metadata reader hands over loosely typed tag values. This adapter looks
//! up the four GPS tags directly, validates their shape once, and yields a
//! complete [`GpsRecord`] or nothing.

use super::{Axis, Dms, GpsRecord, Hemisphere, Rational};
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::{trace, warn};

/// The GPS tags needed to place a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpsTag {
    LatitudeRef,
    Latitude,
    LongitudeRef,
    Longitude,
}

impl GpsTag {
    pub const ALL: [GpsTag; 4] = [
        GpsTag::LatitudeRef,
        GpsTag::Latitude,
        GpsTag::LongitudeRef,
        GpsTag::Longitude,
    ];

    /// EXIF tag name
    pub fn name(self) -> &'static str {
        match self {
            GpsTag::LatitudeRef => "GPSLatitudeRef",
            GpsTag::Latitude => "GPSLatitude",
            GpsTag::LongitudeRef => "GPSLongitudeRef",
            GpsTag::Longitude => "GPSLongitude",
        }
    }
}

/// A tag value as delivered by the metadata reader
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Compass direction and other ASCII values
    Text(String),
    /// DMS components and other rational sequences
    Rationals(Vec<Rational>),
}

/// GPS tag values read from one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTags {
    values: HashMap<GpsTag, TagValue>,
}

impl RawTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: GpsTag, value: TagValue) {
        self.values.insert(tag, value);
    }

    pub fn get(&self, tag: GpsTag) -> Option<&TagValue> {
        self.values.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(GpsTag, TagValue)> for RawTags {
    fn from_iter<I: IntoIterator<Item = (GpsTag, TagValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Extract a GPS record, treating any incomplete or malformed tag set as absent
pub fn extract_gps(tags: &RawTags) -> Option<GpsRecord> {
    match try_extract_gps(tags) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "Ignoring unusable GPS tags");
            None
        }
    }
}

/// Extract a GPS record, reporting why a present tag set could not be used
///
/// Returns `Ok(None)` when none of the four tags exist,
/// [`Error::PartialGpsTagSet`] when only some do, and
/// [`Error::MalformedCoordinate`] when a value has the wrong shape.
pub fn try_extract_gps(tags: &RawTags) -> Result<Option<GpsRecord>> {
    let found = GpsTag::ALL
        .iter()
        .filter(|tag| tags.get(**tag).is_some())
        .count();

    if found == 0 {
        trace!("No GPS tags present");
        return Ok(None);
    }
    if found != GpsTag::ALL.len() {
        return Err(Error::PartialGpsTagSet { found });
    }

    Ok(Some(GpsRecord {
        latitude: dms_value(tags, GpsTag::Latitude)?,
        latitude_ref: hemisphere_value(tags, GpsTag::LatitudeRef, Axis::Latitude)?,
        longitude: dms_value(tags, GpsTag::Longitude)?,
        longitude_ref: hemisphere_value(tags, GpsTag::LongitudeRef, Axis::Longitude)?,
    }))
}

fn dms_value(tags: &RawTags, tag: GpsTag) -> Result<Dms> {
    match tags.get(tag) {
        Some(TagValue::Rationals(values)) => Dms::from_slice(values).ok_or_else(|| {
            Error::MalformedCoordinate(format!(
                "{} has {} components, expected 3",
                tag.name(),
                values.len()
            ))
        }),
        other => Err(shape_error(tag, other)),
    }
}

fn hemisphere_value(tags: &RawTags, tag: GpsTag, axis: Axis) -> Result<Hemisphere> {
    match tags.get(tag) {
        Some(TagValue::Text(text)) => Hemisphere::from_ref(text)
            .filter(|hemisphere| hemisphere.axis() == axis)
            .ok_or_else(|| {
                Error::MalformedCoordinate(format!(
                    "{} '{}' is not a {} direction",
                    tag.name(),
                    text,
                    axis.name()
                ))
            }),
        other => Err(shape_error(tag, other)),
    }
}

fn shape_error(tag: GpsTag, value: Option<&TagValue>) -> Error {
    Error::MalformedCoordinate(format!("{} has unexpected value {:?}", tag.name(), value))
}
