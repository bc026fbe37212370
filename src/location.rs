//! Place labels from reverse-geocoded addresses

use crate::error::{Error, Result};
use crate::geocode::ReverseGeocoder;
use crate::gps::Coordinate;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Folder name used when a file cannot be placed
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Leading street number followed by the street name
static STREET_NUMBER: OnceLock<Regex> = OnceLock::new();

fn street_number_pattern() -> &'static Regex {
    STREET_NUMBER.get_or_init(|| Regex::new(r"^[0-9]\S*\s+(.+)$").unwrap())
}

/// Short name of a location, usable as a single folder name
///
/// Never empty and never contains a path separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaceLabel(String);

impl PlaceLabel {
    /// Build a label, replacing path separators; blank input yields the unknown label
    pub fn new(name: &str) -> Self {
        let cleaned = name.trim().replace(['/', '\\'], "-");
        // "." and ".." would not name a folder of their own
        if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
            Self::unknown()
        } else {
            Self(cleaned)
        }
    }

    /// The "Unknown Location" sentinel
    pub fn unknown() -> Self {
        Self(UNKNOWN_LOCATION.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_LOCATION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for PlaceLabel {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

/// Derive a short label from a comma-separated address
///
/// Only the first component is used. A leading street number is dropped so
/// `"123 Main St, Springfield, USA"` becomes `"Main St"`, while named places
/// such as `"Central Park, New York, USA"` keep the whole component. An
/// address without commas is treated as a single component.
pub fn extract_label(full_address: &str) -> PlaceLabel {
    let first = full_address
        .split(',')
        .next()
        .unwrap_or(full_address)
        .trim();

    let label = match street_number_pattern().captures(first) {
        Some(caps) => caps.get(1).map_or(first, |m| m.as_str()),
        None => first,
    };

    PlaceLabel::new(label)
}

/// Resolves coordinates to place labels through a reverse geocoder
pub struct LocationResolver {
    geocoder: Option<Box<dyn ReverseGeocoder>>,
}

impl LocationResolver {
    pub fn new(geocoder: Box<dyn ReverseGeocoder>) -> Self {
        Self {
            geocoder: Some(geocoder),
        }
    }

    /// A resolver that never contacts a service
    pub fn disabled() -> Self {
        Self { geocoder: None }
    }

    /// Resolve a label, reporting why no place name could be obtained
    pub fn try_resolve(&self, coordinate: Coordinate) -> Result<PlaceLabel> {
        let geocoder = self
            .geocoder
            .as_ref()
            .ok_or_else(|| Error::GeocodingUnavailable("geocoding is disabled".into()))?;

        let address = geocoder
            .reverse(coordinate)
            .map_err(|e| {
                if e.is_timeout() {
                    Error::GeocodingUnavailable(format!("request timed out: {}", e))
                } else {
                    Error::GeocodingUnavailable(e.to_string())
                }
            })?
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| {
                Error::GeocodingUnavailable(format!("no address found at {}", coordinate))
            })?;

        let label = extract_label(&address);
        debug!(%coordinate, %address, %label, "Resolved place label");
        Ok(label)
    }

    /// Resolve a label, falling back to "Unknown Location" on any failure
    pub fn resolve(&self, coordinate: Coordinate) -> PlaceLabel {
        self.try_resolve(coordinate).unwrap_or_else(|e| {
            warn!(%coordinate, error = %e, "Falling back to unknown location");
            PlaceLabel::unknown()
        })
    }
}
