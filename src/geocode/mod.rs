//! Reverse geocoding
//!
//! Turns a coordinate into a full postal address string. The pipeline only
//! depends on the [`ReverseGeocoder`] trait; [`ArcGisGeocoder`] is the
//! network-backed implementation.

mod arcgis;

pub use arcgis::{ArcGisGeocoder, GeocoderConfig};

use crate::gps::Coordinate;
use thiserror::Error;

/// Errors that can occur when talking to a geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Service answered with an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not usable with the current configuration.
    #[error("Geocoder not configured: {0}")]
    NotConfigured(String),
}

impl GeocodeError {
    /// Whether the request ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeocodeError::HttpError(e) if e.is_timeout())
    }
}

/// A service that maps coordinates to addresses.
pub trait ReverseGeocoder {
    /// Look up the address at `coordinate`.
    ///
    /// `Ok(None)` means the service had no address for that location.
    fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError>;
}
