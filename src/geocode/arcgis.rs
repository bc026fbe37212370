//! ArcGIS World GeocodeServer client.
//!
//! The public endpoint answers anonymous requests; a token can be supplied
//! through configuration for accounts that need one.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GeocodeError, ReverseGeocoder};
use crate::gps::Coordinate;

const DEFAULT_BASE_URL: &str =
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer";

/// Geocoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Disable to organize every file under "Unknown Location" without network access.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// GeocodeServer base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional ArcGIS access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("place-sorter/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// ArcGIS reverse geocoding client.
pub struct ArcGisGeocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ArcGisGeocoder {
    /// Create a new client.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        if config.timeout_secs == 0 {
            return Err(GeocodeError::NotConfigured(
                "timeout must be at least one second".into(),
            ));
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }
}

impl ReverseGeocoder for ArcGisGeocoder {
    fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/reverseGeocode", self.base_url);
        // ArcGIS expects x,y order
        let location = format!("{},{}", coordinate.longitude, coordinate.latitude);

        debug!(%coordinate, "ArcGIS reverse geocode");

        let mut request = self
            .client
            .get(&url)
            .query(&[("location", location.as_str()), ("f", "json")]);
        if let Some(ref token) = self.api_key {
            request = request.query(&[("token", token.as_str())]);
        }

        let response = request.send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), "ArcGIS request rejected");
            return Err(GeocodeError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text()?;
        parse_reverse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ArcGisAddress>,
    error: Option<ArcGisError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArcGisAddress {
    #[serde(rename = "Match_addr")]
    match_addr: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Postal")]
    postal: String,
    #[serde(rename = "CountryCode")]
    country_code: String,
}

#[derive(Debug, Deserialize)]
struct ArcGisError {
    code: u16,
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

/// Parse a `reverseGeocode` JSON body into a full address string.
fn parse_reverse_response(body: &str) -> Result<Option<String>, GeocodeError> {
    let response: ReverseResponse = serde_json::from_str(body)
        .map_err(|e| GeocodeError::ParseError(format!("Failed to parse reverse response: {}", e)))?;

    if let Some(error) = response.error {
        if error
            .details
            .iter()
            .any(|d| d.contains("Unable to find address"))
        {
            debug!("ArcGIS found no address at this location");
            return Ok(None);
        }
        return Err(GeocodeError::ApiError {
            status: error.code,
            message: error.message,
        });
    }

    Ok(response.address.as_ref().and_then(format_address))
}

/// Assemble `Address, City, Region Postal, CountryCode`, skipping empty parts.
fn format_address(address: &ArcGisAddress) -> Option<String> {
    let region_postal = format!("{} {}", address.region.trim(), address.postal.trim());
    let parts: Vec<&str> = [
        address.address.trim(),
        address.city.trim(),
        region_postal.trim(),
        address.country_code.trim(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect();

    if !parts.is_empty() {
        return Some(parts.join(", "));
    }

    let fallback = address.match_addr.trim();
    (!fallback.is_empty()).then(|| fallback.to_string())
}
