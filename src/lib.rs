//! Place Sorter - file photos and videos by capture date and place
//!
//! This library provides functionality for organizing media files into
//! `<date>/<place>/` folders with support for:
//! - GPS extraction from EXIF metadata
//! - DMS to decimal degree conversion
//! - Reverse geocoding through ArcGIS
//! - Deterministic destination planning with collision policies
//! - Per-file failure isolation and JSON run reports

pub mod cli;
pub mod config;
pub mod error;
pub mod geocode;
pub mod gps;
pub mod location;
pub mod planner;
pub mod process;
pub mod scan;

pub use cli::Cli;
pub use config::{CollisionPolicy, Config, ConfigError, FileOperation};
pub use error::{Error, Result};
pub use geocode::{ArcGisGeocoder, GeocodeError, GeocoderConfig, ReverseGeocoder};
pub use gps::{Coordinate, GpsRecord, to_decimal_degrees};
pub use location::{LocationResolver, PlaceLabel, extract_label};
pub use planner::{CandidateFile, OrganizationPlan, plan};
pub use process::{Organizer, RunReport};
