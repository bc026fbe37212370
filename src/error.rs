//! Error types for the place sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for place sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the place sorter
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Malformed coordinate: {0}")]
    MalformedCoordinate(String),

    #[error("Incomplete GPS tag set: found {found} of 4 tags")]
    PartialGpsTagSet { found: usize },

    #[error("Geocoding unavailable: {0}")]
    GeocodingUnavailable(String),

    #[error("Invalid file name '{name}': {message}")]
    InvalidFileName { name: String, message: String },

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move {source_path} to {destination}: {source}")]
    MoveFailed {
        source_path: PathBuf,
        destination: PathBuf,
        source: std::io::Error,
    },

    #[error("Destination already exists: {0}")]
    DestinationCollision(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
