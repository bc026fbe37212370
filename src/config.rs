//! Configuration types for the place sorter

use crate::geocode::GeocoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    /// Move files to destination
    #[default]
    Move,
    /// Copy files to destination, leaving the source in place
    Copy,
}

/// What to do when a destination file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file (last write wins)
    #[default]
    Overwrite,
    /// Keep both by adding a numeric suffix: name_1.jpg, name_2.jpg, ...
    Suffix,
    /// Leave the source in place and report the file as failed
    Fail,
}

/// Configuration for the place sorter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned (non-recursively) for media files
    pub source_dir: PathBuf,

    /// Root of the date/place folders (defaults to the source directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Accepted file name suffixes (case-sensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File operation mode
    #[serde(default)]
    pub operation: FileOperation,

    /// Destination collision policy
    #[serde(default)]
    pub on_collision: CollisionPolicy,

    /// Dry run mode - plan everything but don't touch the filesystem
    #[serde(default)]
    pub dry_run: bool,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Reverse geocoding settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

fn default_extensions() -> Vec<String> {
    vec!["jpg".into(), "png".into(), "mov".into()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: None,
            extensions: default_extensions(),
            operation: FileOperation::default(),
            on_collision: CollisionPolicy::default(),
            dry_run: false,
            verbose: false,
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl Config {
    /// Check if a file name ends with one of the accepted suffixes
    pub fn is_supported(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Root under which date folders are created
    pub fn organizing_root(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.source_dir)
    }

    /// Check settings that would make a run meaningless
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.extensions.is_empty() {
            return Err(crate::Error::Config("no file extensions configured".into()));
        }
        // An empty suffix matches every file name
        if self.extensions.iter().any(|e| e.is_empty()) {
            return Err(crate::Error::Config(
                "file extensions must not be empty".into(),
            ));
        }
        if self.geocoder.enabled && self.geocoder.timeout_secs == 0 {
            return Err(crate::Error::Config(
                "geocoder timeout must be at least one second".into(),
            ));
        }
        if !self.source_dir.is_dir() {
            return Err(crate::Error::Config(format!(
                "source directory {} does not exist or is not a directory",
                self.source_dir.display()
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Write the sample configuration to a file, creating its directory
    pub fn write_sample<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::sample_config()).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Place Sorter Configuration File
# This file uses TOML format (https://toml.io)

# Directory holding the unorganized photos and videos (not scanned recursively)
source_dir = "/home/me/Dropbox/Camera Uploads"

# Root for the date/place folders; defaults to source_dir when omitted
# output_dir = "/home/me/Pictures/Sorted"

# Accepted file name endings (case-sensitive)
extensions = ["jpg", "png", "mov"]

# File operation: "move" or "copy"
operation = "move"

# When the destination file already exists: "overwrite", "suffix", or "fail"
# - overwrite: replace it (last write wins)
# - suffix: keep both, the new file becomes name_1.jpg
# - fail: leave the source where it is and report it
on_collision = "overwrite"

# Dry run mode - show what would be done without actually doing it
dry_run = false

# Verbose output - show detailed processing information
verbose = false

[geocoder]
# Set to false to file everything under "Unknown Location" without network access
enabled = true
base_url = "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer"
# api_key = "your ArcGIS token"
timeout_secs = 10
"#
        .to_string()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
        }
    }
}
