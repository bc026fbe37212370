//! CLI argument parsing with clap

use crate::config::{CollisionPolicy, Config, FileOperation};
use clap::Parser;
use std::path::PathBuf;

/// Place Sorter - file photos and videos by date and place
///
/// Moves every jpg/png/mov in a folder into `<date>/<place>/`, where the
/// date comes from the file name and the place from the GPS tags,
/// reverse-geocoded into a street or landmark name.
#[derive(Parser, Debug)]
#[command(name = "place-sorter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Directory holding the files to organize
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Directory holding the files to organize (same as SOURCE)
    #[arg(short, long, conflicts_with = "source")]
    pub input: Option<PathBuf>,

    /// Root for the date/place folders (defaults to the source directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File operation mode
    #[arg(short = 'O', long, value_enum)]
    pub operation: Option<FileOperation>,

    /// What to do when the destination file already exists
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// Dry run mode - show what would be done without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Geocoder request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// ArcGIS GeocodeServer base URL
    #[arg(long)]
    pub geocoder_url: Option<String>,

    /// ArcGIS access token
    #[arg(long, env = "PLACE_SORTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Skip reverse geocoding; every file goes to "Unknown Location"
    #[arg(long)]
    pub no_geocode: bool,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write a sample configuration file and exit
    #[arg(long, value_name = "FILE")]
    pub init_config: Option<PathBuf>,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Source directory given on the command line, positional or `--input`
    pub fn source_dir(&self) -> Option<&PathBuf> {
        self.source.as_ref().or(self.input.as_ref())
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(source) = self.source_dir() {
            config.source_dir = source.clone();
        }
        if let Some(ref output) = self.output {
            config.output_dir = Some(output.clone());
        }
        if let Some(operation) = self.operation {
            config.operation = operation;
        }
        if let Some(policy) = self.on_collision {
            config.on_collision = policy;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }
        if let Some(timeout) = self.timeout {
            config.geocoder.timeout_secs = timeout;
        }
        if let Some(ref url) = self.geocoder_url {
            config.geocoder.base_url = url.clone();
        }
        if let Some(ref key) = self.api_key {
            config.geocoder.api_key = Some(key.clone());
        }
        if self.no_geocode {
            config.geocoder.enabled = false;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    ///
    /// Without a source directory the current directory is organized.
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
