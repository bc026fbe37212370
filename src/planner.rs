//! Destination planning
//!
//! Computes where a file goes: `root / dateKey / place / name`. Planning is
//! pure; nothing here touches the filesystem.

use crate::error::{Error, Result};
use crate::location::PlaceLabel;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Number of leading file name characters that form the date folder name
const DATE_KEY_LEN: usize = 10;

/// A file found in the source directory awaiting organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    source_path: PathBuf,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
        }
    }

    /// File name including extension
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// The computed, not yet executed destination of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationPlan {
    pub source: PathBuf,
    /// `root / dateKey`
    pub outer_dir: PathBuf,
    /// `outer_dir / place label`
    pub inner_dir: PathBuf,
    /// `inner_dir / file name`
    pub destination: PathBuf,
}

/// Date folder name: the first ten characters of the file name
///
/// Camera uploads are named `YYYY-MM-DD ...`; the prefix is used as-is and
/// not parsed into a timestamp.
pub fn date_key(name: &str) -> Result<&str> {
    let end = match name.char_indices().nth(DATE_KEY_LEN) {
        Some((index, _)) => index,
        None if name.chars().count() == DATE_KEY_LEN => name.len(),
        None => {
            return Err(Error::InvalidFileName {
                name: name.to_string(),
                message: format!("shorter than {} characters", DATE_KEY_LEN),
            });
        }
    };

    let key = &name[..end];
    if key.contains(['/', '\\']) || key.trim().is_empty() || key.chars().all(|c| c == '.') {
        return Err(Error::InvalidFileName {
            name: name.to_string(),
            message: format!("'{}' cannot be used as a folder name", key),
        });
    }

    if NaiveDate::parse_from_str(key, "%Y-%m-%d").is_err() {
        debug!(name, key, "Date prefix does not look like YYYY-MM-DD");
    }

    Ok(key)
}

/// Plan the destination of `file`
pub fn plan(
    file: &CandidateFile,
    date_key: &str,
    place: &PlaceLabel,
    organizing_root: &Path,
) -> OrganizationPlan {
    let outer_dir = organizing_root.join(date_key);
    let inner_dir = outer_dir.join(place);
    let destination = inner_dir.join(file.name());

    OrganizationPlan {
        source: file.source_path().to_path_buf(),
        outer_dir,
        inner_dir,
        destination,
    }
}
