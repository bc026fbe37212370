//! Source directory scanning

use crate::config::Config;
use crate::error::Result;
use crate::planner::CandidateFile;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect the regular files directly inside `source_dir` whose names end
/// with one of the configured suffixes, sorted by name.
pub fn collect_candidates(source_dir: &Path, config: &Config) -> Result<Vec<CandidateFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The source directory itself could not be read
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = ?entry.path(), "Skipping file with a non UTF-8 name");
            continue;
        };

        if config.is_supported(name) {
            files.push(CandidateFile::new(name, entry.path()));
        } else {
            debug!(name, "Ignoring unsupported file");
        }
    }

    files.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(files)
}
