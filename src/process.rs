//! Organizer pipeline
//!
//! Handles the core logic of:
//! - Scanning the source directory
//! - Reading GPS tags and converting them to coordinates
//! - Resolving a place label through reverse geocoding
//! - Planning and executing the move into `date/place/`
//!
//! Files are processed one after another. A failure only affects the file it
//! happened on; the run goes on and reports it at the end.

use crate::config::{CollisionPolicy, Config, FileOperation};
use crate::error::{Error, Result};
use crate::geocode::ArcGisGeocoder;
use crate::gps::exif::{ExifTagReader, TagReader};
use crate::gps::{Coordinate, extract_gps};
use crate::location::{LocationResolver, PlaceLabel};
use crate::planner::{CandidateFile, OrganizationPlan, date_key, plan};
use crate::scan::collect_candidates;

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, error, info, span, warn};

/// Last pipeline stage a file reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStage {
    Scanned,
    MetadataRead,
    GeoResolved,
    NoGps,
    Planned,
    Moved,
}

/// Status of file processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingStatus {
    /// File was moved (or copied) into place
    Success,
    /// Dry run - would have been moved
    DryRun,
    /// Processing failed
    Failed,
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Destination file path (once planned)
    pub destination: Option<PathBuf>,
    /// Place folder the file was assigned to
    pub place: Option<PlaceLabel>,
    /// Whether a place name was resolved from GPS data
    pub geotagged: bool,
    /// Last stage reached
    pub stage: FileStage,
    /// Processing status
    pub status: ProcessingStatus,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl FileResult {
    fn failed(source: &Path, stage: FileStage, error: &Error) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: None,
            place: None,
            geotagged: false,
            stage,
            status: ProcessingStatus::Failed,
            error: Some(error.to_string()),
        }
    }
}

/// Processing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    /// Candidate files found in the source directory
    pub found: usize,
    /// Files organized under a resolved place name
    pub geotagged: usize,
    /// Files organized under "Unknown Location"
    pub non_geotagged: usize,
    /// Files moved (or copied) into place
    pub moved: usize,
    /// Files planned without touching the filesystem (dry run)
    pub planned: usize,
    /// Files that could not be organized
    pub failed: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "Found: {}, Geotagged: {}, Non-geotagged: {}, Moved: {}, Planned: {}, Failed: {}",
            self.found,
            self.geotagged,
            self.non_geotagged,
            self.moved,
            self.planned,
            self.failed
        )
    }
}

/// Outcome of one organizer run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub stats: ProcessingStats,
    pub results: Vec<FileResult>,
}

impl RunReport {
    /// Files that could not be organized
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results
            .iter()
            .filter(|r| r.status == ProcessingStatus::Failed)
    }

    /// Write the report as pretty JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Outcome of the metadata and geocoding stages
struct Classification {
    place: PlaceLabel,
    geotagged: bool,
    stage: FileStage,
}

/// Main organizer for media files
pub struct Organizer {
    config: Config,
    reader: Box<dyn TagReader>,
    resolver: LocationResolver,
    stats: ProcessingStats,
}

impl Organizer {
    /// Create an organizer reading EXIF tags and geocoding through ArcGIS
    pub fn new(config: Config) -> Result<Self> {
        let resolver = if config.geocoder.enabled {
            let geocoder = ArcGisGeocoder::new(&config.geocoder)
                .map_err(|e| Error::Config(format!("geocoder: {}", e)))?;
            LocationResolver::new(Box::new(geocoder))
        } else {
            info!("Geocoding disabled, all files go to the unknown location");
            LocationResolver::disabled()
        };

        Ok(Self::with_collaborators(
            config,
            Box::new(ExifTagReader::new()),
            resolver,
        ))
    }

    /// Create an organizer with explicit tag reader and resolver
    pub fn with_collaborators(
        config: Config,
        reader: Box<dyn TagReader>,
        resolver: LocationResolver,
    ) -> Self {
        Self {
            config,
            reader,
            resolver,
            stats: ProcessingStats::new(),
        }
    }

    /// Run the pipeline over every candidate file
    pub fn run(&mut self) -> Result<RunReport> {
        let _span = span!(Level::INFO, "organizer_run").entered();
        self.stats = ProcessingStats::new();

        info!(source = %self.config.source_dir.display(), "Scanning source directory...");
        let files = collect_candidates(&self.config.source_dir, &self.config)?;
        self.stats.found = files.len();
        info!(count = files.len(), "Found media files");

        if files.is_empty() {
            info!("No unorganized files found, nothing to do");
            return Ok(RunReport::default());
        }

        if !self.config.dry_run {
            fs::create_dir_all(self.config.organizing_root())?;
        }

        let results: Vec<FileResult> = files.iter().map(|file| self.organize_file(file)).collect();

        info!("{}", self.stats.summary());

        Ok(RunReport {
            stats: self.stats.clone(),
            results,
        })
    }

    /// Get processing statistics of the last run
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    fn organize_file(&mut self, file: &CandidateFile) -> FileResult {
        let _file_span = span!(Level::DEBUG, "organize_file", name = file.name()).entered();

        let Classification {
            place,
            geotagged,
            stage,
        } = self.classify(file);

        if geotagged {
            self.stats.geotagged += 1;
        } else {
            self.stats.non_geotagged += 1;
        }

        let key = match date_key(file.name()) {
            Ok(key) => key,
            Err(e) => {
                error!(source = ?file.source_path(), error = %e, "Failed to plan destination");
                self.stats.failed += 1;
                let mut result = FileResult::failed(file.source_path(), stage, &e);
                result.place = Some(place);
                result.geotagged = geotagged;
                return result;
            }
        };

        let plan = plan(file, key, &place, self.config.organizing_root());
        debug!(destination = ?plan.destination, "Planned");

        let mut result = FileResult {
            source: plan.source.clone(),
            destination: Some(plan.destination.clone()),
            place: Some(place),
            geotagged,
            stage: FileStage::Planned,
            status: ProcessingStatus::DryRun,
            error: None,
        };

        if self.config.dry_run {
            info!(source = ?plan.source, destination = ?plan.destination, "Would move file");
            self.stats.planned += 1;
            return result;
        }

        match execute_plan(&plan, &self.config) {
            Ok(destination) => {
                info!(source = ?plan.source, destination = ?destination, "Moved file");
                self.stats.moved += 1;
                result.destination = Some(destination);
                result.stage = FileStage::Moved;
                result.status = ProcessingStatus::Success;
            }
            Err(e) => {
                error!(source = ?plan.source, destination = ?plan.destination, error = %e, "Failed to move file");
                self.stats.failed += 1;
                result.status = ProcessingStatus::Failed;
                result.error = Some(e.to_string());
            }
        }

        result
    }

    /// Read metadata, convert coordinates and resolve a place label
    fn classify(&self, file: &CandidateFile) -> Classification {
        let no_gps = Classification {
            place: PlaceLabel::unknown(),
            geotagged: false,
            stage: FileStage::NoGps,
        };

        let tags = match self.reader.read_tags(file.source_path()) {
            Ok(tags) => tags,
            Err(e) => {
                warn!(error = %e, "Could not read metadata, treating as untagged");
                return no_gps;
            }
        };

        let Some(record) = extract_gps(&tags) else {
            debug!("No GPS data");
            return no_gps;
        };

        let coordinate = match Coordinate::from_record(&record) {
            Ok(coordinate) => coordinate,
            Err(e) => {
                warn!(error = %e, "Discarding malformed GPS data");
                return no_gps;
            }
        };

        match self.resolver.try_resolve(coordinate) {
            Ok(place) => Classification {
                place,
                geotagged: true,
                stage: FileStage::GeoResolved,
            },
            Err(e) => {
                warn!(%coordinate, error = %e, "Falling back to unknown location");
                no_gps
            }
        }
    }
}

/// Create `path` unless it already exists as a directory
///
/// Only the last component is created; its parent must exist.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    match fs::create_dir(path) {
        Ok(()) => {
            debug!(?path, "Created directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Create the plan's folders and move the file, returning the final destination
fn execute_plan(plan: &OrganizationPlan, config: &Config) -> Result<PathBuf> {
    ensure_dir(&plan.outer_dir)?;
    ensure_dir(&plan.inner_dir)?;

    let destination = resolve_collision(&plan.destination, config.on_collision)?;

    let outcome = match config.operation {
        FileOperation::Move => move_file(&plan.source, &destination),
        FileOperation::Copy => copy_file(&plan.source, &destination),
    };

    outcome.map_err(|e| Error::MoveFailed {
        source_path: plan.source.clone(),
        destination: destination.clone(),
        source: e,
    })?;

    Ok(destination)
}

/// Apply the collision policy to a planned destination
fn resolve_collision(path: &Path, policy: CollisionPolicy) -> Result<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    match policy {
        CollisionPolicy::Overwrite => {
            debug!(?path, "Overwriting existing file");
            Ok(path.to_path_buf())
        }
        CollisionPolicy::Fail => Err(Error::DestinationCollision(path.to_path_buf())),
        CollisionPolicy::Suffix => with_numeric_suffix(path),
    }
}

/// Find the first free `stem_N.ext` next to `path`
fn with_numeric_suffix(path: &Path) -> Result<PathBuf> {
    let invalid = || Error::InvalidFileName {
        name: path.display().to_string(),
        message: "cannot derive an alternative name".into(),
    };

    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let parent = path.parent().ok_or_else(invalid)?;

    for i in 1..10000 {
        let candidate = parent.join(format!("{}_{}{}", stem, i, extension));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(Error::DestinationCollision(path.to_path_buf()))
}

/// Rename, falling back to copy + delete across filesystems
fn move_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    if let Err(e) = fs::rename(source, dest) {
        debug!(?source, error = %e, "Rename failed, copying instead");
        copy_file(source, dest)?;
        fs::remove_file(source)?;
    }
    Ok(())
}

/// Copy file with buffered I/O, keeping the modification time
fn copy_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }
    writer.flush()?;

    if let Ok(metadata) = fs::metadata(source)
        && let Ok(mtime) = metadata.modified()
    {
        let _ = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{GeocodeError, ReverseGeocoder};
    use crate::gps::{GpsTag, Rational, RawTags, TagValue};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use tempfile::{TempDir, tempdir};

    /// Serves GPS tags by file name
    #[derive(Default)]
    struct StubReader {
        tags: HashMap<String, RawTags>,
    }

    impl TagReader for StubReader {
        fn read_tags(&self, path: &Path) -> Result<RawTags> {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            Ok(self.tags.get(name).cloned().unwrap_or_default())
        }
    }

    /// Answers with a fixed address and records every lookup
    struct StubGeocoder {
        address: Option<&'static str>,
        calls: Rc<RefCell<Vec<Coordinate>>>,
    }

    impl ReverseGeocoder for StubGeocoder {
        fn reverse(&self, coordinate: Coordinate) -> std::result::Result<Option<String>, GeocodeError> {
            self.calls.borrow_mut().push(coordinate);
            match self.address {
                Some(address) => Ok(Some(address.to_string())),
                None => Err(GeocodeError::ApiError {
                    status: 500,
                    message: "boom".into(),
                }),
            }
        }
    }

    fn empire_state_tags() -> RawTags {
        let dms = |d, m, s| {
            TagValue::Rationals(vec![Rational::new(d, 1), Rational::new(m, 1), Rational::new(s, 1)])
        };
        [
            (GpsTag::LatitudeRef, TagValue::Text("N".into())),
            (GpsTag::Latitude, dms(40, 44, 54)),
            (GpsTag::LongitudeRef, TagValue::Text("W".into())),
            (GpsTag::Longitude, dms(73, 59, 9)),
        ]
        .into_iter()
        .collect()
    }

    struct Fixture {
        dir: TempDir,
        reader: StubReader,
        address: Option<&'static str>,
        calls: Rc<RefCell<Vec<Coordinate>>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempdir().unwrap(),
                reader: StubReader::default(),
                address: Some("350 5th Ave, New York, NY 10118, USA"),
                calls: Rc::default(),
            }
        }

        fn add_file(&mut self, name: &str, tags: Option<RawTags>) {
            fs::write(self.dir.path().join(name), name.as_bytes()).unwrap();
            if let Some(tags) = tags {
                self.reader.tags.insert(name.to_string(), tags);
            }
        }

        fn config(&self) -> Config {
            Config {
                source_dir: self.dir.path().to_path_buf(),
                ..Default::default()
            }
        }

        fn organizer(self, config: Config) -> (Organizer, TempDir, Rc<RefCell<Vec<Coordinate>>>) {
            let geocoder = StubGeocoder {
                address: self.address,
                calls: self.calls.clone(),
            };
            let organizer = Organizer::with_collaborators(
                config,
                Box::new(self.reader),
                LocationResolver::new(Box::new(geocoder)),
            );
            (organizer, self.dir, self.calls)
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut fixture = Fixture::new();
        fixture.add_file("2023-05-01_001.jpg", Some(empire_state_tags()));
        fixture.add_file("2023-05-02_002.mov", None);
        let config = fixture.config();
        let (mut organizer, dir, calls) = fixture.organizer(config);

        let report = organizer.run().unwrap();
        let root = dir.path();

        assert!(root.join("2023-05-01/5th Ave/2023-05-01_001.jpg").is_file());
        assert!(root.join("2023-05-02/Unknown Location/2023-05-02_002.mov").is_file());
        assert!(!root.join("2023-05-01_001.jpg").exists());
        assert!(!root.join("2023-05-02_002.mov").exists());

        assert_eq!(report.stats.found, 2);
        assert_eq!(report.stats.geotagged, 1);
        assert_eq!(report.stats.non_geotagged, 1);
        assert_eq!(report.stats.moved, 2);
        assert_eq!(report.stats.failed, 0);
        assert_eq!(organizer.stats(), &report.stats);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!((calls[0].latitude - 40.748333).abs() < 1e-6);
        assert!((calls[0].longitude + 73.985833).abs() < 1e-6);

        let jpg = &report.results[0];
        assert_eq!(jpg.stage, FileStage::Moved);
        assert_eq!(jpg.status, ProcessingStatus::Success);
        assert!(jpg.geotagged);
        assert_eq!(jpg.place.as_ref().map(|p| p.as_str()), Some("5th Ave"));
    }

    #[test]
    fn test_untagged_files_always_go_to_unknown_location() {
        let mut fixture = Fixture::new();
        fixture.add_file("2023-06-01_a.jpg", Some(empire_state_tags()));
        fixture.add_file("2023-06-01_b.jpg", None);
        fixture.add_file("2023-06-01_c.png", None);
        let config = fixture.config();
        let (mut organizer, dir, _) = fixture.organizer(config);

        let report = organizer.run().unwrap();

        for name in ["2023-06-01_b.jpg", "2023-06-01_c.png"] {
            assert!(dir.path().join("2023-06-01/Unknown Location").join(name).is_file());
        }
        assert_eq!(report.stats.non_geotagged, 2);
        assert_eq!(report.stats.geotagged, 1);
    }

    #[test]
    fn test_geocoder_failure_falls_back() {
        let mut fixture = Fixture::new();
        fixture.address = None;
        fixture.add_file("2023-05-01_001.jpg", Some(empire_state_tags()));
        let config = fixture.config();
        let (mut organizer, dir, calls) = fixture.organizer(config);

        let report = organizer.run().unwrap();

        assert_eq!(calls.borrow().len(), 1);
        assert!(dir.path().join("2023-05-01/Unknown Location/2023-05-01_001.jpg").is_file());
        assert_eq!(report.stats.geotagged, 0);
        assert_eq!(report.stats.non_geotagged, 1);
        assert_eq!(report.stats.moved, 1);
        assert_eq!(report.results[0].stage, FileStage::Moved);
    }

    #[test]
    fn test_geocoder_failure_records_fallback_stage() {
        let mut fixture = Fixture::new();
        fixture.address = None;
        // Too short for a date key, so the run stops right after classification
        fixture.add_file("x.jpg", Some(empire_state_tags()));
        let config = fixture.config();
        let (mut organizer, _dir, calls) = fixture.organizer(config);

        let report = organizer.run().unwrap();

        assert_eq!(calls.borrow().len(), 1);
        let result = &report.results[0];
        assert_eq!(result.stage, FileStage::NoGps);
        assert_eq!(result.status, ProcessingStatus::Failed);
        assert!(!result.geotagged);
        assert_eq!(report.stats.failed, 1);
    }

    #[test]
    fn test_malformed_and_partial_gps_is_untagged() {
        let mut fixture = Fixture::new();

        let mut malformed = empire_state_tags();
        malformed.insert(
            GpsTag::Latitude,
            TagValue::Rationals(vec![Rational::new(40, 0), Rational::new(0, 1), Rational::new(0, 1)]),
        );
        fixture.add_file("2023-05-01_bad.jpg", Some(malformed));

        let partial: RawTags = [(GpsTag::LatitudeRef, TagValue::Text("N".into()))]
            .into_iter()
            .collect();
        fixture.add_file("2023-05-01_partial.jpg", Some(partial));

        let config = fixture.config();
        let (mut organizer, dir, calls) = fixture.organizer(config);

        let report = organizer.run().unwrap();

        assert!(calls.borrow().is_empty());
        assert_eq!(report.stats.non_geotagged, 2);
        assert_eq!(report.stats.moved, 2);
        assert!(dir.path().join("2023-05-01/Unknown Location/2023-05-01_bad.jpg").is_file());
        assert!(dir.path().join("2023-05-01/Unknown Location/2023-05-01_partial.jpg").is_file());
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut fixture = Fixture::new();
        fixture.add_file("2023-05-01_001.jpg", None);
        fixture.add_file("2023-05-03_002.jpg", None);
        fixture.add_file("x.jpg", None);
        // A plain file where the date folder should go
        fs::write(fixture.dir.path().join("2023-05-03"), b"in the way").unwrap();

        let config = fixture.config();
        let (mut organizer, dir, _) = fixture.organizer(config);

        let report = organizer.run().unwrap();

        assert_eq!(report.stats.found, 3);
        assert_eq!(report.stats.moved, 1);
        assert_eq!(report.stats.failed, 2);
        assert!(dir.path().join("2023-05-01/Unknown Location/2023-05-01_001.jpg").is_file());
        assert!(dir.path().join("2023-05-03_002.jpg").is_file());
        assert!(dir.path().join("x.jpg").is_file());

        let failed: Vec<_> = report.failures().map(|r| r.source.clone()).collect();
        assert_eq!(
            failed,
            [dir.path().join("2023-05-03_002.jpg"), dir.path().join("x.jpg")]
        );

        let blocked = &report.results[1];
        assert_eq!(blocked.stage, FileStage::Planned);
        assert!(blocked.error.as_deref().unwrap().contains("Failed to create directory"));

        let short = &report.results[2];
        assert_eq!(short.stage, FileStage::NoGps);
        assert!(short.destination.is_none());
    }

    #[test]
    fn test_empty_source_is_nothing_to_do() {
        let fixture = Fixture::new();
        fs::write(fixture.dir.path().join("readme.txt"), b"hi").unwrap();
        let config = fixture.config();
        let (mut organizer, _dir, _) = fixture.organizer(config);

        let report = organizer.run().unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.stats, ProcessingStats::default());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let mut fixture = Fixture::new();
        fixture.add_file("2023-05-01_001.jpg", Some(empire_state_tags()));
        let mut config = fixture.config();
        config.dry_run = true;
        let (mut organizer, dir, _) = fixture.organizer(config);

        let report = organizer.run().unwrap();

        assert!(dir.path().join("2023-05-01_001.jpg").is_file());
        assert!(!dir.path().join("2023-05-01").exists());
        assert_eq!(report.stats.moved, 0);
        assert_eq!(report.stats.planned, 1);
        assert_eq!(report.results[0].status, ProcessingStatus::DryRun);
        assert_eq!(
            report.results[0].destination,
            Some(dir.path().join("2023-05-01/5th Ave/2023-05-01_001.jpg"))
        );
    }

    #[test]
    fn test_copy_into_separate_output() {
        let mut fixture = Fixture::new();
        fixture.add_file("2023-05-02_002.mov", None);
        let output = tempdir().unwrap();
        let mut config = fixture.config();
        config.operation = FileOperation::Copy;
        config.output_dir = Some(output.path().join("sorted"));
        let (mut organizer, dir, _) = fixture.organizer(config);

        let report = organizer.run().unwrap();

        assert_eq!(report.stats.moved, 1);
        assert!(dir.path().join("2023-05-02_002.mov").is_file());
        let copied = output
            .path()
            .join("sorted/2023-05-02/Unknown Location/2023-05-02_002.mov");
        assert_eq!(fs::read(copied).unwrap(), b"2023-05-02_002.mov");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2023-05-01");

        ensure_dir(&path).unwrap();
        ensure_dir(&path).unwrap();

        assert!(path.is_dir());
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken");
        fs::write(&path, b"x").unwrap();

        assert!(matches!(
            ensure_dir(&path),
            Err(Error::DirectoryCreationFailed { .. })
        ));
    }

    fn collision_setup(policy: CollisionPolicy) -> (Result<PathBuf>, TempDir) {
        let dir = tempdir().unwrap();
        let source = dir.path().join("2023-05-01_001.jpg");
        fs::write(&source, b"new").unwrap();
        let existing = dir.path().join("2023-05-01/5th Ave/2023-05-01_001.jpg");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, b"old").unwrap();

        let plan = OrganizationPlan {
            source,
            outer_dir: dir.path().join("2023-05-01"),
            inner_dir: dir.path().join("2023-05-01/5th Ave"),
            destination: existing,
        };
        let config = Config {
            source_dir: dir.path().to_path_buf(),
            on_collision: policy,
            ..Default::default()
        };
        (execute_plan(&plan, &config), dir)
    }

    #[test]
    fn test_collision_overwrite() {
        let (result, dir) = collision_setup(CollisionPolicy::Overwrite);
        let dest = result.unwrap();
        assert_eq!(dest, dir.path().join("2023-05-01/5th Ave/2023-05-01_001.jpg"));
        assert_eq!(fs::read(dest).unwrap(), b"new");
    }

    #[test]
    fn test_collision_suffix() {
        let (result, dir) = collision_setup(CollisionPolicy::Suffix);
        let dest = result.unwrap();
        assert_eq!(dest, dir.path().join("2023-05-01/5th Ave/2023-05-01_001_1.jpg"));
        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert_eq!(
            fs::read(dir.path().join("2023-05-01/5th Ave/2023-05-01_001.jpg")).unwrap(),
            b"old"
        );
    }

    #[test]
    fn test_collision_fail() {
        let (result, dir) = collision_setup(CollisionPolicy::Fail);
        assert!(matches!(result, Err(Error::DestinationCollision(_))));
        assert!(dir.path().join("2023-05-01_001.jpg").is_file());
    }

    #[test]
    fn test_move_missing_source_fails() {
        let dir = tempdir().unwrap();
        let plan = OrganizationPlan {
            source: dir.path().join("gone.jpg"),
            outer_dir: dir.path().join("2023-05-01"),
            inner_dir: dir.path().join("2023-05-01/Unknown Location"),
            destination: dir.path().join("2023-05-01/Unknown Location/gone.jpg"),
        };
        let config = Config {
            source_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(
            execute_plan(&plan, &config),
            Err(Error::MoveFailed { .. })
        ));
    }

    #[test]
    fn test_report_json() {
        let mut fixture = Fixture::new();
        fixture.add_file("2023-05-01_001.jpg", Some(empire_state_tags()));
        let config = fixture.config();
        let (mut organizer, dir, _) = fixture.organizer(config);
        let report = organizer.run().unwrap();

        let path = dir.path().join("reports/run.json");
        report.save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["stats"]["geotagged"], 1);
        assert_eq!(value["results"][0]["place"], "5th Ave");
        assert_eq!(value["results"][0]["stage"], "moved");
        assert_eq!(value["results"][0]["status"], "success");
    }

    #[test]
    fn test_empty_run_report_json() {
        let fixture = Fixture::new();
        let config = fixture.config();
        let (mut organizer, dir, _) = fixture.organizer(config);
        let report = organizer.run().unwrap();

        let path = dir.path().join("run.json");
        report.save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["stats"]["found"], 0);
        assert_eq!(value["results"], serde_json::json!([]));
    }

    #[test]
    fn test_processing_stats_summary() {
        let stats = ProcessingStats {
            found: 2,
            geotagged: 1,
            non_geotagged: 1,
            moved: 2,
            planned: 0,
            failed: 0,
        };
        let summary = stats.summary();
        assert!(summary.contains("Found: 2"));
        assert!(summary.contains("Geotagged: 1"));
        assert!(summary.contains("Non-geotagged: 1"));
        assert!(summary.contains("Moved: 2"));
    }
}
