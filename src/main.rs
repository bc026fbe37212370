//! Place Sorter - file photos and videos by date and place
//!
//! Scans a folder for jpg/png/mov files and moves each into
//! `<date>/<place>/`, resolving the place from the GPS tags.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use place_sorter::process::{FileResult, ProcessingStatus};
use place_sorter::{Cli, Config, Organizer};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored console output for run summaries.

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_title(title: &str) {
        let padding = 60usize.saturating_sub(title.len()) / 2;
        let _ = stdout().execute(Print(" ".repeat(padding.saturating_sub(1))));
        let _ = stdout().execute(Print(style(title).bold()));
        let _ = stdout().execute(Print("\n\n"));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_error(msg: &str) {
        let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_key_value(key: &str, value: &str, value_color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value).with(value_color)));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: usize, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value.to_string()).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_result(status_icon: &str, status_color: Color, source: &str, dest_or_msg: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(status_icon).with(status_color).bold()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(source).italic()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(dest_or_msg).with(CliTheme::HINT)));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  Log file: ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.init_config {
        Config::write_sample(path)?;
        println!("Sample configuration written to {}", path.display());
        return Ok(());
    }

    // Config and Log directories live next to the executable
    let exe_dir = get_executable_dir()?;
    let log_path = get_log_path(&exe_dir, &cli);
    let _guard = setup_logging(&cli, &log_path)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Place Sorter starting");

    let config = load_config(&cli, &exe_dir)?;
    // The geocoder token stays out of the log
    info!(
        source = %config.source_dir.display(),
        root = %config.organizing_root().display(),
        operation = ?config.operation,
        on_collision = ?config.on_collision,
        geocoding = config.geocoder.enabled,
        dry_run = config.dry_run,
        "Configuration loaded"
    );
    info!(log_file = %log_path.display(), "Log file location");

    config.validate()?;

    let mut organizer = Organizer::new(config.clone())?;

    match organizer.run() {
        Ok(report) => {
            use cli_output::*;

            if let Some(ref report_path) = cli.report {
                report.save_json(report_path)?;
                info!(report = %report_path.display(), "Run report written");
            }

            if report.stats.found == 0 {
                print_hint("No unorganized files found, nothing to do.");
                return Ok(());
            }

            print_separator();
            print_title("Organization complete");
            print_separator();

            let stats = &report.stats;
            print_blank();
            print_stat("Files found", stats.found, CliTheme::ACCENT);
            print_stat("Geotagged", stats.geotagged, CliTheme::SUCCESS);
            print_stat("Unknown location", stats.non_geotagged, CliTheme::WARNING);
            if config.dry_run {
                print_stat("Would move", stats.planned, CliTheme::ACCENT);
            } else {
                print_stat("Moved", stats.moved, CliTheme::SUCCESS);
            }
            print_stat("Failed", stats.failed, CliTheme::ERROR);
            print_blank();

            if config.verbose {
                print_separator();
                print_hint("Detailed results");
                print_blank();
                for result in &report.results {
                    print_file_result(result);
                }
            }

            let failed: Vec<&FileResult> = report.failures().collect();
            if !failed.is_empty() {
                print_separator();
                print_error(&format!("{} files could not be organized", failed.len()));
                print_blank();
                for result in &failed {
                    print_key_value(
                        &result.source.display().to_string(),
                        result.error.as_deref().unwrap_or("unknown error"),
                        CliTheme::ERROR,
                    );
                }
            }

            if config.dry_run {
                print_separator();
                print_warning("Dry run: no files were moved.");
            }

            print_separator();
            print_log_path(&log_path.display().to_string());

            info!(log_file = %log_path.display(), "Processing complete. Log saved to");

            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Processing failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_file_result(result: &FileResult) {
    use cli_output::*;

    let source = result.source.display().to_string();
    let destination = result
        .destination
        .as_ref()
        .map(|p| format!("→ {}", p.display()))
        .unwrap_or_default();

    match result.status {
        ProcessingStatus::Success => print_result("✓", CliTheme::SUCCESS, &source, &destination),
        ProcessingStatus::DryRun => print_result("~", CliTheme::ACCENT, &source, &destination),
        ProcessingStatus::Failed => print_result(
            "✗",
            CliTheme::ERROR,
            &source,
            result.error.as_deref().unwrap_or("unknown error"),
        ),
    }
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Determine the log file path based on config file or timestamp
fn get_log_path(exe_dir: &Path, cli: &Cli) -> PathBuf {
    let log_dir = exe_dir.join("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    if let Some(config_name) = cli.config_name() {
        log_dir
            .join(&config_name)
            .join(format!("{}_{}.log", config_name, timestamp))
    } else {
        log_dir.join(format!("CLIRun_{}.log", timestamp))
    }
}

/// Resolve config path - supports shorthand syntax
///
/// `-C camera` finds `camera`, `camera.toml`, or `Config/camera.toml`
/// next to the executable.
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    if with_extension.exists() {
        return with_extension;
    }

    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());
    let mut in_config_dir = exe_dir.join("Config").join(filename);
    if in_config_dir.extension().is_none() {
        in_config_dir = in_config_dir.with_extension("toml");
    }

    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli, exe_dir: &Path) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        let resolved_path = resolve_config_path(exe_dir, config_path);
        info!(config_file = %resolved_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(&resolved_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Setup logging (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<WorkerGuard> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(fmt::layer().json().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(guard)
}
