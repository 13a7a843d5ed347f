/*============================================================
  Synavera Project: Upkg
  Module: upkg_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Upkg. Computes the system update status
    snapshot and prints it as a terminal report or as JSON.

  Security / Safety Notes:
    Operates within user privileges. Reads an optional config
    file and appends to an optional log file; nothing else.

  Dependencies:
    clap for CLI parsing, chrono for the current instant,
    serde_json for machine-readable output.

  Operational Scope:
    Invoked interactively by operators or from shell profiles
    to surface update staleness at a glance.

  Revision History:
    2025-12-01 COD  Authored Upkg runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod config;
mod error;
mod logger;
mod report;
mod status;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, Utc};
use clap::{ArgAction, Parser};

use config::UpkgConfig;
use error::{Result, UpkgError};
use logger::{LogLevel, Logger};
use report::BarStyle;
use status::StatusRecord;

/// Command-line arguments for Upkg.
#[derive(Debug, Parser)]
#[command(
    name = "upkg",
    version,
    author = "Synavera Systems",
    about = "System update status at a glance"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Emit the status snapshot as JSON instead of the report.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[upkg] {}", err);
            err.exit_code()
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = UpkgConfig::load_from_optional_path(cli.config.as_deref())?;
    let source = config.status_source()?;
    let style = config.bar_style()?;

    let log_path = cli.log.clone().or_else(|| {
        config.log_dir().map(|dir| {
            let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");
            dir.join(format!("upkg_{session_stamp}.log"))
        })
    });
    let logger = Logger::new(log_path, cli.verbose)?;
    logger.info("INIT", "Upkg status run starting.");

    let record = source.compute_status(&Local::now());
    logger.info(
        "STATUS",
        format!(
            "days={} packages={} pending={}",
            record.days_since_update, record.total_packages_installed, record.pending_updates
        ),
    );
    if record.days_since_update < 0 {
        logger.warn(
            "CLOCK",
            format!(
                "Reference date {} lies in the future",
                source.reference_date
            ),
        );
    }
    if style.overflows(record.pending_updates) {
        logger.debug(
            "BAR",
            format!(
                "{} pending updates clipped to bar width {}",
                record.pending_updates, style.width
            ),
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    deliver(&mut out, &record, &style, cli.json, &logger)?;

    Ok(ExitCode::SUCCESS)
}

/// Emit the snapshot, then seal the log even when the output sink failed.
fn deliver<W: Write>(
    out: &mut W,
    record: &StatusRecord,
    style: &BarStyle,
    json: bool,
    logger: &Logger,
) -> Result<()> {
    let emitted = emit(out, record, style, json);
    match &emitted {
        Ok(()) => logger.info("COMPLETE", "Status report delivered."),
        Err(err) => logger.log(
            LogLevel::Error,
            "OUTPUT",
            format!("Failed to write status report: {err}"),
        ),
    }
    logger.finalize()?;
    emitted
}

/// Write either the text report or the JSON snapshot to `out`.
fn emit<W: Write>(
    out: &mut W,
    record: &StatusRecord,
    style: &BarStyle,
    json: bool,
) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, record).map_err(|err| {
            UpkgError::Serialization(format!("Failed to encode status snapshot: {err}"))
        })?;
        writeln!(out)?;
        out.flush()?;
    } else {
        report::write_report(out, &report::render(record, style))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    use crate::status::StatusSource;

    fn reference_record() -> StatusRecord {
        let now = Utc.with_ymd_and_hms(2025, 12, 11, 0, 0, 0).unwrap();
        StatusSource::default().compute_status(&now)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from(["upkg", "--json", "--config", "/tmp/u.toml"]).unwrap();
        assert!(cli.json);
        assert!(!cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/u.toml")));
        assert!(cli.log.is_none());
    }

    #[test]
    fn end_to_end_text_report() {
        let mut out = Vec::new();
        emit(&mut out, &reference_record(), &BarStyle::default(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = [
            "───────── System Update Status ─────────",
            "Days Since Last Update: 10",
            "Total Packages Installed: 150",
            "Pending Updates: 5",
            "Updates available      : [█████░░░░░░░░░░░░░░░]",
            "───────────────────────────────────────",
        ]
        .map(|line| format!("{line}\n"))
        .concat();
        assert_eq!(text, expected);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn log_is_sealed_when_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("upkg.log");
        let logger = Logger::new(Some(log_path.clone()), false).unwrap();

        let err = deliver(
            &mut ClosedPipe,
            &reference_record(),
            &BarStyle::default(),
            false,
            &logger,
        )
        .unwrap_err();
        assert!(matches!(err, UpkgError::Io(_)));

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("[ERROR] [OUTPUT] Failed to write status report"));
        assert!(dir.path().join("upkg.log.hash").is_file());
    }

    #[test]
    fn successful_delivery_seals_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("upkg.log");
        let logger = Logger::new(Some(log_path.clone()), false).unwrap();

        let mut out = Vec::new();
        deliver(&mut out, &reference_record(), &BarStyle::default(), true, &logger).unwrap();
        assert!(!out.is_empty());

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("[INFO] [COMPLETE]"));
        assert!(dir.path().join("upkg.log.hash").is_file());
    }

    #[test]
    fn end_to_end_json_snapshot() {
        let mut out = Vec::new();
        emit(&mut out, &reference_record(), &BarStyle::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "days_since_update": 10,
                "total_packages_installed": 150,
                "pending_updates": 5
            })
        );
    }
}
