/*============================================================
  Synavera Project: Upkg
  Module: upkg_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load and validate the optional Upkg TOML configuration:
    reference update date, package counters, bar appearance,
    and log destination.

  Security / Safety Notes:
    Reads a single operator-owned file; nothing is written.

  Dependencies:
    serde + toml for parsing, dirs for the XDG config root,
    chrono for reference date parsing.

  Operational Scope:
    Consulted once at startup by the entry point. Absent
    default files resolve to built-in defaults.

  Revision History:
    2025-12-01 COD  Authored configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Safe defaults for every key
    - Validation at the boundary with explicit errors
============================================================*/

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::error::{Result, UpkgError};
use crate::report::BarStyle;
use crate::status::StatusSource;

const CONFIG_DIR: &str = "upkg";
const CONFIG_FILE: &str = "config.toml";
const REFERENCE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MAX_BAR_WIDTH: usize = 256;

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpkgConfig {
    pub status: StatusConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// `[status]` table: inputs to the status snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusConfig {
    /// `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
    pub reference_date: String,
    pub total_packages_installed: u64,
    pub pending_updates: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        let source = StatusSource::default();
        Self {
            reference_date: source
                .reference_date
                .format(REFERENCE_DATE_FORMAT)
                .to_string(),
            total_packages_installed: source.total_packages_installed,
            pending_updates: source.pending_updates,
        }
    }
}

/// `[display]` table: glyph bar appearance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub bar_width: usize,
    pub filled_glyph: String,
    pub empty_glyph: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let style = BarStyle::default();
        Self {
            bar_width: style.width,
            filled_glyph: style.filled.to_string(),
            empty_glyph: style.empty.to_string(),
        }
    }
}

/// `[logging]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Directory for per-session log files. Unset disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl UpkgConfig {
    /// Default location: `$XDG_CONFIG_HOME/upkg/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path` when given (it must exist), otherwise from the
    /// default location if present, otherwise fall back to defaults.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(explicit) => Self::load_from_path(explicit),
            None => match Self::default_path() {
                Some(default) if default.is_file() => Self::load_from_path(&default),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse and validate the file at `path`.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            UpkgError::Config(format!(
                "Failed to read configuration {}: {err}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&contents).map_err(|err| match err {
            UpkgError::Config(msg) => UpkgError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|err| UpkgError::Config(format!("Invalid TOML: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.status_source()?;
        self.bar_style()?;
        Ok(())
    }

    /// Build the status source described by `[status]`.
    pub fn status_source(&self) -> Result<StatusSource> {
        let reference_date = parse_reference_date(&self.status.reference_date)?;
        Ok(StatusSource::new(
            reference_date,
            self.status.total_packages_installed,
            self.status.pending_updates,
        ))
    }

    /// Build the bar style described by `[display]`.
    pub fn bar_style(&self) -> Result<BarStyle> {
        let width = self.display.bar_width;
        if !(1..=MAX_BAR_WIDTH).contains(&width) {
            return Err(UpkgError::Config(format!(
                "display.bar_width must be between 1 and {MAX_BAR_WIDTH}, got {width}"
            )));
        }
        Ok(BarStyle {
            width,
            filled: single_glyph("display.filled_glyph", &self.display.filled_glyph)?,
            empty: single_glyph("display.empty_glyph", &self.display.empty_glyph)?,
        })
    }

    /// Directory for session logs, if configured.
    pub fn log_dir(&self) -> Option<&Path> {
        self.logging.log_dir.as_deref()
    }
}

/// Parse a reference date given as a datetime or a bare date (midnight).
pub fn parse_reference_date(raw: &str) -> Result<NaiveDateTime> {
    let value = raw.trim();
    if let Ok(datetime) = value.parse::<NaiveDateTime>() {
        return Ok(datetime);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime);
    }
    value
        .parse::<NaiveDate>()
        .map(|date| date.and_time(NaiveTime::default()))
        .map_err(|err| {
            UpkgError::Config(format!(
                "status.reference_date `{value}` is not a valid date: {err}"
            ))
        })
}

fn single_glyph(key: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => Ok(glyph),
        _ => Err(UpkgError::Config(format!(
            "{key} must be exactly one character, got `{value}`"
        ))),
    }
}
