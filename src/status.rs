/*============================================================
  Synavera Project: Upkg
  Module: upkg_core::status
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Produce the StatusRecord snapshot: whole days elapsed
    since the reference update date plus the configured
    package counters.

  Security / Safety Notes:
    Pure computation; no I/O performed in this module.

  Dependencies:
    chrono for calendar arithmetic, serde for JSON output.

  Operational Scope:
    Invoked once per run by the entry point; the resulting
    record feeds the report renderer or the JSON emitter.

  Revision History:
    2025-12-01 COD  Introduced injectable status source.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Deterministic output for a given instant
    - Serializable structures for machine-readable output
============================================================*/

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::Serialize;

const HOURS_PER_DAY: i64 = 24;
const SECONDS_PER_HOUR: i64 = 3600;

/// Snapshot of update-related counters for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    /// Negative when the clock sits before the reference date.
    pub days_since_update: i64,
    pub total_packages_installed: u64,
    pub pending_updates: u64,
}

/// Reference date and counters the status snapshot is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSource {
    /// Wall-clock time, interpreted in the zone of the instant passed to
    /// [`StatusSource::compute_status`].
    pub reference_date: NaiveDateTime,
    pub total_packages_installed: u64,
    pub pending_updates: u64,
}

impl StatusSource {
    pub fn new(
        reference_date: NaiveDateTime,
        total_packages_installed: u64,
        pending_updates: u64,
    ) -> Self {
        Self {
            reference_date,
            total_packages_installed,
            pending_updates,
        }
    }

    /// Build the snapshot for the instant `now`.
    pub fn compute_status<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> StatusRecord {
        StatusRecord {
            days_since_update: days_since(&self.reference_date, now),
            total_packages_installed: self.total_packages_installed,
            pending_updates: self.pending_updates,
        }
    }
}

impl Default for StatusSource {
    fn default() -> Self {
        let reference_date = NaiveDate::from_ymd_opt(2025, 12, 1)
            .expect("2025-12-01 is a valid calendar date")
            .and_time(NaiveTime::default());
        Self::new(reference_date, 150, 5)
    }
}

/// Whole days between `reference` (local to `now`'s zone) and `now`.
///
/// Elapsed whole hours are divided by 24 with truncation toward zero, so a
/// negative partial day rounds up to zero rather than down: twelve hours
/// before the reference yields `0`, not `-1`. An ambiguous reference time
/// (DST fall-back overlap) resolves to its earlier instant; one that falls
/// into a DST gap is read as UTC.
pub fn days_since<Tz: TimeZone>(reference: &NaiveDateTime, now: &DateTime<Tz>) -> i64 {
    let zone = now.timezone();
    let anchor = zone
        .from_local_datetime(reference)
        .earliest()
        .unwrap_or_else(|| zone.from_utc_datetime(reference));
    let hours = (now.timestamp() - anchor.timestamp()) / SECONDS_PER_HOUR;
    hours / HOURS_PER_DAY
}
