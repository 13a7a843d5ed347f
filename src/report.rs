/*============================================================
  Synavera Project: Upkg
  Module: upkg_core::report
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Render a StatusRecord as the fixed six-line update status
    report, including the glyph bar for pending updates.

  Security / Safety Notes:
    Writes to the provided sink only; no filesystem access.

  Dependencies:
    None beyond std.

  Operational Scope:
    Called by the entry point after the status snapshot is
    computed; output is intended for an interactive terminal.

  Revision History:
    2025-12-01 COD  Authored report renderer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic formatting for auditability
    - Pure rendering separated from output side effects
============================================================*/

use std::io::{self, Write};

use crate::status::StatusRecord;

pub const TITLE_LINE: &str = "───────── System Update Status ─────────";
pub const CLOSING_LINE: &str = "───────────────────────────────────────";

const MAX_PREALLOCATED_BYTES: usize = 4096;

/// Shape of the pending-updates bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub width: usize,
    pub filled: char,
    pub empty: char,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            width: 20,
            filled: '█',
            empty: '░',
        }
    }
}

impl BarStyle {
    /// True when `count` exceeds the bar and would be clipped.
    pub fn overflows(&self, count: u64) -> bool {
        usize::try_from(count).map_or(true, |count| count > self.width)
    }

    /// Render `count` as a bracketed bar; counts beyond the width are clipped.
    pub fn render(&self, count: u64) -> String {
        let filled = usize::try_from(count).map_or(self.width, |count| count.min(self.width));
        let empty = self.width - filled;

        let mut bar = String::with_capacity(capacity_hint(self.width));
        bar.push('[');
        bar.extend(std::iter::repeat(self.filled).take(filled));
        bar.extend(std::iter::repeat(self.empty).take(empty));
        bar.push(']');
        bar
    }
}

/// Bytes to reserve for a bar of `width` glyphs plus brackets.
fn capacity_hint(width: usize) -> usize {
    let worst_case = width.saturating_add(2).saturating_mul(char::MAX.len_utf8());
    worst_case.min(MAX_PREALLOCATED_BYTES)
}

/// Format the report lines for `record`.
pub fn render(record: &StatusRecord, style: &BarStyle) -> Vec<String> {
    vec![
        TITLE_LINE.to_string(),
        format!("Days Since Last Update: {}", record.days_since_update),
        format!(
            "Total Packages Installed: {}",
            record.total_packages_installed
        ),
        format!("Pending Updates: {}", record.pending_updates),
        format!(
            "Updates available      : {}",
            style.render(record.pending_updates)
        ),
        CLOSING_LINE.to_string(),
    ]
}

/// Write rendered lines to `out`, one per line.
pub fn write_report<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pending: u64) -> StatusRecord {
        StatusRecord {
            days_since_update: 10,
            total_packages_installed: 150,
            pending_updates: pending,
        }
    }

    #[test]
    fn empty_bar_when_nothing_pending() {
        let bar = BarStyle::default().render(0);
        assert_eq!(bar, format!("[{}]", "░".repeat(20)));
    }

    #[test]
    fn partial_bar() {
        let bar = BarStyle::default().render(5);
        assert_eq!(bar, "[█████░░░░░░░░░░░░░░░]");
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(bar.chars().filter(|c| *c == '░').count(), 15);
    }

    #[test]
    fn overflowing_count_is_clipped() {
        let style = BarStyle::default();
        assert_eq!(style.render(25), format!("[{}]", "█".repeat(20)));
        assert_eq!(style.render(u64::MAX), style.render(20));
        assert!(style.overflows(25));
        assert!(!style.overflows(20));
        assert!(!style.overflows(0));
    }

    #[test]
    fn custom_style() {
        let style = BarStyle {
            width: 4,
            filled: '#',
            empty: '.',
        };
        assert_eq!(style.render(1), "[#...]");
        assert_eq!(style.render(9), "[####]");
    }

    #[test]
    fn capacity_math_does_not_overflow_for_wide_styles() {
        assert_eq!(capacity_hint(usize::MAX), MAX_PREALLOCATED_BYTES);
        assert_eq!(capacity_hint(20), 88);
        let style = BarStyle {
            width: usize::MAX,
            filled: '#',
            empty: '.',
        };
        assert!(!style.overflows(0));
    }

    #[test]
    fn report_layout() {
        let lines = render(&record(5), &BarStyle::default());
        assert_eq!(
            lines,
            vec![
                TITLE_LINE.to_string(),
                "Days Since Last Update: 10".to_string(),
                "Total Packages Installed: 150".to_string(),
                "Pending Updates: 5".to_string(),
                "Updates available      : [█████░░░░░░░░░░░░░░░]".to_string(),
                CLOSING_LINE.to_string(),
            ]
        );
    }

    #[test]
    fn negative_days_are_printed_as_is() {
        let mut snapshot = record(0);
        snapshot.days_since_update = -4;
        let lines = render(&snapshot, &BarStyle::default());
        assert_eq!(lines[1], "Days Since Last Update: -4");
    }

    #[test]
    fn rendering_is_idempotent() {
        let style = BarStyle::default();
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_report(&mut first, &render(&record(7), &style)).unwrap();
        write_report(&mut second, &render(&record(7), &style)).unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.ends_with(&format!("{CLOSING_LINE}\n")));
    }
}
