//! Final run report, as text or JSON.

use std::fmt::Write;

use camino::{Utf8Path, Utf8PathBuf};
use humansize::{BINARY, format_size};
use nc_scanner::{ScanResult, StatsSnapshot};
use serde::Serialize;

/// Renders the human-readable summary printed after a run.
#[must_use]
pub fn render_summary(result: &ScanResult) -> String {
    let stats = &result.stats;
    let mut out = String::new();

    let heading = if result.dry_run {
        "Dry Run Summary"
    } else {
        "Cleanup Summary"
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "{}", "=".repeat(heading.len()));
    let _ = writeln!(out);
    let _ = writeln!(out, "Directories scanned:   {}", stats.scanned);
    let _ = writeln!(out, "node_modules found:    {}", stats.found);
    if result.dry_run {
        let _ = writeln!(out, "Would delete:          {}", stats.deleted);
    } else {
        let _ = writeln!(out, "node_modules deleted:  {}", stats.deleted);
        let _ = writeln!(
            out,
            "Space reclaimed:       {}",
            format_size(stats.reclaimed_bytes, BINARY)
        );
    }
    let _ = writeln!(out, "Errors:                {}", stats.errors);
    let _ = writeln!(out, "Execution time:        {:.2?}", result.elapsed);

    if result.cancelled {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Interrupted: {} target(s) were not processed.",
            stats.remaining()
        );
    }

    out
}

/// Machine-readable form of a run.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    root: &'a Utf8Path,
    dry_run: bool,
    cancelled: bool,
    elapsed_ms: u64,
    stats: &'a StatsSnapshot,
    targets: &'a [Utf8PathBuf],
}

/// Renders the run as pretty-printed JSON.
pub fn render_json(root: &Utf8Path, result: &ScanResult) -> serde_json::Result<String> {
    let report = JsonReport {
        root,
        dry_run: result.dry_run,
        cancelled: result.cancelled,
        elapsed_ms: u64::try_from(result.elapsed.as_millis()).unwrap_or(u64::MAX),
        stats: &result.stats,
        targets: &result.targets,
    };
    serde_json::to_string_pretty(&report)
}
