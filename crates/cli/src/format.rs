//! Report → human-readable string formatting.

use std::path::Path;

use chrono::{DateTime, Local};
use savestate_durability::{FallbackReason, LoadOutcome, SlotReport, SlotStatus};

/// Format the slot table printed by `status`.
pub fn format_status(reports: &[SlotReport]) -> String {
    let mut rows = vec![[
        "SLOT".to_string(),
        "STATE".to_string(),
        "VERSION".to_string(),
        "SIZE".to_string(),
        "MODIFIED".to_string(),
    ]];

    for report in reports {
        let (state, version, size) = match &report.status {
            SlotStatus::Missing => ("missing".to_string(), "-".to_string(), "-".to_string()),
            SlotStatus::Valid { header, size } => {
                let version = header.map_or_else(|| "-".to_string(), |h| h.version.to_string());
                ("valid".to_string(), version, size.to_string())
            }
            SlotStatus::Invalid { reason, size } => {
                (format!("invalid ({})", reason), "-".to_string(), size.to_string())
            }
            SlotStatus::Unreadable { error } => {
                (format!("unreadable ({})", error), "-".to_string(), "-".to_string())
            }
        };

        rows.push([
            report.source.to_string(),
            state,
            version,
            size,
            modified_time(&report.path).unwrap_or_else(|| "-".to_string()),
        ]);
    }

    let mut widths = [0usize; 5];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a load outcome.
pub fn format_outcome(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::TestValue => "(test) test savestate".to_string(),
        LoadOutcome::Fallback(reason) => {
            let why = match reason {
                FallbackReason::MissingFile => "no save file",
                FallbackReason::Unrecoverable => "no usable save or backup",
                FallbackReason::MigrationFailed => "migration failed",
            };
            format!("(fallback) {}", why)
        }
        LoadOutcome::Loaded { source } => format!("(loaded) from {}", source),
        LoadOutcome::Migrated { source, from, to } => {
            format!("(migrated) from {} v{} -> v{}", source, from, to)
        }
    }
}

fn modified_time(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format("%Y-%m-%d %H:%M:%S").to_string())
}
