//! Render history: one JSONL line per `segview render` invocation.
//!
//! Log file: `~/.segview/render-log.jsonl`. Writing is best-effort; a render
//! never fails because its log line could not be written.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// A single render attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEvent {
    pub timestamp: String,
    /// File path, or `"-"` for stdin.
    pub source: String,
    /// Payload kind that was rendered, or `"auto"` if decoding failed.
    pub kind: String,
    /// Number of top-level sections in the display tree.
    #[serde(default)]
    pub sections: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub segments: Option<usize>,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl RenderEvent {
    pub fn succeeded(source: &str, kind: &str, sections: usize, segments: Option<usize>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            source: source.to_string(),
            kind: kind.to_string(),
            sections,
            segments,
            success: true,
            error: None,
        }
    }

    pub fn failed(source: &str, kind: &str, error: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            source: source.to_string(),
            kind: kind.to_string(),
            sections: 0,
            segments: None,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append an event to the render log when `enabled` (`logging.enabled`).
pub fn log_render(enabled: bool, event: &RenderEvent) {
    if let Some(path) = events_log_path() {
        log_render_to(enabled, &path, event);
    }
}

fn log_render_to(enabled: bool, path: &Path, event: &RenderEvent) {
    if enabled {
        let _ = append_event_to(path, event);
    }
}

pub fn append_event_to(path: &Path, event: &RenderEvent) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read every event in `path`, skipping malformed lines.
pub fn read_events_from(path: &Path) -> Vec<RenderEvent> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<RenderEvent>(&line).ok())
        .collect()
}

/// Every event in the default render log.
pub fn read_all() -> Vec<RenderEvent> {
    events_log_path()
        .map(|path| read_events_from(&path))
        .unwrap_or_default()
}

/// The most recent `limit` events, newest first.
pub fn recent(events: &[RenderEvent], limit: usize) -> Vec<&RenderEvent> {
    events.iter().rev().take(limit).collect()
}

pub fn events_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".segview").join("render-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Totals for `segview history`.
#[derive(Debug, Default, PartialEq)]
pub struct HistoryStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successful renders per payload kind, in first-seen order.
    pub by_kind: IndexMap<String, usize>,
}

impl HistoryStats {
    pub fn success_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }
}

pub fn build_stats(events: &[RenderEvent]) -> HistoryStats {
    let mut stats = HistoryStats {
        total: events.len(),
        ..HistoryStats::default()
    };

    for event in events {
        if event.success {
            stats.succeeded += 1;
            *stats.by_kind.entry(event.kind.clone()).or_insert(0) += 1;
        } else {
            stats.failed += 1;
        }
    }

    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
