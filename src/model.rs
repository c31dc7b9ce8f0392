// ABOUTME: Persisted data shapes: tabs, tab groups, saved snapshots, and history entries.
// ABOUTME: Field names serialize in camelCase to match the on-disk state.json and history JSONL.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One open document captured from a pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub label: String,
    pub uri: String,
    pub is_active: bool,
    pub is_pinned: bool,
    pub is_dirty: bool,
    /// Top visible line when the tab was captured, if it was on screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_line: Option<u32>,
}

/// An editor pane (view column) and the tabs it held, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub view_column: i32,
    pub is_active: bool,
    pub tabs: Vec<Tab>,
}

/// A named snapshot of the whole editor layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSnapshot {
    pub name: String,
    /// ISO-8601 timestamp, kept verbatim so it round-trips unchanged.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(rename = "projectName")]
    pub project_key: String,
    pub groups: Vec<TabGroup>,
    /// User-controlled display position. Missing sorts last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl SavedSnapshot {
    /// Total number of tabs across every group.
    pub fn tab_count(&self) -> usize {
        self.groups.iter().map(|g| g.tabs.len()).sum()
    }

    /// Sort key used for display: missing `order` goes to the end.
    pub fn display_order(&self) -> i64 {
        self.order.unwrap_or(i64::MAX)
    }
}

/// The whole per-project state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCollection {
    #[serde(default)]
    pub saved_tabs: Vec<SavedSnapshot>,
}

/// Sort snapshots for display by their `order` field. Stable, so ties keep file order.
pub fn sort_for_display(snapshots: &mut [SavedSnapshot]) {
    snapshots.sort_by_key(SavedSnapshot::display_order);
}

/// Kind of tab activity recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Open,
    Close,
    Switch,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Open => "open",
            EventKind::Close => "close",
            EventKind::Switch => "switch",
        };
        f.write_str(name)
    }
}

/// A single append-only history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: String,
    pub event_type: EventKind,
    pub uri: String,
    pub label: String,
}

/// Aggregated per-document activity computed from the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabAnalytics {
    pub uri: String,
    pub label: String,
    pub open_count: u64,
    pub switch_count: u64,
    pub total_time_ms: u64,
    pub last_accessed: String,
}
