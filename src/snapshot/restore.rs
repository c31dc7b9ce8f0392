// ABOUTME: Layout restore: reopens a saved snapshot's tabs into their original panes.
// ABOUTME: Missing files are collected per tab; the restore always runs to the end.

use thiserror::Error;

use crate::editor::{EditorHost, EditorLayout, OpenOptions, VIEW_COLUMN_BESIDE};
use crate::model::{EventKind, SavedSnapshot, Tab};
use crate::store::HistoryLogger;

/// A saved tab whose file could not be opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("File not found: {label}")]
pub struct MissingResource {
    pub label: String,
    pub uri: String,
}

impl MissingResource {
    fn of(tab: &Tab) -> Self {
        Self {
            label: tab.label.clone(),
            uri: tab.uri.clone(),
        }
    }
}

/// What a restore managed to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub name: String,
    pub total: usize,
    pub restored: usize,
    pub missing: Vec<MissingResource>,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Message to show the user.
    pub fn message(&self) -> String {
        if self.is_complete() {
            format!("Restored {} tabs from \"{}\"", self.total, self.name)
        } else {
            format!(
                "Restored tabs, but {} file(s) could not be opened",
                self.missing.len()
            )
        }
    }
}

/// Replace every open editor with the snapshot's tabs.
///
/// Closing is destructive; callers confirm with the user first if they want to.
/// Each restored tab is recorded as an `open` event when a logger is given.
pub async fn restore(
    snapshot: &SavedSnapshot,
    host: &dyn EditorHost,
    mut history: Option<&mut HistoryLogger>,
) -> anyhow::Result<RestoreReport> {
    host.close_all().await?;

    let mut report = RestoreReport {
        name: snapshot.name.clone(),
        total: snapshot.tab_count(),
        restored: 0,
        missing: Vec::new(),
    };

    for group in &snapshot.groups {
        for tab in &group.tabs {
            if !host.exists(&tab.uri).await {
                log::warn!("skipping missing file {}", tab.uri);
                report.missing.push(MissingResource::of(tab));
                continue;
            }

            let options = OpenOptions {
                view_column: group.view_column,
                preserve_focus: !tab.is_active,
                preview: false,
            };
            if let Err(e) = show_tab(host, tab, options).await {
                log::warn!("failed to open tab {}: {:#}", tab.label, e);
                report.missing.push(MissingResource::of(tab));
                continue;
            }

            report.restored += 1;
            if let Some(logger) = history.as_deref_mut() {
                record_open(logger, tab);
            }
        }
    }

    log::info!(
        "restored {}/{} tabs from {:?}",
        report.restored,
        report.total,
        report.name
    );
    Ok(report)
}

/// Open a single saved tab next to whatever is already open.
pub async fn open_tab(
    tab: &Tab,
    preferred_column: i32,
    host: &dyn EditorHost,
    history: Option<&mut HistoryLogger>,
) -> anyhow::Result<i32> {
    if !host.exists(&tab.uri).await {
        return Err(MissingResource::of(tab).into());
    }

    let layout = host.layout().await?;
    let options = OpenOptions {
        view_column: best_view_column(preferred_column, &layout),
        preserve_focus: false,
        preview: false,
    };
    let column = show_tab(host, tab, options).await?;

    if let Some(logger) = history {
        record_open(logger, tab);
    }
    Ok(column)
}

/// Pick a pane for a single tab: its saved column if that pane exists, else
/// the first of columns 1-3 that isn't focused, else beside the active one.
pub fn best_view_column(preferred: i32, layout: &EditorLayout) -> i32 {
    if layout.has_column(preferred) {
        return preferred;
    }
    if let Some(active) = layout.active_column() {
        if let Some(column) = (1..=3).find(|c| *c != active) {
            return column;
        }
    }
    VIEW_COLUMN_BESIDE
}

async fn show_tab(host: &dyn EditorHost, tab: &Tab, options: OpenOptions) -> anyhow::Result<i32> {
    let column = host.open(&tab.uri, &tab.label, options).await?;
    if let Some(line) = tab.scroll_line {
        // The tab is already on screen; a lost scroll position is not a failed open.
        if let Err(e) = host.reveal_line(&tab.uri, column, line).await {
            log::warn!("could not scroll {} to line {}: {:#}", tab.label, line, e);
        }
    }
    Ok(column)
}

fn record_open(logger: &mut HistoryLogger, tab: &Tab) {
    if let Err(e) = logger.record(EventKind::Open, &tab.uri, &tab.label) {
        log::warn!("failed to log history entry: {}", e);
    }
}
