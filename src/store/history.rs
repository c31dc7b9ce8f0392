// ABOUTME: JSONL history logger: appends tab open/close/switch events for a project.
// ABOUTME: Files live under history/<year>/<month>/, one per logging session, and feed analytics.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

use super::StoreResult;
use crate::config;
use crate::model::{EventKind, HistoryEntry, TabAnalytics};

/// Current time as an ISO-8601 string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Path of the history file for a session started at `started`.
pub fn history_file_path(history_dir: &Path, started: DateTime<Utc>) -> PathBuf {
    let stamp = started
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    history_dir
        .join(format!("{:04}", started.year()))
        .join(format!("{:02}", started.month()))
        .join(format!(
            "{:04}-{:02}-{:02}-{}.jsonl",
            started.year(),
            started.month(),
            started.day(),
            stamp
        ))
}

/// Appends history entries as JSONL lines to one session file.
pub struct HistoryLogger {
    writer: Option<BufWriter<File>>,
    pub path: PathBuf,
}

impl HistoryLogger {
    /// Create a history logger for the given project under the storage root.
    ///
    /// The file is created lazily on the first append, so sessions that
    /// record nothing leave nothing behind.
    pub fn new(root: &Path, project_key: &str) -> Self {
        Self::started_at(&config::history_dir(root, project_key), Utc::now())
    }

    /// Create a history logger with an explicit session start (for testing).
    pub fn started_at(history_dir: &Path, started: DateTime<Utc>) -> Self {
        Self {
            writer: None,
            path: history_file_path(history_dir, started),
        }
    }

    /// Append one entry to the log file.
    pub fn append(&mut self, entry: &HistoryEntry) -> StoreResult<()> {
        let line = serde_json::to_string(entry).map_err(|source| super::StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;
        if self.writer.is_none() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.writer = Some(BufWriter::new(file));
        }
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "{}", line)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Record an event stamped with the current time.
    pub fn record(&mut self, event_type: EventKind, uri: &str, label: &str) -> StoreResult<()> {
        self.append(&HistoryEntry {
            timestamp: now_timestamp(),
            event_type,
            uri: uri.to_string(),
            label: label.to_string(),
        })
    }
}

/// Read every history file under `history_dir`, grouped per file in path order.
///
/// Lines that fail to parse are skipped with a warning.
pub fn load_history(history_dir: &Path) -> StoreResult<Vec<Vec<HistoryEntry>>> {
    let prefix = glob::Pattern::escape(&history_dir.to_string_lossy());
    let pattern = Path::new(&prefix).join("*").join("*").join("*.jsonl");
    let Ok(paths) = glob::glob(&pattern.to_string_lossy()) else {
        return Ok(Vec::new());
    };
    let mut files: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
    files.sort();

    let mut sessions = Vec::with_capacity(files.len());
    for path in files {
        let content = fs::read_to_string(&path)?;
        let entries = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("skipping bad history line in {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        sessions.push(entries);
    }
    Ok(sessions)
}

/// Aggregate per-document activity across sessions.
///
/// Time is credited to an open/switch event until the next event in the same
/// session. Results are sorted by total time, most first.
pub fn analyze_history(sessions: &[Vec<HistoryEntry>]) -> Vec<TabAnalytics> {
    let mut stats: HashMap<&str, TabAnalytics> = HashMap::new();

    for session in sessions {
        for (i, entry) in session.iter().enumerate() {
            let stat = stats.entry(entry.uri.as_str()).or_insert_with(|| TabAnalytics {
                uri: entry.uri.clone(),
                label: entry.label.clone(),
                open_count: 0,
                switch_count: 0,
                total_time_ms: 0,
                last_accessed: entry.timestamp.clone(),
            });
            stat.label = entry.label.clone();
            if entry.timestamp > stat.last_accessed {
                stat.last_accessed = entry.timestamp.clone();
            }

            match entry.event_type {
                EventKind::Open => stat.open_count += 1,
                EventKind::Switch => stat.switch_count += 1,
                EventKind::Close => continue,
            }

            if let Some(next) = session.get(i + 1) {
                stat.total_time_ms += elapsed_ms(&entry.timestamp, &next.timestamp);
            }
        }
    }

    let mut result: Vec<TabAnalytics> = stats.into_values().collect();
    result.sort_by(|a, b| {
        b.total_time_ms
            .cmp(&a.total_time_ms)
            .then_with(|| a.uri.cmp(&b.uri))
    });
    result
}

fn elapsed_ms(from: &str, to: &str) -> u64 {
    match (
        DateTime::parse_from_rfc3339(from),
        DateTime::parse_from_rfc3339(to),
    ) {
        (Ok(from), Ok(to)) => u64::try_from((to - from).num_milliseconds()).unwrap_or(0),
        _ => 0,
    }
}
