// ABOUTME: Snapshot persistence: load, save, rename, delete, and reorder saved snapshots.
// ABOUTME: Each write serializes the whole collection to state.json via tmp file + rename.

use std::path::{Path, PathBuf};

use super::history::{self, HistoryLogger};
use super::{StoreError, StoreResult};
use crate::config;
use crate::model::{HistoryEntry, SavedSnapshot, SnapshotCollection, sort_for_display};

/// Handle on one project's snapshot file.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
    project_key: String,
}

impl StateStore {
    /// Create a store for `project_key` under the storage root.
    pub fn new(root: &Path, project_key: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            project_key: project_key.to_string(),
        }
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to this project's state.json.
    pub fn state_path(&self) -> PathBuf {
        config::state_path(&self.root, &self.project_key)
    }

    /// Start a history logging session for this project.
    pub fn history_logger(&self) -> HistoryLogger {
        HistoryLogger::new(&self.root, &self.project_key)
    }

    /// Read every recorded history session for this project.
    pub fn load_history(&self) -> StoreResult<Vec<Vec<HistoryEntry>>> {
        history::load_history(&config::history_dir(&self.root, &self.project_key))
    }

    /// Load every saved snapshot in file order. A missing file is an empty list.
    pub fn load_all(&self) -> StoreResult<Vec<SavedSnapshot>> {
        let path = self.state_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let collection: SnapshotCollection =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;
        Ok(collection.saved_tabs)
    }

    /// Load every saved snapshot, sorted by display order.
    pub fn load_sorted(&self) -> StoreResult<Vec<SavedSnapshot>> {
        let mut snapshots = self.load_all()?;
        sort_for_display(&mut snapshots);
        Ok(snapshots)
    }

    /// Look up a snapshot by name.
    pub fn get(&self, name: &str) -> StoreResult<Option<SavedSnapshot>> {
        Ok(self.load_all()?.into_iter().find(|s| s.name == name))
    }

    /// Insert a snapshot, replacing any existing entry with the same name.
    pub fn save(&self, snapshot: &SavedSnapshot) -> StoreResult<()> {
        let mut snapshots = self.load_all()?;
        match snapshots.iter_mut().find(|s| s.name == snapshot.name) {
            Some(existing) => *existing = snapshot.clone(),
            None => snapshots.push(snapshot.clone()),
        }
        self.write_all(snapshots)
    }

    /// Remove the snapshot with this name. Removing an absent name is a no-op.
    pub fn delete(&self, name: &str) -> StoreResult<()> {
        let mut snapshots = self.load_all()?;
        snapshots.retain(|s| s.name != name);
        self.write_all(snapshots)
    }

    /// Rename a snapshot, refusing to collide with another entry.
    pub fn rename(&self, old_name: &str, new_name: &str) -> StoreResult<()> {
        let mut snapshots = self.load_all()?;
        let Some(index) = snapshots.iter().position(|s| s.name == old_name) else {
            return Err(StoreError::NotFound(old_name.to_string()));
        };
        if snapshots
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.name == new_name)
        {
            return Err(StoreError::AlreadyExists(new_name.to_string()));
        }
        snapshots[index].name = new_name.to_string();
        self.write_all(snapshots)
    }

    /// Move the `dragged` snapshots in front of `target` and renumber `order`.
    ///
    /// With no target the dragged entries go to the front. A target that is
    /// not found (or is itself being dragged) sends them to the end. Returns
    /// the collection in its new display order.
    pub fn reorder(&self, dragged: &[String], target: Option<&str>) -> StoreResult<Vec<SavedSnapshot>> {
        let snapshots = self.load_sorted()?;
        if dragged.is_empty() {
            return Ok(snapshots);
        }

        let (moving, mut others): (Vec<_>, Vec<_>) = snapshots
            .into_iter()
            .partition(|s| dragged.iter().any(|d| d == &s.name));

        let insert_at = match target {
            Some(target) => others
                .iter()
                .position(|s| s.name == target)
                .unwrap_or(others.len()),
            None => 0,
        };
        let tail = others.split_off(insert_at);
        let mut reordered = others;
        reordered.extend(moving);
        reordered.extend(tail);

        for (index, snapshot) in reordered.iter_mut().enumerate() {
            snapshot.order = Some(index as i64);
        }
        self.write_all(reordered.clone())?;
        Ok(reordered)
    }

    fn write_all(&self, snapshots: Vec<SavedSnapshot>) -> StoreResult<()> {
        let collection = SnapshotCollection {
            saved_tabs: snapshots,
        };
        write_collection(&self.state_path(), &collection)
    }
}

/// Write the collection to disk (atomic write via tmp + rename).
fn write_collection(path: &Path, collection: &SnapshotCollection) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(collection).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(&tmp_path, &content)?;
    std::fs::rename(&tmp_path, path)?;
    log::debug!(
        "wrote {} snapshot(s) to {}",
        collection.saved_tabs.len(),
        path.display()
    );
    Ok(())
}
