// ABOUTME: Integration tests for the snapshot store across long operation sequences.
// ABOUTME: Checks name uniqueness, round-trip fidelity, and drag-reorder persistence.

use std::collections::HashSet;

use editortrail::model::{SavedSnapshot, SnapshotCollection, Tab, TabGroup};
use editortrail::store::{StateStore, StoreError};

fn snapshot(name: &str, scroll: Option<u32>, branch: Option<&str>, order: Option<i64>) -> SavedSnapshot {
    SavedSnapshot {
        name: name.to_string(),
        timestamp: "2026-03-01T12:34:56.789Z".to_string(),
        branch: branch.map(str::to_string),
        project_key: "widgets".to_string(),
        groups: vec![TabGroup {
            view_column: 1,
            is_active: true,
            tabs: vec![Tab {
                label: format!("{name}.rs"),
                uri: format!("file:///ws/{name}.rs"),
                is_active: true,
                is_pinned: scroll.is_some(),
                is_dirty: false,
                scroll_line: scroll,
            }],
        }],
        order,
    }
}

fn assert_unique(store: &StateStore) {
    let all = store.load_all().unwrap();
    let names: HashSet<_> = all.iter().map(|s| s.name.clone()).collect();
    assert_eq!(names.len(), all.len(), "duplicate names in {:?}", all);
}

/// Drive a long, deterministic mix of save/delete/rename and check that
/// names stay unique after every step.
#[test]
fn names_stay_unique_under_mixed_operations() {
    let tmp = tempfile::tempdir().unwrap();
    let store = StateStore::new(tmp.path(), "widgets");
    let pool = ["a", "b", "c", "d", "e"];

    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = |n: usize| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % n as u64) as usize
    };

    for _ in 0..200 {
        let name = pool[next(pool.len())];
        match next(3) {
            0 => store.save(&snapshot(name, None, None, None)).unwrap(),
            1 => store.delete(name).unwrap(),
            _ => {
                let new_name = pool[next(pool.len())];
                match store.rename(name, new_name) {
                    Ok(()) | Err(StoreError::NotFound(_)) | Err(StoreError::AlreadyExists(_)) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        }
        assert_unique(&store);
    }
}

/// Whatever is saved comes back field-for-field, including absent optionals.
#[test]
fn round_trip_preserves_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let store = StateStore::new(tmp.path(), "widgets");
    let with_all = snapshot("full", Some(17), Some("feature-x"), Some(4));
    let bare = snapshot("bare", None, None, None);

    store.save(&with_all).unwrap();
    store.save(&bare).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded, vec![with_all, bare]);

    let raw = std::fs::read_to_string(store.state_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let bare_json = &value["savedTabs"][1];
    assert!(bare_json.get("branch").is_none());
    assert!(bare_json.get("order").is_none());
    assert!(bare_json["groups"][0]["tabs"][0].get("scrollLine").is_none());

    // The file is the documented collection shape.
    let collection: SnapshotCollection = serde_json::from_str(&raw).unwrap();
    assert_eq!(collection.saved_tabs.len(), 2);
}

/// A failed rename leaves the file byte-for-byte unchanged.
#[test]
fn failed_rename_changes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let store = StateStore::new(tmp.path(), "widgets");
    store.save(&snapshot("a", None, None, None)).unwrap();
    store.save(&snapshot("b", None, None, None)).unwrap();
    let before = std::fs::read(store.state_path()).unwrap();

    assert!(matches!(
        store.rename("a", "b"),
        Err(StoreError::AlreadyExists(_))
    ));
    assert!(matches!(
        store.rename("zzz", "c"),
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(std::fs::read(store.state_path()).unwrap(), before);
}

/// Dragging C before A in [A, B, C] reads back as [C, A, B].
#[test]
fn drag_reorder_persists() {
    let tmp = tempfile::tempdir().unwrap();
    let store = StateStore::new(tmp.path(), "widgets");
    for name in ["A", "B", "C"] {
        store.save(&snapshot(name, None, None, None)).unwrap();
    }

    store.reorder(&["C".to_string()], Some("A")).unwrap();

    let reopened = StateStore::new(tmp.path(), "widgets");
    let names: Vec<_> = reopened
        .load_sorted()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["C", "A", "B"]);
}

/// Projects are isolated from one another.
#[test]
fn projects_do_not_share_state() {
    let tmp = tempfile::tempdir().unwrap();
    let one = StateStore::new(tmp.path(), "github.com-acme-one");
    let two = StateStore::new(tmp.path(), "github.com-acme-two");
    one.save(&snapshot("main", None, None, None)).unwrap();

    assert!(two.load_all().unwrap().is_empty());
    assert!(one.state_path().ends_with("tabs/projects/github.com-acme-one/state.json"));
}
