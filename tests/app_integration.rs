// ABOUTME: Integration tests for the command layer: save, list, rename, move, restore, stats.
// ABOUTME: Runs App commands against a temp storage root and a file-backed editor layout.

use std::path::{Path, PathBuf};

use editortrail::app::{App, Command};
use editortrail::config::Config;
use editortrail::editor::{EditorLayout, LivePane, LiveTab, TabInput};
use editortrail::model::EventKind;
use editortrail::project::ProjectIdentity;
use editortrail::workspace::Workspace;

fn app(root: &Path) -> App {
    let config = Config {
        root_dir: Some(root.join("store")),
        ..Config::default()
    };
    App::new(Workspace::new(
        config,
        ProjectIdentity {
            key: "widgets".to_string(),
            branch: Some("main".to_string()),
        },
    ))
}

/// Write a layout with one pane holding real files under `root`.
fn write_layout(root: &Path, files: &[&str]) -> PathBuf {
    let tabs = files
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let path = root.join(name);
            std::fs::write(&path, "content").unwrap();
            LiveTab {
                label: name.to_string(),
                input: TabInput::Text {
                    uri: format!("file://{}", path.display()),
                },
                is_active: i == 0,
                is_pinned: false,
                is_dirty: false,
            }
        })
        .collect();
    let layout = EditorLayout {
        panes: vec![LivePane {
            view_column: 1,
            is_active: true,
            tabs,
        }],
        visible: vec![],
    };
    let path = root.join("layout.json");
    std::fs::write(&path, serde_json::to_string_pretty(&layout).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn save_list_show_and_delete() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let layout = write_layout(tmp.path(), &["a.rs", "b.rs"]);

    let out = app
        .run(Command::Save {
            name: None,
            layout: layout.clone(),
        })
        .await
        .unwrap();
    assert_eq!(out, "Saved 2 tabs as \"main\"");

    let list = app.run(Command::List).await.unwrap();
    assert!(list.starts_with("main  (2 tabs, "));

    let show = app
        .run(Command::Show {
            name: "main".into(),
        })
        .await
        .unwrap();
    assert!(show.contains("**Total Tabs:** 2"));

    let tabs = app
        .run(Command::Tabs {
            name: "main".into(),
        })
        .await
        .unwrap();
    assert!(tabs.contains("1. [1] a.rs (active)"));

    app.run(Command::Delete {
        name: "main".into(),
    })
    .await
    .unwrap();
    // Deleting again is fine.
    app.run(Command::Delete {
        name: "main".into(),
    })
    .await
    .unwrap();
    let list = app.run(Command::List).await.unwrap();
    assert_eq!(list, "No saved tabs for widgets");
}

#[tokio::test]
async fn save_rejects_overlong_name() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let layout = write_layout(tmp.path(), &["a.rs"]);

    let err = app
        .run(Command::Save {
            name: Some("x".repeat(101)),
            layout,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("too long"));
    assert!(!app.workspace().store.state_path().exists());
}

#[tokio::test]
async fn rename_collision_surfaces_error() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let layout = write_layout(tmp.path(), &["a.rs"]);
    for name in ["one", "two"] {
        app.run(Command::Save {
            name: Some(name.into()),
            layout: layout.clone(),
        })
        .await
        .unwrap();
    }

    let err = app
        .run(Command::Rename {
            old: "one".into(),
            new: "two".into(),
        })
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("already exists"));

    let out = app
        .run(Command::Rename {
            old: "one".into(),
            new: "three".into(),
        })
        .await
        .unwrap();
    assert_eq!(out, "Renamed to \"three\"");
}

#[tokio::test]
async fn move_reorders_listing() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let layout = write_layout(tmp.path(), &["a.rs"]);
    for name in ["A", "B", "C"] {
        app.run(Command::Save {
            name: Some(name.into()),
            layout: layout.clone(),
        })
        .await
        .unwrap();
    }

    let out = app
        .run(Command::Move {
            names: vec!["C".into()],
            before: Some("A".into()),
        })
        .await
        .unwrap();
    let order: Vec<_> = out
        .lines()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(order, ["C", "A", "B"]);
}

#[tokio::test]
async fn restore_reports_missing_and_logs_history() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let layout = write_layout(tmp.path(), &["keep.rs", "drop.rs"]);
    app.run(Command::Save {
        name: Some("work".into()),
        layout: layout.clone(),
    })
    .await
    .unwrap();
    std::fs::remove_file(tmp.path().join("drop.rs")).unwrap();

    let out = app
        .run(Command::Restore {
            name: "work".into(),
            layout: layout.clone(),
        })
        .await
        .unwrap();
    assert!(out.starts_with("Restored tabs, but 1 file(s) could not be opened"));
    assert!(out.contains("missing: drop.rs"));

    let restored: EditorLayout =
        serde_json::from_str(&std::fs::read_to_string(&layout).unwrap()).unwrap();
    assert_eq!(restored.tab_count(), 1);
    assert_eq!(restored.panes[0].tabs[0].label, "keep.rs");

    let stats = app.run(Command::Stats { limit: 10 }).await.unwrap();
    assert!(stats.contains("keep.rs"));
    assert!(!stats.contains("drop.rs"));
}

#[tokio::test]
async fn log_and_open_single_tab() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app(tmp.path());
    let layout = write_layout(tmp.path(), &["a.rs", "b.rs"]);
    app.run(Command::Save {
        name: Some("pair".into()),
        layout: layout.clone(),
    })
    .await
    .unwrap();

    let out = app
        .run(Command::Log {
            event: EventKind::Switch,
            uri: "file:///ws/notes.md".into(),
            label: None,
        })
        .await
        .unwrap();
    assert_eq!(out, "Logged switch notes.md");

    let out = app
        .run(Command::Open {
            name: "pair".into(),
            index: 2,
            layout: layout.clone(),
        })
        .await
        .unwrap();
    assert_eq!(out, "Opened b.rs in group 1");

    let err = app
        .run(Command::Open {
            name: "pair".into(),
            index: 9,
            layout,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no tab number 9"));
}
