// ABOUTME: Layout capture: turns the editor's live panes and tabs into persisted tab groups.
// ABOUTME: Skips tabs with no resource, drops empty panes, and saves under a name or the branch.

use crate::editor::EditorLayout;
use crate::model::{SavedSnapshot, Tab, TabGroup};
use crate::store::history::now_timestamp;
use crate::workspace::Workspace;

/// Result of trying to save the current layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SavedSnapshot),
    /// No tab had a resource to save; nothing was written.
    NothingToSave,
}

impl SaveOutcome {
    /// Message to show the user.
    pub fn message(&self) -> String {
        match self {
            SaveOutcome::Saved(snapshot) => {
                format!("Saved {} tabs as \"{}\"", snapshot.tab_count(), snapshot.name)
            }
            SaveOutcome::NothingToSave => "No tabs to save".to_string(),
        }
    }
}

/// Capture every pane that has at least one reopenable tab, in live order.
pub fn capture(layout: &EditorLayout) -> Vec<TabGroup> {
    layout
        .panes
        .iter()
        .filter_map(|pane| {
            let tabs: Vec<Tab> = pane
                .tabs
                .iter()
                .filter_map(|tab| {
                    let uri = tab.input.resource()?;
                    Some(Tab {
                        label: tab.label.clone(),
                        uri: uri.to_string(),
                        is_active: tab.is_active,
                        is_pinned: tab.is_pinned,
                        is_dirty: tab.is_dirty,
                        scroll_line: scroll_line(layout, uri),
                    })
                })
                .collect();

            (!tabs.is_empty()).then(|| TabGroup {
                view_column: pane.view_column,
                is_active: pane.is_active,
                tabs,
            })
        })
        .collect()
}

/// First visible line of the on-screen editor showing `uri`, if there is one.
fn scroll_line(layout: &EditorLayout, uri: &str) -> Option<u32> {
    layout
        .visible
        .iter()
        .find(|editor| editor.uri == uri)
        .and_then(|editor| editor.first_visible_line)
}

/// Capture the layout and persist it.
///
/// Without a name the snapshot is named after the branch, or the configured
/// fallback. Saving over an existing name keeps that entry's display order.
pub fn save_current(
    workspace: &Workspace,
    name: Option<&str>,
    layout: &EditorLayout,
) -> anyhow::Result<SaveOutcome> {
    let branch = workspace.identity.branch.clone();
    let name = name
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| branch.clone())
        .unwrap_or_else(|| workspace.config.names.fallback.clone());

    let groups = capture(layout);
    if groups.is_empty() {
        log::info!("nothing to save for {:?}", name);
        return Ok(SaveOutcome::NothingToSave);
    }

    let order = workspace.store.get(&name)?.and_then(|existing| existing.order);
    let snapshot = SavedSnapshot {
        name,
        timestamp: now_timestamp(),
        branch,
        project_key: workspace.identity.key.clone(),
        groups,
        order,
    };
    workspace.store.save(&snapshot)?;
    log::info!(
        "saved {} tabs as {:?} for {}",
        snapshot.tab_count(),
        snapshot.name,
        snapshot.project_key
    );
    Ok(SaveOutcome::Saved(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{LivePane, LiveTab, TabInput, VisibleEditor};

    fn text_tab(label: &str, active: bool) -> LiveTab {
        LiveTab {
            label: label.to_string(),
            input: TabInput::Text {
                uri: format!("file:///ws/{label}"),
            },
            is_active: active,
            is_pinned: false,
            is_dirty: false,
        }
    }

    #[test]
    fn capture_skips_tabs_without_resource() {
        let layout = EditorLayout {
            panes: vec![LivePane {
                view_column: 1,
                is_active: true,
                tabs: vec![
                    LiveTab {
                        label: "Terminal".into(),
                        input: TabInput::Terminal,
                        is_active: false,
                        is_pinned: false,
                        is_dirty: false,
                    },
                    text_tab("main.rs", true),
                ],
            }],
            visible: vec![],
        };
        let groups = capture(&layout);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].tabs.len(), 1);
        assert_eq!(groups[0].tabs[0].label, "main.rs");
    }

    #[test]
    fn capture_drops_panes_left_empty() {
        let layout = EditorLayout {
            panes: vec![
                LivePane {
                    view_column: 1,
                    is_active: false,
                    tabs: vec![LiveTab {
                        label: "Preview".into(),
                        input: TabInput::Webview {
                            view_type: "markdown.preview".into(),
                        },
                        is_active: true,
                        is_pinned: false,
                        is_dirty: false,
                    }],
                },
                LivePane {
                    view_column: 2,
                    is_active: true,
                    tabs: vec![text_tab("lib.rs", true)],
                },
                LivePane {
                    view_column: 3,
                    is_active: false,
                    tabs: vec![],
                },
            ],
            visible: vec![],
        };
        let groups = capture(&layout);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].view_column, 2);
        assert!(groups.iter().all(|g| !g.tabs.is_empty()));
    }

    #[test]
    fn capture_records_scroll_only_for_visible_editors() {
        let layout = EditorLayout {
            panes: vec![LivePane {
                view_column: 1,
                is_active: true,
                tabs: vec![text_tab("a.rs", true), text_tab("b.rs", false)],
            }],
            visible: vec![VisibleEditor {
                uri: "file:///ws/a.rs".into(),
                view_column: 1,
                first_visible_line: Some(120),
            }],
        };
        let groups = capture(&layout);
        assert_eq!(groups[0].tabs[0].scroll_line, Some(120));
        assert_eq!(groups[0].tabs[1].scroll_line, None);
    }

    #[test]
    fn capture_diff_uses_modified_side() {
        let layout = EditorLayout {
            panes: vec![LivePane {
                view_column: 1,
                is_active: true,
                tabs: vec![LiveTab {
                    label: "a.rs (Working Tree)".into(),
                    input: TabInput::TextDiff {
                        original: "git:/ws/a.rs?HEAD".into(),
                        modified: "file:///ws/a.rs".into(),
                    },
                    is_active: true,
                    is_pinned: false,
                    is_dirty: true,
                }],
            }],
            visible: vec![],
        };
        let groups = capture(&layout);
        assert_eq!(groups[0].tabs[0].uri, "file:///ws/a.rs");
        assert!(groups[0].tabs[0].is_dirty);
    }

    #[test]
    fn save_outcome_messages() {
        assert_eq!(SaveOutcome::NothingToSave.message(), "No tabs to save");
    }
}
