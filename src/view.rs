// ABOUTME: Presentation adapter: tree nodes, descriptions, tooltips, and the summary document.
// ABOUTME: Reads the store fresh on every call and maps snapshots into a navigable tree.

use chrono::{DateTime, Local};

use crate::model::{SavedSnapshot, Tab, TabGroup};
use crate::store::{StateStore, StoreResult};

/// Top-level tree node: one saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNode {
    pub snapshot: SavedSnapshot,
}

/// Child tree node: one tab of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabNode {
    pub snapshot_name: String,
    pub view_column: i32,
    pub tab: Tab,
}

/// Anything shown in the saved-tabs tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Snapshot(SnapshotNode),
    Tab(TabNode),
}

impl TreeNode {
    /// Name of the snapshot this node belongs to.
    pub fn snapshot_name(&self) -> &str {
        match self {
            TreeNode::Snapshot(node) => &node.snapshot.name,
            TreeNode::Tab(node) => &node.snapshot_name,
        }
    }
}

fn format_local(timestamp: &str, pattern: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Local).format(pattern).to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn saved_at(timestamp: &str) -> String {
    format_local(timestamp, "%Y-%m-%d %H:%M:%S")
}

impl SnapshotNode {
    pub fn label(&self) -> &str {
        &self.snapshot.name
    }

    /// e.g. `4 tabs, 2026-01-15`
    pub fn description(&self) -> String {
        format!(
            "{} tabs, {}",
            self.snapshot.tab_count(),
            format_local(&self.snapshot.timestamp, "%Y-%m-%d")
        )
    }

    pub fn tooltip(&self) -> String {
        let s = &self.snapshot;
        let mut parts = vec![
            format!("Name: {}", s.name),
            format!("Saved: {}", saved_at(&s.timestamp)),
        ];
        if let Some(branch) = &s.branch {
            parts.push(format!("Branch: {branch}"));
        }
        parts.push(format!("Tabs: {}", s.tab_count()));
        parts.push(format!("Groups: {}", s.groups.len()));
        parts.join("\n")
    }

    /// The snapshot's tabs, flattened across groups in stored order.
    pub fn children(&self) -> Vec<TabNode> {
        self.snapshot
            .groups
            .iter()
            .flat_map(|group| {
                group.tabs.iter().map(|tab| TabNode {
                    snapshot_name: self.snapshot.name.clone(),
                    view_column: group.view_column,
                    tab: tab.clone(),
                })
            })
            .collect()
    }
}

impl TabNode {
    pub fn label(&self) -> &str {
        &self.tab.label
    }

    pub fn description(&self) -> String {
        let mut parts = Vec::new();
        if self.tab.is_active {
            parts.push("active".to_string());
        }
        if self.tab.is_pinned {
            parts.push("pinned".to_string());
        }
        if self.tab.is_dirty {
            parts.push("modified".to_string());
        }
        if let Some(line) = self.tab.scroll_line {
            parts.push(format!("line {line}"));
        }
        parts.join(", ")
    }

    pub fn tooltip(&self) -> String {
        let mut parts = vec![
            self.tab.label.clone(),
            format!("Group: {}", self.view_column),
        ];
        if self.tab.is_active {
            parts.push("Active in group".to_string());
        }
        if self.tab.is_pinned {
            parts.push("Pinned".to_string());
        }
        if self.tab.is_dirty {
            parts.push("Has unsaved changes".to_string());
        }
        if let Some(line) = self.tab.scroll_line {
            parts.push(format!("Scroll position: line {line}"));
        }
        parts.push(format!("\n{}", self.tab.uri));
        parts.join("\n")
    }
}

/// Root nodes of the tree, in display order.
pub fn root_nodes(store: &StateStore) -> StoreResult<Vec<SnapshotNode>> {
    Ok(store
        .load_sorted()?
        .into_iter()
        .map(|snapshot| SnapshotNode { snapshot })
        .collect())
}

/// Handle a drop of snapshot nodes onto `target`.
///
/// Dropping on a tab node inserts before that tab's snapshot. Dropping on
/// empty space (no target) moves the dragged snapshots to the top.
pub fn drop_snapshots(
    store: &StateStore,
    dragged: &[TreeNode],
    target: Option<&TreeNode>,
) -> StoreResult<Vec<SnapshotNode>> {
    let names: Vec<String> = dragged
        .iter()
        .filter_map(|node| match node {
            TreeNode::Snapshot(s) => Some(s.snapshot.name.clone()),
            TreeNode::Tab(_) => None,
        })
        .collect();
    if names.is_empty() {
        return root_nodes(store);
    }
    let reordered = store.reorder(&names, target.map(TreeNode::snapshot_name))?;
    Ok(reordered
        .into_iter()
        .map(|snapshot| SnapshotNode { snapshot })
        .collect())
}

fn group_heading(group: &TabGroup) -> String {
    if group.is_active {
        format!("## Group {} (Active Group)", group.view_column)
    } else {
        format!("## Group {}", group.view_column)
    }
}

fn tab_line(tab: &Tab) -> String {
    let mut markers = String::new();
    if tab.is_active {
        markers.push_str("**[Active]** ");
    }
    if tab.is_pinned {
        markers.push_str("📌 ");
    }
    if tab.is_dirty {
        markers.push_str("● ");
    }
    format!("- {}{}", markers, tab.label)
}

/// Read-only markdown summary of one snapshot.
pub fn summary_markdown(snapshot: &SavedSnapshot) -> String {
    let mut lines = vec![
        format!("# {}", snapshot.name),
        String::new(),
        format!("**Saved:** {}", saved_at(&snapshot.timestamp)),
    ];
    if let Some(branch) = &snapshot.branch {
        lines.push(format!("**Branch:** {branch}"));
    }
    lines.push(format!("**Project:** {}", snapshot.project_key));
    lines.push(format!("**Total Tabs:** {}", snapshot.tab_count()));
    lines.push(format!("**Groups:** {}", snapshot.groups.len()));
    lines.push(String::new());

    for group in &snapshot.groups {
        lines.push(group_heading(group));
        lines.push(String::new());
        for tab in &group.tabs {
            lines.push(tab_line(tab));
            lines.push(format!("  `{}`", tab.uri));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}
