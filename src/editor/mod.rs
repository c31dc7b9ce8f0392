// ABOUTME: Editor host seam: the live tab/pane layout and the operations restore needs.
// ABOUTME: Tab inputs are a tagged enum; only some variants resolve to a resource URI.

pub mod layout;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use layout::LayoutFileHost;

/// View column meaning "the currently active pane".
pub const VIEW_COLUMN_ACTIVE: i32 = -1;
/// View column meaning "a new pane beside the active one".
pub const VIEW_COLUMN_BESIDE: i32 = -2;

/// What a tab is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TabInput {
    Text { uri: String },
    TextDiff { original: String, modified: String },
    Custom { uri: String, view_type: String },
    Notebook { uri: String, notebook_type: String },
    NotebookDiff {
        original: String,
        modified: String,
        notebook_type: String,
    },
    Terminal,
    Webview { view_type: String },
    #[serde(other)]
    Unknown,
}

impl TabInput {
    /// The document this tab can be reopened from, if any. Diffs reopen the modified side.
    pub fn resource(&self) -> Option<&str> {
        match self {
            TabInput::Text { uri } | TabInput::Custom { uri, .. } | TabInput::Notebook { uri, .. } => {
                Some(uri.as_str())
            }
            TabInput::TextDiff { modified, .. } | TabInput::NotebookDiff { modified, .. } => {
                Some(modified.as_str())
            }
            TabInput::Terminal | TabInput::Webview { .. } | TabInput::Unknown => None,
        }
    }
}

/// A tab as the editor currently shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTab {
    pub label: String,
    pub input: TabInput,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_dirty: bool,
}

/// A pane (tab group) as the editor currently shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePane {
    pub view_column: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub tabs: Vec<LiveTab>,
}

/// A text editor that is on screen, with the first line it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleEditor {
    pub uri: String,
    pub view_column: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_visible_line: Option<u32>,
}

/// Everything the editor reports about its current layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorLayout {
    #[serde(default)]
    pub panes: Vec<LivePane>,
    #[serde(default)]
    pub visible: Vec<VisibleEditor>,
}

impl EditorLayout {
    /// View column of the focused pane, if any.
    pub fn active_column(&self) -> Option<i32> {
        self.panes.iter().find(|p| p.is_active).map(|p| p.view_column)
    }

    pub fn has_column(&self, view_column: i32) -> bool {
        self.panes.iter().any(|p| p.view_column == view_column)
    }

    /// Total tabs across all panes, including ones without a resource.
    pub fn tab_count(&self) -> usize {
        self.panes.iter().map(|p| p.tabs.len()).sum()
    }
}

/// How a document should be shown when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub view_column: i32,
    pub preserve_focus: bool,
    pub preview: bool,
}

/// The editor operations snapshots are captured from and restored into.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Current panes, tabs, and visible editors.
    async fn layout(&self) -> anyhow::Result<EditorLayout>;

    /// Close every open editor.
    async fn close_all(&self) -> anyhow::Result<()>;

    /// Whether the resource behind `uri` still exists.
    async fn exists(&self, uri: &str) -> bool;

    /// Open `uri` as a document. Returns the view column it ended up in.
    async fn open(&self, uri: &str, label: &str, options: OpenOptions) -> anyhow::Result<i32>;

    /// Scroll the editor showing `uri` in `view_column` so `line` is at the top.
    async fn reveal_line(&self, uri: &str, view_column: i32, line: u32) -> anyhow::Result<()>;
}

/// Human-readable listing of the live layout, one line per pane and tab.
pub fn describe_layout(layout: &EditorLayout) -> String {
    let mut lines = Vec::new();
    for pane in &layout.panes {
        let suffix = if pane.is_active { " (active group)" } else { "" };
        lines.push(format!("Group {}{}", pane.view_column, suffix));
        for tab in &pane.tabs {
            let active = if tab.is_active { " (active tab)" } else { "" };
            let target = tab
                .input
                .resource()
                .map(|uri| format!(" -> {uri}"))
                .unwrap_or_default();
            lines.push(format!("- {}{}{}", tab.label, active, target));
        }
    }
    lines.join("\n")
}
