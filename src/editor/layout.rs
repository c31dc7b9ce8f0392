// ABOUTME: File-backed editor host: reads and writes an editor layout as a JSON document.
// ABOUTME: Lets the CLI capture from and restore into a layout that an editor integration syncs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use super::{
    EditorHost, EditorLayout, LivePane, LiveTab, OpenOptions, TabInput, VIEW_COLUMN_ACTIVE,
    VIEW_COLUMN_BESIDE, VisibleEditor,
};

/// Editor host whose state lives in a JSON layout file.
///
/// Mutations happen in memory; call [`LayoutFileHost::persist`] to write them back.
pub struct LayoutFileHost {
    path: PathBuf,
    layout: Mutex<EditorLayout>,
}

impl LayoutFileHost {
    /// Load the layout at `path`. A missing file is an empty editor.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let layout = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            EditorLayout::default()
        };
        Ok(Self::with_layout(path, layout))
    }

    /// Create a host around an in-memory layout (for testing).
    pub fn with_layout(path: &Path, layout: EditorLayout) -> Self {
        Self {
            path: path.to_path_buf(),
            layout: Mutex::new(layout),
        }
    }

    /// Copy of the current layout.
    pub fn snapshot(&self) -> EditorLayout {
        self.layout.lock().expect("layout lock poisoned").clone()
    }

    /// Write the current layout back to its file (atomic write via tmp + rename).
    pub fn persist(&self) -> anyhow::Result<()> {
        let layout = self.snapshot();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serde_json::to_string_pretty(&layout)?)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Local filesystem path for a `file://` URI or a bare absolute path.
///
/// URIs naming a remote host have no local path.
pub fn file_path(uri: &str) -> Option<PathBuf> {
    if uri.starts_with('/') {
        return Some(PathBuf::from(uri));
    }
    let url = Url::parse(uri).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

fn resolve_column(layout: &EditorLayout, requested: i32) -> i32 {
    match requested {
        VIEW_COLUMN_ACTIVE => layout.active_column().unwrap_or(1),
        VIEW_COLUMN_BESIDE => {
            layout
                .panes
                .iter()
                .map(|p| p.view_column)
                .max()
                .unwrap_or(0)
                + 1
        }
        column => column.max(1),
    }
}

#[async_trait]
impl EditorHost for LayoutFileHost {
    async fn layout(&self) -> anyhow::Result<EditorLayout> {
        Ok(self.snapshot())
    }

    async fn close_all(&self) -> anyhow::Result<()> {
        let mut layout = self.layout.lock().expect("layout lock poisoned");
        layout.panes.clear();
        layout.visible.clear();
        Ok(())
    }

    async fn exists(&self, uri: &str) -> bool {
        let Some(path) = file_path(uri) else {
            log::debug!("cannot stat non-file resource {}", uri);
            return false;
        };
        tokio::fs::metadata(&path).await.is_ok()
    }

    async fn open(&self, uri: &str, label: &str, options: OpenOptions) -> anyhow::Result<i32> {
        let mut layout = self.layout.lock().expect("layout lock poisoned");
        let column = resolve_column(&layout, options.view_column);
        let focus = !options.preserve_focus || layout.active_column().is_none();

        if !layout.has_column(column) {
            layout.panes.push(LivePane {
                view_column: column,
                is_active: false,
                tabs: Vec::new(),
            });
            layout.panes.sort_by_key(|p| p.view_column);
        }
        if focus {
            for pane in layout.panes.iter_mut() {
                pane.is_active = pane.view_column == column;
            }
        }

        let Some(pane) = layout.panes.iter_mut().find(|p| p.view_column == column) else {
            anyhow::bail!("pane {} vanished while opening {}", column, uri);
        };
        for tab in pane.tabs.iter_mut() {
            tab.is_active = false;
        }
        match pane
            .tabs
            .iter_mut()
            .find(|t| t.input.resource() == Some(uri))
        {
            Some(tab) => tab.is_active = true,
            None => pane.tabs.push(LiveTab {
                label: label.to_string(),
                input: TabInput::Text {
                    uri: uri.to_string(),
                },
                is_active: true,
                is_pinned: false,
                is_dirty: false,
            }),
        }

        layout.visible.retain(|v| v.view_column != column);
        layout.visible.push(VisibleEditor {
            uri: uri.to_string(),
            view_column: column,
            first_visible_line: Some(0),
        });
        Ok(column)
    }

    async fn reveal_line(&self, uri: &str, view_column: i32, line: u32) -> anyhow::Result<()> {
        let mut layout = self.layout.lock().expect("layout lock poisoned");
        let Some(editor) = layout
            .visible
            .iter_mut()
            .find(|v| v.uri == uri && v.view_column == view_column)
        else {
            anyhow::bail!("{} is not visible in column {}", uri, view_column);
        };
        editor.first_visible_line = Some(line);
        Ok(())
    }
}
