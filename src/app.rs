// ABOUTME: App orchestrator: wires CLI commands to snapshot operations, storage, and views.
// ABOUTME: Every command builds its output as a string so the binary only has to print it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;

use crate::editor::{EditorHost, LayoutFileHost, describe_layout};
use crate::model::EventKind;
use crate::snapshot::{self, SaveOutcome};
use crate::store::analyze_history;
use crate::view::{self, SnapshotNode, TreeNode};
use crate::workspace::Workspace;

/// User-facing commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Save the open tabs under a name (defaults to the current branch)
    Save {
        name: Option<String>,
        /// Editor layout file to capture from
        #[arg(long)]
        layout: PathBuf,
    },
    /// Close everything and reopen a saved snapshot
    Restore {
        name: String,
        #[arg(long)]
        layout: PathBuf,
    },
    /// List saved snapshots in display order
    List,
    /// List the tabs stored in a snapshot
    Tabs { name: String },
    /// Show a markdown summary of a snapshot
    Show { name: String },
    /// Rename a snapshot
    Rename { old: String, new: String },
    /// Delete a snapshot
    Delete { name: String },
    /// Move snapshots before another one (or to the top)
    Move {
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(long)]
        before: Option<String>,
    },
    /// Open one tab (1-based, as listed by `tabs`) from a snapshot
    Open {
        name: String,
        index: usize,
        #[arg(long)]
        layout: PathBuf,
    },
    /// Record a tab event in the history log
    Log {
        #[arg(value_enum)]
        event: EventKind,
        uri: String,
        label: Option<String>,
    },
    /// Show the most-used documents from the history log
    Stats {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print the panes and tabs in a layout file
    Layout {
        #[arg(long)]
        layout: PathBuf,
    },
}

/// Top-level application bound to one workspace.
pub struct App {
    workspace: Workspace,
}

impl App {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Run one command and return what should be printed.
    pub async fn run(&self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Save { name, layout } => self.save(name.as_deref(), &layout).await,
            Command::Restore { name, layout } => self.restore(&name, &layout).await,
            Command::List => self.list(),
            Command::Tabs { name } => self.tabs(&name),
            Command::Show { name } => Ok(view::summary_markdown(&self.node(&name)?.snapshot)),
            Command::Rename { old, new } => self.rename(&old, &new),
            Command::Delete { name } => self.delete(&name),
            Command::Move { names, before } => self.move_before(&names, before.as_deref()),
            Command::Open {
                name,
                index,
                layout,
            } => self.open(&name, index, &layout).await,
            Command::Log { event, uri, label } => self.log_event(event, &uri, label.as_deref()),
            Command::Stats { limit } => self.stats(limit),
            Command::Layout { layout } => {
                let host = LayoutFileHost::load(&layout)?;
                Ok(describe_layout(&host.layout().await?))
            }
        }
    }

    fn node(&self, name: &str) -> anyhow::Result<SnapshotNode> {
        let snapshot = self
            .workspace
            .store
            .get(name)?
            .with_context(|| format!("No tab configuration named \"{name}\""))?;
        Ok(SnapshotNode { snapshot })
    }

    async fn save(&self, name: Option<&str>, layout: &Path) -> anyhow::Result<String> {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.workspace
                .config
                .validate_name(name)
                .map_err(anyhow::Error::msg)?;
        }
        let host = LayoutFileHost::load(layout)?;
        let live = host.layout().await?;
        let outcome = snapshot::save_current(&self.workspace, name, &live)
            .context("Failed to save tabs")?;
        if let SaveOutcome::NothingToSave = outcome {
            log::warn!("layout {} has no tabs to save", layout.display());
        }
        Ok(outcome.message())
    }

    async fn restore(&self, name: &str, layout: &Path) -> anyhow::Result<String> {
        let node = self.node(name)?;
        let host = LayoutFileHost::load(layout)?;
        let mut history = self.workspace.store.history_logger();
        let report = snapshot::restore(&node.snapshot, &host, Some(&mut history))
            .await
            .context("Failed to restore tabs")?;
        host.persist()?;

        let mut lines = vec![report.message()];
        for missing in &report.missing {
            lines.push(format!("  missing: {} ({})", missing.label, missing.uri));
        }
        Ok(lines.join("\n"))
    }

    fn list(&self) -> anyhow::Result<String> {
        let nodes = view::root_nodes(&self.workspace.store)?;
        if nodes.is_empty() {
            return Ok(format!(
                "No saved tabs for {}",
                self.workspace.identity.key
            ));
        }
        Ok(render_nodes(&nodes))
    }

    fn tabs(&self, name: &str) -> anyhow::Result<String> {
        let node = self.node(name)?;
        let lines: Vec<String> = node
            .children()
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let description = child.description();
                let mut line = format!("{:>3}. [{}] {}", i + 1, child.view_column, child.label());
                if !description.is_empty() {
                    line.push_str(&format!(" ({description})"));
                }
                line.push_str(&format!("\n     {}", child.tab.uri));
                line
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn rename(&self, old: &str, new: &str) -> anyhow::Result<String> {
        self.workspace
            .config
            .validate_name(new)
            .map_err(anyhow::Error::msg)?;
        if old == new {
            return Ok(format!("\"{old}\" unchanged"));
        }
        self.workspace
            .store
            .rename(old, new)
            .context("Failed to rename")?;
        Ok(format!("Renamed to \"{new}\""))
    }

    fn delete(&self, name: &str) -> anyhow::Result<String> {
        self.workspace
            .store
            .delete(name)
            .context("Failed to delete")?;
        Ok(format!("Deleted \"{name}\""))
    }

    fn move_before(&self, names: &[String], before: Option<&str>) -> anyhow::Result<String> {
        let store = &self.workspace.store;
        let dragged: Vec<TreeNode> = names
            .iter()
            .map(|name| self.node(name).map(TreeNode::Snapshot))
            .collect::<anyhow::Result<_>>()?;
        let target = before.map(|name| self.node(name)).transpose()?.map(TreeNode::Snapshot);
        let nodes = view::drop_snapshots(store, &dragged, target.as_ref())
            .context("Failed to reorder")?;
        Ok(render_nodes(&nodes))
    }

    async fn open(&self, name: &str, index: usize, layout: &Path) -> anyhow::Result<String> {
        let node = self.node(name)?;
        let children = node.children();
        let Some(child) = index.checked_sub(1).and_then(|i| children.get(i)) else {
            anyhow::bail!(
                "\"{}\" has {} tabs; no tab number {}",
                name,
                children.len(),
                index
            );
        };

        let host = LayoutFileHost::load(layout)?;
        let mut history = self.workspace.store.history_logger();
        let column =
            snapshot::open_tab(&child.tab, child.view_column, &host, Some(&mut history)).await?;
        host.persist()?;
        Ok(format!("Opened {} in group {}", child.label(), column))
    }

    fn log_event(&self, event: EventKind, uri: &str, label: Option<&str>) -> anyhow::Result<String> {
        let label = label
            .map(str::to_string)
            .unwrap_or_else(|| uri.rsplit('/').next().unwrap_or(uri).to_string());
        let mut logger = self.workspace.store.history_logger();
        logger.record(event, uri, &label)?;
        Ok(format!("Logged {} {}", event, label))
    }

    fn stats(&self, limit: usize) -> anyhow::Result<String> {
        let sessions = self.workspace.store.load_history()?;
        let stats = analyze_history(&sessions);
        if stats.is_empty() {
            return Ok("No history recorded".to_string());
        }
        let lines: Vec<String> = stats
            .iter()
            .take(limit)
            .map(|s| {
                format!(
                    "{:<30} opens {:>3}  switches {:>3}  {:>6}s  last {}",
                    s.label,
                    s.open_count,
                    s.switch_count,
                    s.total_time_ms / 1000,
                    s.last_accessed
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

fn render_nodes(nodes: &[SnapshotNode]) -> String {
    nodes
        .iter()
        .map(|node| format!("{}  ({})", node.label(), node.description()))
        .collect::<Vec<_>>()
        .join("\n")
}
