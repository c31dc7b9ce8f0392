// ABOUTME: Configuration loading for editortrail.
// ABOUTME: Reads ~/.editortrail/config.toml and resolves the on-disk storage layout.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides the storage root (defaults to ~/.editortrail).
    pub root_dir: Option<PathBuf>,
    pub names: NamesConfig,
}

/// Rules for snapshot names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamesConfig {
    pub max_length: usize,
    /// Used when no name is given and no branch can be resolved.
    pub fallback: String,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            max_length: 100,
            fallback: "untitled".to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.editortrail/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path (for testing).
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Default storage root: ~/.editortrail.
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".editortrail")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::default_root().join("config.toml")
    }

    /// Effective storage root.
    pub fn root(&self) -> PathBuf {
        self.root_dir.clone().unwrap_or_else(Self::default_root)
    }

    /// Check a user-supplied snapshot name against the configured limits.
    pub fn validate_name(&self, name: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if name.chars().count() > self.names.max_length {
            return Err(format!(
                "Name is too long (max {} characters)",
                self.names.max_length
            ));
        }
        Ok(())
    }
}

/// Directory holding everything stored for one project.
pub fn project_dir(root: &Path, project_key: &str) -> PathBuf {
    root.join("tabs").join("projects").join(project_key)
}

/// Path to a project's snapshot file.
pub fn state_path(root: &Path, project_key: &str) -> PathBuf {
    project_dir(root, project_key).join("state.json")
}

/// Directory holding a project's history log files.
pub fn history_dir(root: &Path, project_key: &str) -> PathBuf {
    project_dir(root, project_key).join("history")
}
