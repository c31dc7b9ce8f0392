// ABOUTME: Project identity: derives a stable storage key from the git remote or folder name.
// ABOUTME: Also resolves the current branch, treating any git failure as "unavailable".

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Key used when there is no workspace folder at all.
pub const DEFAULT_PROJECT_KEY: &str = "default";

/// Resolved identity of the workspace a command runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub key: String,
    pub branch: Option<String>,
}

impl ProjectIdentity {
    /// Resolve identity for a set of workspace roots. Only the first root is used.
    pub fn resolve(roots: &[PathBuf]) -> Self {
        match roots.first() {
            Some(root) => Self {
                key: project_key(root),
                branch: current_branch(root),
            },
            None => Self {
                key: DEFAULT_PROJECT_KEY.to_string(),
                branch: None,
            },
        }
    }
}

/// Run git in `dir` and return trimmed stdout, or None on any failure.
fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// Stable key for a workspace: the normalized origin remote, else the folder name.
pub fn project_key(root: &Path) -> String {
    if let Some(remote) = git_output(root, &["config", "--get", "remote.origin.url"]) {
        let key = normalize_remote(&remote);
        if !key.is_empty() {
            return key;
        }
    }
    log::debug!(
        "no git remote for {}, using folder name as project key",
        root.display()
    );
    folder_key(root)
}

/// Final path segment of `root`, or the default key for paths without one.
pub fn folder_key(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_PROJECT_KEY.to_string())
}

/// Short name of the checked-out branch.
pub fn current_branch(root: &Path) -> Option<String> {
    git_output(root, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Turn a git remote URL into a filesystem-safe key.
///
/// Handles:
/// - `git@github.com:owner/repo.git`
/// - `https://github.com/owner/repo.git`
/// - `ssh://git@host:2222/owner/repo`
///
/// The first two both become `github.com-owner-repo`.
pub fn normalize_remote(remote: &str) -> String {
    let remote = remote.trim();

    let location = match remote.split_once("://") {
        Some((_scheme, rest)) => strip_userinfo(rest).to_string(),
        None => match remote.split_once(':') {
            // scp-like syntax: [user@]host:path
            Some((host, path)) if !host.contains('/') => {
                format!("{}/{}", strip_userinfo(host), path.trim_start_matches('/'))
            }
            _ => remote.to_string(),
        },
    };

    let location = location.trim_end_matches('/');
    let location = location.strip_suffix(".git").unwrap_or(location);

    location
        .replace(['/', '\\', ':'], "-")
        .trim_matches('-')
        .to_string()
}

fn strip_userinfo(s: &str) -> &str {
    let authority_end = s.find('/').unwrap_or(s.len());
    match s[..authority_end].rfind('@') {
        Some(at) => &s[at + 1..],
        None => s,
    }
}
