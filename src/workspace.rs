// ABOUTME: Workspace context: config, resolved project identity, and that project's store.
// ABOUTME: Built once per command and passed explicitly to every operation.

use std::path::PathBuf;

use crate::config::Config;
use crate::project::ProjectIdentity;
use crate::store::StateStore;

/// Everything an operation needs to know about where it runs.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: Config,
    pub identity: ProjectIdentity,
    pub store: StateStore,
}

impl Workspace {
    /// Resolve the project from the workspace roots (first one wins).
    pub fn resolve(config: Config, roots: &[PathBuf]) -> Self {
        let identity = ProjectIdentity::resolve(roots);
        log::debug!(
            "project key {:?}, branch {:?}",
            identity.key,
            identity.branch
        );
        Self::new(config, identity)
    }

    /// Build a workspace around an already-known identity.
    pub fn new(config: Config, identity: ProjectIdentity) -> Self {
        let store = StateStore::new(&config.root(), &identity.key);
        Self {
            config,
            identity,
            store,
        }
    }
}
