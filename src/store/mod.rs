// ABOUTME: Storage layer: per-project snapshot file and date-partitioned history log.
// ABOUTME: All reads go straight to disk; there is no in-memory cache.

pub mod history;
pub mod state;

use std::path::PathBuf;

use thiserror::Error;

pub use history::{HistoryLogger, analyze_history, load_history};
pub use state::StateStore;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Tab state \"{0}\" not found")]
    NotFound(String),

    #[error("Tab state \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn read_and_write_failures_read_differently() {
        let read = StoreError::Corrupt {
            path: PathBuf::from("/s/state.json"),
            source: json_error(),
        };
        let write = StoreError::Encode {
            path: PathBuf::from("/s/state.json"),
            source: json_error(),
        };
        assert!(read.to_string().starts_with("failed to parse /s/state.json"));
        assert!(write.to_string().starts_with("failed to encode /s/state.json"));
    }
}
