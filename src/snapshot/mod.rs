// ABOUTME: Snapshot operations: capture the live layout, save it, and restore it later.
// ABOUTME: Restore is best-effort: missing files are collected into a report, never fatal.

pub mod capture;
pub mod restore;

pub use capture::{SaveOutcome, capture, save_current};
pub use restore::{MissingResource, RestoreReport, best_view_column, open_tab, restore};
