// ABOUTME: Library root for editortrail: re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod config;
pub mod editor;
pub mod model;
pub mod project;
pub mod snapshot;
pub mod store;
pub mod view;
pub mod workspace;
