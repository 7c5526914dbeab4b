//! gymtrack-storage - Storage library for gymtrack
//!
//! This crate provides the file-backed key-value store that persists
//! workout sessions between runs.

mod file_store;

pub use file_store::FileSystemStore;
