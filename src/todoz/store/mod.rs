//! # Storage Layer
//!
//! A [`StorageBackend`] is a tiny key-value store: each key names one slot
//! holding one string. The persistence adapter keeps a whole record list in a
//! single slot, so a backend never needs to know what a record is.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: one `<key>.json` file per slot under a data directory.
//!   Writes go to a temp file and are renamed into place, so a failed write
//!   never leaves a half-written slot behind.
//! - [`memory::MemBackend`]: for tests. Can simulate read and write failures.
//!
//! ## Change detection
//!
//! Another process sharing the same data directory may rewrite a slot at any
//! time. [`StorageBackend::slot_mtime`] lets a watcher notice that and re-read
//! the slot.

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod fs;
pub mod memory;

pub trait StorageBackend {
    /// Read a slot. `Ok(None)` when the slot has never been written.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's value. MUST NOT leave a partial value behind on failure.
    fn write_slot(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove_slot(&self, key: &str) -> Result<()>;

    /// Last modification time, `Ok(None)` if the slot does not exist.
    fn slot_mtime(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    /// Where the slot lives. Virtual for non-file backends.
    fn slot_path(&self, key: &str) -> Result<PathBuf>;
}

/// Slot keys become file names, so only a conservative alphabet is allowed.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
