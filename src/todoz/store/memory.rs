use super::{is_valid_key, StorageBackend};
use crate::error::{Result, TodozError};
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Clone)]
struct SlotEntry {
    value: String,
    mtime: DateTime<Utc>,
}

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since todoz is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    slots: RefCell<HashMap<String, SlotEntry>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as a full or disabled store would.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Make every subsequent read fail.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Raw slot value, bypassing the error switches.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).map(|e| e.value.clone())
    }

    fn check_key(key: &str) -> Result<()> {
        if is_valid_key(key) {
            Ok(())
        } else {
            Err(TodozError::Store(format!("Invalid slot key: {:?}", key)))
        }
    }
}

impl StorageBackend for MemBackend {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Self::check_key(key)?;
        if self.simulate_read_error.get() {
            return Err(TodozError::Store("Simulated read error".to_string()));
        }
        Ok(self.raw(key))
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        Self::check_key(key)?;
        if self.simulate_write_error.get() {
            return Err(TodozError::Store("Simulated write error".to_string()));
        }
        self.slots.borrow_mut().insert(
            key.to_string(),
            SlotEntry {
                value: value.to_string(),
                mtime: Utc::now(),
            },
        );
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        Self::check_key(key)?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }

    fn slot_mtime(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Self::check_key(key)?;
        Ok(self.slots.borrow().get(key).map(|e| e.mtime))
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        Self::check_key(key)?;
        Ok(PathBuf::from(format!("memory://{}", key)))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    impl MemBackend {
        /// Seed a slot with raw text, as if another instance had written it.
        pub fn with_slot(self, key: &str, value: &str) -> Self {
            self.slots.borrow_mut().insert(
                key.to_string(),
                SlotEntry {
                    value: value.to_string(),
                    mtime: Utc::now(),
                },
            );
            self
        }
    }
}
