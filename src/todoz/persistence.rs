//! # Persistence
//!
//! The whole record list lives in one storage slot as a JSON envelope:
//!
//! ```text
//! { "version": 1, "records": [ { "id": 1, "title": "...", "completed": false }, ... ] }
//! ```
//!
//! A bare JSON array of records is accepted on load too; that is what the
//! simplest clients write.
//!
//! Junk in the slot or an envelope from a future version degrades to "no
//! data" with a log line, as does a failed write. Only
//! [`PersistenceAdapter::load_existing`] reports an unreadable slot, so
//! initialization can leave it alone instead of seeding over it. Within an otherwise valid envelope, individual
//! records that lack an integer `id`, a string `title` or a boolean
//! `completed` are dropped and the rest are kept.

use crate::error::Result;
use crate::model::{Record, RecordList};
use crate::store::StorageBackend;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

pub const CURRENT_VERSION: u64 = 1;
pub const DEFAULT_KEY: &str = "todos";

#[derive(Debug, Serialize)]
pub struct PersistedEnvelope<'a> {
    pub version: u64,
    pub records: &'a RecordList,
}

impl<'a> PersistedEnvelope<'a> {
    pub fn current(records: &'a RecordList) -> Self {
        Self {
            version: CURRENT_VERSION,
            records,
        }
    }
}

pub struct PersistenceAdapter<B: StorageBackend> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> PersistenceAdapter<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored list, or an empty one when there is nothing usable.
    pub fn load(&self) -> RecordList {
        match self.load_existing() {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read persisted slot");
                RecordList::new()
            }
        }
    }

    /// Like [`load`](Self::load), but tells "nothing usable stored"
    /// (`Ok(None)`) apart from "an empty list was stored" (`Ok(Some(..))`).
    /// A slot that exists but cannot be read is an `Err`: its content is
    /// unknown and must not be replaced as if it were absent.
    pub fn load_existing(&self) -> Result<Option<RecordList>> {
        match self.backend.read_slot(&self.key)? {
            Some(raw) => Ok(decode(&raw)),
            None => {
                tracing::debug!(key = %self.key, "no persisted slot");
                Ok(None)
            }
        }
    }

    /// Writes the list under the current envelope version. Failures are
    /// logged and reported as `false`; the previous slot value stays intact.
    pub fn save(&self, list: &RecordList) -> bool {
        let encoded = match encode(list) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode record list");
                return false;
            }
        };
        match self.backend.write_slot(&self.key, &encoded) {
            Ok(()) => {
                tracing::debug!(key = %self.key, len = list.len(), "saved record list");
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not save record list");
                false
            }
        }
    }

    /// Drops the slot entirely so the next start behaves like a first run.
    pub fn clear(&self) -> bool {
        match self.backend.remove_slot(&self.key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not remove persisted slot");
                false
            }
        }
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        match self.backend.slot_mtime(&self.key) {
            Ok(mtime) => mtime,
            Err(e) => {
                tracing::debug!(key = %self.key, error = %e, "could not stat persisted slot");
                None
            }
        }
    }

    pub fn path(&self) -> Result<PathBuf> {
        self.backend.slot_path(&self.key)
    }
}

pub fn encode(list: &RecordList) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&PersistedEnvelope::current(list))
}

/// Parses a slot value. `None` means the whole value is unusable.
pub fn decode(raw: &str) -> Option<RecordList> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "persisted slot is not valid JSON, discarding");
            return None;
        }
    };

    let elements = match value {
        Value::Array(items) => items,
        Value::Object(mut envelope) => {
            if let Some(version) = envelope.get("version") {
                if version.as_u64() != Some(CURRENT_VERSION) {
                    tracing::warn!(%version, "unrecognized envelope version, discarding");
                    return None;
                }
            }
            match envelope.remove("records") {
                Some(Value::Array(items)) => items,
                _ => {
                    tracing::warn!("envelope has no records array, discarding");
                    return None;
                }
            }
        }
        _ => {
            tracing::warn!("persisted slot has an unexpected shape, discarding");
            return None;
        }
    };

    let total = elements.len();
    let list = RecordList::from_records(elements.into_iter().filter_map(validate_record));
    if list.len() < total {
        tracing::warn!(
            dropped = total - list.len(),
            kept = list.len(),
            "dropped invalid persisted records"
        );
    }
    Some(list)
}

fn validate_record(value: Value) -> Option<Record> {
    let fields = (
        value.get("id").and_then(Value::as_i64),
        value.get("title").and_then(Value::as_str),
        value.get("completed").and_then(Value::as_bool),
    );
    let (Some(id), Some(title), Some(completed)) = fields else {
        tracing::debug!(record = %value, "dropping malformed record");
        return None;
    };

    let record = Record::new(id, title).with_completed(completed);
    let owner_tag = ["userId", "ownerTag"]
        .iter()
        .filter_map(|field| value.get(*field))
        .find(|tag| !tag.is_null());
    Some(match owner_tag {
        Some(tag) => record.with_owner_tag(tag.clone()),
        None => record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemBackend;
    use serde_json::json;

    fn adapter_with(raw: &str) -> PersistenceAdapter<MemBackend> {
        PersistenceAdapter::new(MemBackend::new().with_slot(DEFAULT_KEY, raw), DEFAULT_KEY)
    }

    fn sample() -> RecordList {
        RecordList::from_records(vec![
            Record::new(1, "A").with_completed(true),
            Record::new(5, "B").with_owner_tag(json!(3)),
        ])
    }

    #[test]
    fn absent_slot_loads_empty() {
        let adapter = PersistenceAdapter::new(MemBackend::new(), DEFAULT_KEY);
        assert!(adapter.load().is_empty());
        assert!(adapter.load_existing().unwrap().is_none());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let adapter = PersistenceAdapter::new(MemBackend::new(), DEFAULT_KEY);
        assert!(adapter.save(&sample()));
        assert_eq!(adapter.load(), sample());
    }

    #[test]
    fn saved_empty_list_is_existing() {
        let adapter = PersistenceAdapter::new(MemBackend::new(), DEFAULT_KEY);
        adapter.save(&RecordList::new());
        assert_eq!(adapter.load_existing().unwrap(), Some(RecordList::new()));
    }

    #[test]
    fn save_writes_versioned_envelope() {
        let adapter = PersistenceAdapter::new(MemBackend::new(), DEFAULT_KEY);
        adapter.save(&sample());

        let raw = adapter.backend().raw(DEFAULT_KEY).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], json!(1));
        assert_eq!(value["records"][1]["userId"], json!(3));
    }

    #[test]
    fn not_json_loads_empty() {
        let adapter = adapter_with("not json");
        assert!(adapter.load().is_empty());
        assert!(adapter.load_existing().unwrap().is_none());
    }

    #[test]
    fn partial_recovery_keeps_valid_elements() {
        let adapter = adapter_with(r#"[{"id":1,"title":"A","completed":true},{"id":"bad"}]"#);
        let list = adapter.load();
        assert_eq!(list.len(), 1);
        assert_eq!(list.records()[0], Record::new(1, "A").with_completed(true));
    }

    #[test]
    fn elements_need_all_required_fields() {
        let raw = json!({
            "version": 1,
            "records": [
                {"id": 1, "title": "ok", "completed": false},
                {"id": 2.5, "title": "float id", "completed": false},
                {"id": 3, "title": 7, "completed": false},
                {"id": 4, "title": "string flag", "completed": "yes"},
                {"title": "no id", "completed": false},
                "not an object",
                {"id": 6, "title": "also ok", "completed": true}
            ]
        });
        let list = decode(&raw.to_string()).unwrap();
        let ids: Vec<i64> = list.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 6]);
    }

    #[test]
    fn owner_tag_under_either_name_keeps_record() {
        let raw = json!([
            {"id": 1, "title": "A", "completed": true, "userId": 1, "ownerTag": "x"},
            {"id": 2, "title": "B", "completed": false, "ownerTag": "x"},
            {"id": 3, "title": "C", "completed": false, "userId": null}
        ]);
        let list = decode(&raw.to_string()).unwrap();

        let ids: Vec<i64> = list.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(list.get(1).unwrap().owner_tag, Some(json!(1)));
        assert_eq!(list.get(2).unwrap().owner_tag, Some(json!("x")));
        assert_eq!(list.get(3).unwrap().owner_tag, None);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let raw = r#"[{"id":1,"title":"A","completed":false},{"id":1,"title":"B","completed":true}]"#;
        let list = decode(raw).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.records()[0].title, "A");
    }

    #[test]
    fn envelope_without_version_is_accepted() {
        let list = decode(r#"{"records":[{"id":1,"title":"A","completed":false}]}"#).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn unknown_version_is_discarded() {
        assert!(decode(r#"{"version":2,"records":[]}"#).is_none());
        assert!(decode(r#"{"version":"1","records":[]}"#).is_none());
        assert!(adapter_with(r#"{"version":99,"records":[]}"#).load().is_empty());
    }

    #[test]
    fn wrong_shapes_are_discarded() {
        assert!(decode("42").is_none());
        assert!(decode(r#""text""#).is_none());
        assert!(decode("null").is_none());
        assert!(decode(r#"{"version":1}"#).is_none());
        assert!(decode(r#"{"version":1,"records":{}}"#).is_none());
    }

    #[test]
    fn failed_save_keeps_previous_envelope() {
        let adapter = PersistenceAdapter::new(MemBackend::new(), DEFAULT_KEY);
        adapter.save(&sample());
        let before = adapter.backend().raw(DEFAULT_KEY);

        adapter.backend().set_simulate_write_error(true);
        assert!(!adapter.save(&RecordList::new()));

        assert_eq!(adapter.backend().raw(DEFAULT_KEY), before);
        adapter.backend().set_simulate_write_error(false);
        assert_eq!(adapter.load(), sample());
    }

    #[test]
    fn read_failure_loads_empty() {
        let adapter = adapter_with(r#"[{"id":1,"title":"A","completed":true}]"#);
        adapter.backend().set_simulate_read_error(true);
        assert!(adapter.load().is_empty());
        assert!(adapter.load_existing().is_err());
    }

    #[test]
    fn clear_removes_slot() {
        let adapter = PersistenceAdapter::new(MemBackend::new(), DEFAULT_KEY);
        adapter.save(&sample());
        assert!(adapter.clear());
        assert!(adapter.load_existing().unwrap().is_none());
        assert!(adapter.modified_at().is_none());
    }
}
