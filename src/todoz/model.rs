use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

/// A single todo item.
///
/// `owner_tag` is carried through from the seed payload (`userId`) and is
/// never looked at by the list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    #[serde(
        rename = "userId",
        alias = "ownerTag",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_tag: Option<serde_json::Value>,
}

impl Record {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
            owner_tag: None,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_owner_tag(mut self, tag: serde_json::Value) -> Self {
        self.owner_tag = Some(tag);
        self
    }
}

/// An ordered snapshot of records. Insertion order is display order.
///
/// Ids are unique within a list. There is no way to mutate a list in place
/// from outside the crate: every operation in [`crate::commands`] hands back a
/// new `RecordList`, so observers only ever see complete snapshots.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<Record>")]
pub struct RecordList {
    records: Vec<Record>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from untrusted input. The first record with a given id
    /// wins; later duplicates are dropped.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for record in records {
            if seen.insert(record.id) {
                kept.push(record);
            } else {
                tracing::debug!(id = record.id, "dropping record with duplicate id");
            }
        }
        Self { records: kept }
    }

    /// Callers must guarantee id uniqueness.
    pub(crate) fn from_unique(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    pub fn max_id(&self) -> Option<i64> {
        self.records.iter().map(|r| r.id).max()
    }

    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.completed).count()
    }
}

impl From<Vec<Record>> for RecordList {
    fn from(records: Vec<Record>) -> Self {
        Self::from_records(records)
    }
}

impl Serialize for RecordList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
