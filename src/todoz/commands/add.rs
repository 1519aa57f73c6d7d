use crate::model::{Record, RecordList};

/// Appends a new open record. Blank titles are ignored and `current` comes
/// back unchanged.
///
/// The new id is `max(ids) + 1` rather than `len + 1`, so ids stay unique
/// after deletions.
pub fn run(current: &RecordList, title: &str) -> RecordList {
    let title = title.trim();
    if title.is_empty() {
        return current.clone();
    }

    let Some(id) = current.max_id().unwrap_or(0).checked_add(1) else {
        tracing::warn!("record ids exhausted, refusing to add");
        return current.clone();
    };

    let mut records = current.records().to_vec();
    records.push(Record::new(id, title));
    RecordList::from_unique(records)
}
