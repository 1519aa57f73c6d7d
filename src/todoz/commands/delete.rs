use crate::model::RecordList;

/// Removes the record with `id`. Unknown ids are a no-op.
pub fn run(current: &RecordList, id: i64) -> RecordList {
    if !current.contains(id) {
        return current.clone();
    }

    let records = current.iter().filter(|r| r.id != id).cloned().collect();
    RecordList::from_unique(records)
}
