use crate::model::RecordList;

/// Picks the starting list. Persisted data wins over the seed so local edits
/// survive a reload; with neither, the list starts empty.
pub fn run(seed: Option<RecordList>, persisted: Option<RecordList>) -> RecordList {
    match (persisted, seed) {
        (Some(persisted), _) => {
            tracing::debug!(len = persisted.len(), "starting from persisted list");
            persisted
        }
        (None, Some(seed)) => {
            tracing::debug!(len = seed.len(), "starting from seed list");
            seed
        }
        (None, None) => RecordList::new(),
    }
}
