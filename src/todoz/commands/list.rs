use crate::model::RecordList;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// Projects the list for display, keeping insertion order.
pub fn run(current: &RecordList, filter: StatusFilter) -> RecordList {
    match filter {
        StatusFilter::All => current.clone(),
        StatusFilter::Active => {
            RecordList::from_unique(current.iter().filter(|r| !r.completed).cloned().collect())
        }
        StatusFilter::Completed => {
            RecordList::from_unique(current.iter().filter(|r| r.completed).cloned().collect())
        }
    }
}
