use crate::model::RecordList;

/// Flips `completed` on the record with `id`. Unknown ids are a no-op.
pub fn run(current: &RecordList, id: i64) -> RecordList {
    if !current.contains(id) {
        return current.clone();
    }

    let records = current
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if record.id == id {
                record.completed = !record.completed;
            }
            record
        })
        .collect();
    RecordList::from_unique(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::sparse_list;

    #[test]
    fn flips_only_the_matching_record() {
        let list = sparse_list();
        let result = run(&list, 3);

        assert!(result.get(3).unwrap().completed);
        assert_eq!(result.get(1), list.get(1));
        assert_eq!(result.len(), list.len());
    }

    #[test]
    fn unknown_id_is_noop() {
        let list = sparse_list();
        assert_eq!(run(&list, 2), list);
        assert_eq!(run(&RecordList::new(), 1), RecordList::new());
    }

    #[test]
    fn double_toggle_is_identity() {
        let list = sparse_list();
        for id in [1, 2, 3, 99] {
            assert_eq!(run(&run(&list, id), id), list);
        }
    }

    #[test]
    fn order_is_preserved() {
        let result = run(&sparse_list(), 1);
        let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
