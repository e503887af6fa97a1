//! In-memory train/validation collections with id assignment and edits

use crate::error::StoreError;
use curator_domain::{Changes, Record, Split, ID_KEY, INPUT_KEY, RESULT_KEY};
use serde::Serialize;
use tracing::{debug, info};

/// Record counts per split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DatasetStats {
    /// Training records
    pub train: usize,
    /// Validation records
    pub validation: usize,
}

impl DatasetStats {
    /// Records across both splits
    pub fn total(&self) -> usize {
        self.train + self.validation
    }
}

/// The two record collections of a project
///
/// Ids (`Result.id`) are unique per split, not across splits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    train: Vec<Record>,
    validation: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from existing collections
    pub fn new(train: Vec<Record>, validation: Vec<Record>) -> Self {
        Self { train, validation }
    }

    /// Records of a split, in stored order
    pub fn records(&self, split: Split) -> &[Record] {
        match split {
            Split::Train => &self.train,
            Split::Validation => &self.validation,
        }
    }

    fn records_mut(&mut self, split: Split) -> &mut Vec<Record> {
        match split {
            Split::Train => &mut self.train,
            Split::Validation => &mut self.validation,
        }
    }

    /// Record counts per split
    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            train: self.train.len(),
            validation: self.validation.len(),
        }
    }

    /// First record of `split` with this id
    pub fn get(&self, split: Split, id: i64) -> Option<&Record> {
        self.records(split).iter().find(|r| r.id() == Some(id))
    }

    /// Id the next appended record of `split` receives
    ///
    /// One more than the largest integer id present; records without one
    /// count as 0, so an empty split starts at 1.
    ///
    /// # Errors
    ///
    /// [`StoreError::IdOverflow`] when the largest id is `i64::MAX`.
    pub fn next_id(&self, split: Split) -> Result<i64, StoreError> {
        self.max_id(split)
            .checked_add(1)
            .ok_or(StoreError::IdOverflow { split })
    }

    fn max_id(&self, split: Split) -> i64 {
        self.records(split)
            .iter()
            .map(|r| r.id().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    /// Append records, assigning fresh sequential ids in batch order
    ///
    /// Any id the incoming records carry is overwritten. Returns the ids
    /// assigned. Nothing is appended if the batch would run past `i64::MAX`.
    pub fn append<I>(&mut self, split: Split, records: I) -> Result<Vec<i64>, StoreError>
    where
        I: IntoIterator<Item = Record>,
    {
        let records: Vec<Record> = records.into_iter().collect();
        let start = self.max_id(split);
        let assigned = (1..=records.len())
            .map(|offset| i64::try_from(offset).ok().and_then(|n| start.checked_add(n)))
            .collect::<Option<Vec<i64>>>()
            .ok_or(StoreError::IdOverflow { split })?;

        let target = self.records_mut(split);
        for (mut record, &id) in records.into_iter().zip(&assigned) {
            record.set_id(id);
            target.push(record);
        }
        info!(%split, count = assigned.len(), "Appended records");
        Ok(assigned)
    }

    /// Import records from outside; same id rule as [`Dataset::append`]
    pub fn import<I>(&mut self, split: Split, records: I) -> Result<Vec<i64>, StoreError>
    where
        I: IntoIterator<Item = Record>,
    {
        self.append(split, records)
    }

    /// Apply dotted-path changes to the record with this id
    ///
    /// Paths start at the record root (`Result.target`, `Input.query`).
    /// The changes are applied to a copy; the stored record is replaced only
    /// if every change succeeds and the outcome is still a valid record
    /// whose id is an integer not used by another record of the split.
    ///
    /// # Errors
    ///
    /// - [`StoreError::RecordNotFound`] when no record has `id`
    /// - [`StoreError::InvalidChange`] for a path outside `Input`/`Result`
    ///   or a change that leaves `Result.id` missing or non-integer
    /// - [`StoreError::Domain`] when a path walks through a non-object
    /// - [`StoreError::DuplicateId`] when the new id collides
    pub fn modify(&mut self, split: Split, id: i64, changes: &Changes) -> Result<&Record, StoreError> {
        let index = self
            .records(split)
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or(StoreError::RecordNotFound { split, id })?;

        for (path, _) in changes.iter() {
            let root = path.segments()[0].as_str();
            if root != INPUT_KEY && root != RESULT_KEY {
                return Err(StoreError::InvalidChange(format!(
                    "'{}' must start with {} or {}",
                    path, INPUT_KEY, RESULT_KEY
                )));
            }
        }

        let mut value = self.records(split)[index].to_value();
        changes.apply(&mut value)?;
        let updated = Record::try_from_value(value)?;

        let new_id = updated.id().ok_or_else(|| {
            StoreError::InvalidChange(format!("{}.{} must remain an integer", RESULT_KEY, ID_KEY))
        })?;
        if new_id != id {
            let taken = self
                .records(split)
                .iter()
                .enumerate()
                .any(|(i, r)| i != index && r.id() == Some(new_id));
            if taken {
                return Err(StoreError::DuplicateId { split, id: new_id });
            }
        }

        debug!(%split, id, changes = changes.len(), "Record modified");
        let slot = &mut self.records_mut(split)[index];
        *slot = updated;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_domain::{DomainError, FieldPath};
    use proptest::prelude::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(&value).unwrap()
    }

    fn with_ids(ids: &[i64]) -> Vec<Record> {
        ids.iter()
            .map(|id| record(json!({"Input": {"query": format!("q{id}")}, "Result": {"id": id}})))
            .collect()
    }

    fn changes(assignments: &[&str]) -> Changes {
        Changes::from_assignments(assignments.iter().copied()).unwrap()
    }

    #[test]
    fn test_next_id_starts_at_one() {
        let dataset = Dataset::default();
        assert_eq!(dataset.next_id(Split::Train).unwrap(), 1);
    }

    #[test]
    fn test_append_continues_from_max() {
        let mut dataset = Dataset::new(with_ids(&[3, 7, 5]), Vec::new());
        let fresh = vec![
            record(json!({"Input": {}, "Result": {"id": 1}})),
            record(json!({"Input": {}, "Result": {}})),
        ];

        let ids = dataset.append(Split::Train, fresh).unwrap();
        assert_eq!(ids, vec![8, 9]);
        let stored: Vec<_> = dataset.records(Split::Train).iter().filter_map(Record::id).collect();
        assert_eq!(stored, vec![3, 7, 5, 8, 9]);
    }

    #[test]
    fn test_splits_have_independent_ids() {
        let mut dataset = Dataset::new(with_ids(&[1, 2]), Vec::new());
        assert_eq!(dataset.import(Split::Validation, with_ids(&[40])).unwrap(), vec![1]);
        assert_eq!(dataset.stats(), DatasetStats { train: 2, validation: 1 });
        assert_eq!(dataset.stats().total(), 3);
    }

    #[test]
    fn test_records_without_ids_count_as_zero() {
        let dataset = Dataset::new(vec![record(json!({"Input": {}, "Result": {"id": "x"}}))], vec![]);
        assert_eq!(dataset.next_id(Split::Train).unwrap(), 1);
    }

    #[test]
    fn test_append_past_largest_id_fails() {
        let mut dataset = Dataset::new(with_ids(&[1]), Vec::new());
        dataset
            .modify(Split::Train, 1, &changes(&["Result.id=9223372036854775807"]))
            .unwrap();
        let before = dataset.clone();

        assert!(matches!(dataset.next_id(Split::Train), Err(StoreError::IdOverflow { .. })));
        let err = dataset.append(Split::Train, with_ids(&[0])).unwrap_err();
        assert!(matches!(err, StoreError::IdOverflow { split: Split::Train }));
        assert_eq!(dataset, before);

        // An empty batch assigns nothing and succeeds
        assert!(dataset.append(Split::Train, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_batch_stops_short_of_overflow() {
        let mut dataset = Dataset::new(with_ids(&[i64::MAX - 1]), Vec::new());
        let err = dataset.append(Split::Train, with_ids(&[0, 0])).unwrap_err();
        assert!(matches!(err, StoreError::IdOverflow { .. }));
        assert_eq!(dataset.stats().train, 1);

        assert_eq!(dataset.append(Split::Train, with_ids(&[0])).unwrap(), vec![i64::MAX]);
    }

    #[test]
    fn test_modify_creates_intermediates() {
        let mut dataset = Dataset::new(with_ids(&[1, 2]), Vec::new());
        let updated = dataset
            .modify(Split::Train, 2, &changes(&["Result.slots.city=Paris", "Input.query=\"new\""]))
            .unwrap()
            .clone();

        assert_eq!(updated.result["slots"], json!({"city": "Paris"}));
        assert_eq!(updated.input["query"], "new");
        assert_eq!(dataset.get(Split::Train, 2), Some(&updated));
    }

    #[test]
    fn test_modify_missing_record() {
        let mut dataset = Dataset::new(with_ids(&[1]), Vec::new());
        let err = dataset.modify(Split::Train, 9, &changes(&["Result.x=1"])).unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { id: 9, .. }));
    }

    #[test]
    fn test_modify_is_all_or_nothing() {
        let mut dataset = Dataset::new(
            vec![record(json!({"Input": {"query": "q"}, "Result": {"id": 1, "target": "search"}}))],
            Vec::new(),
        );
        let before = dataset.clone();

        let err = dataset
            .modify(Split::Train, 1, &changes(&["Result.intent=play", "Result.target.deep=1"]))
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::NotAnObject { .. })));
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_modify_rejects_duplicate_id() {
        let mut dataset = Dataset::new(with_ids(&[1, 2]), Vec::new());
        let err = dataset.modify(Split::Train, 1, &changes(&["Result.id=2"])).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { id: 2, .. }));

        // Moving to a free id is fine
        dataset.modify(Split::Train, 1, &changes(&["Result.id=10"])).unwrap();
        assert!(dataset.get(Split::Train, 10).is_some());
        assert!(dataset.get(Split::Train, 1).is_none());
    }

    #[test]
    fn test_modify_rejects_bad_roots_and_ids() {
        let mut dataset = Dataset::new(with_ids(&[1]), Vec::new());

        let err = dataset.modify(Split::Train, 1, &changes(&["Extra.x=1"])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidChange(_)));

        let err = dataset.modify(Split::Train, 1, &changes(&["Result.id=abc"])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidChange(_)));

        let err = dataset.modify(Split::Train, 1, &changes(&["Input=5"])).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvalidRecord(_))));
    }

    #[test]
    fn test_modify_single_segment_path() {
        let mut dataset = Dataset::new(with_ids(&[1]), Vec::new());
        let replaced = Changes::new().set(FieldPath::parse("Input").unwrap(), json!({"query": "x"}));
        dataset.modify(Split::Train, 1, &replaced).unwrap();
        assert_eq!(dataset.get(Split::Train, 1).unwrap().input["query"], "x");
    }

    proptest! {
        #[test]
        fn prop_append_ids_are_sequential(
            existing in prop::collection::vec(0i64..1000, 0..10),
            incoming in 0usize..10,
        ) {
            let mut dataset = Dataset::new(with_ids(&existing), Vec::new());
            let start = existing.iter().copied().max().unwrap_or(0) + 1;
            let ids = dataset.append(Split::Train, with_ids(&vec![0; incoming])).unwrap();
            let expected: Vec<i64> = (0..incoming as i64).map(|i| start + i).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
