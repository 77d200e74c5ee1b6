//! Record storage and aggregation.
//!
//! Scalars stored under the same key over many records are summarized with
//! statistical measures, while the other value types keep their most recent
//! value.
use super::{Record, RecordValue};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// A storage of records with aggregation capabilities.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f32::INFINITY, f32::min))
}

fn max(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().copied().fold(f32::NEG_INFINITY, f32::max))
}

fn mean(vs: &[f32]) -> RecordValue {
    RecordValue::Scalar(vs.iter().sum::<f32>() / vs.len() as f32)
}

/// Sorts the given values, thus takes the ownership.
fn median(mut vs: Vec<f32>) -> RecordValue {
    vs.sort_by(|x, y| x.total_cmp(y));
    RecordValue::Scalar(vs[vs.len() / 2])
}

impl RecordStorage {
    /// Creates a new empty record storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    /// The most recent value stored with the given key.
    fn latest(&self, key: &str) -> Option<Record> {
        self.data
            .iter()
            .rev()
            .find_map(|record| record.get(key))
            .map(|value| Record::from_slice(&[(key, value.clone())]))
    }

    /// Aggregates scalar values with min, max, mean and median.
    ///
    /// A single value is kept as is. Non-scalar values with the same key
    /// are ignored.
    fn scalar(&self, key: &str) -> Record {
        let vs: Vec<f32> = self
            .data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                _ => None,
            })
            .collect();

        if vs.len() == 1 {
            Record::from_slice(&[(key.to_string(), RecordValue::Scalar(vs[0]))])
        } else {
            Record::from_slice(&[
                (format!("{}_min", key), min(&vs)),
                (format!("{}_max", key), max(&vs)),
                (format!("{}_mean", key), mean(&vs)),
                (format!("{}_median", key), median(vs)),
            ])
        }
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            let is_scalar = self
                .data
                .iter()
                .find_map(|record| record.get(key))
                .map_or(false, |v| matches!(v, RecordValue::Scalar(_)));
            let r = if is_scalar {
                self.scalar(key)
            } else {
                self.latest(key).unwrap_or_else(Record::empty)
            };
            record = record.merge(r);
        }

        self.data = vec![];

        record
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_aggregate_scalars() {
        let mut storage = RecordStorage::new();
        for (i, r) in [3.0f32, -1.0, 5.0, 1.0].iter().enumerate() {
            let mut record = Record::from_scalar("episode_reward", *r);
            record.insert("env", RecordValue::String(format!("env{}", i)));
            storage.store(record);
        }

        let record = storage.aggregate();
        assert_eq!(record.get_scalar("episode_reward_min").unwrap(), -1.0);
        assert_eq!(record.get_scalar("episode_reward_max").unwrap(), 5.0);
        assert_eq!(record.get_scalar("episode_reward_mean").unwrap(), 2.0);
        assert_eq!(record.get_scalar("episode_reward_median").unwrap(), 3.0);
        assert_eq!(record.get_string("env").unwrap(), "env3");
        assert!(storage.is_empty());
    }

    #[test]
    fn test_single_scalar_is_kept() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("episode_reward", 7.0));
        let record = storage.aggregate();
        assert_eq!(record.get_scalar("episode_reward").unwrap(), 7.0);
    }
}
