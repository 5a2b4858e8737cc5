//! Record store.
//!
//! Holds the authoritative record sequence in load order. Sorting never
//! rewrites this sequence: every sort starts again from load order so ties
//! keep the order the data file gave them.

use std::collections::HashSet;

use crate::model::Record;

/// The authoritative, load-ordered record set.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        let mut store = Self::new();
        store.replace(records);
        store
    }

    /// Replaces the whole record set.
    ///
    /// Ids must be unique; a repeated id keeps its first occurrence and the
    /// later ones are dropped. Returns the number of dropped records.
    pub fn replace(&mut self, records: Vec<Record>) -> usize {
        let mut seen = HashSet::with_capacity(records.len());
        let before = records.len();
        self.records = records
            .into_iter()
            .filter(|record| {
                if seen.insert(record.id().to_string()) {
                    true
                } else {
                    log::warn!("dropping record with duplicate id '{}'", record.id());
                    false
                }
            })
            .collect();
        let dropped = before - self.records.len();
        log::info!("record store loaded {} records", self.records.len());
        dropped
    }

    /// Returns the records in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the record with the given id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Returns `true` if a record with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
