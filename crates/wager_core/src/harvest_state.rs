use std::collections::HashMap;

use crate::{Record, RecordId};

/// Records accumulated across scroll steps of a single run.
///
/// Keyed by [`RecordId`]; a repeated id overwrites the stored record while
/// keeping the position where it was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestState {
    order: Vec<RecordId>,
    records: HashMap<RecordId, Record>,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `id`. Returns `true` when the id was not seen before.
    pub fn merge(&mut self, id: RecordId, record: Record) -> bool {
        match self.records.insert(id.clone(), record) {
            Some(_) => false,
            None => {
                self.order.push(id);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    /// Ordered copy of the stored records, identifiers stripped.
    pub fn records(&self) -> Vec<Record> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }

    /// Drains the state into first-seen order.
    pub fn into_records(mut self) -> Vec<Record> {
        self.take_records()
    }

    /// Drains the state in place, leaving it empty for reuse.
    pub fn take_records(&mut self) -> Vec<Record> {
        let order = std::mem::take(&mut self.order);
        let mut records = std::mem::take(&mut self.records);
        order
            .into_iter()
            .filter_map(|id| records.remove(&id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.records.clear();
    }
}
