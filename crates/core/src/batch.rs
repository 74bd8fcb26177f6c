//! Batches of records and their per-entity slices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::Record;

/// All records collected in one monitoring cycle, across all entities.
///
/// Immutable once built; the orchestrator shares it read-only between
/// per-entity tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct entity labels, in order of first appearance.
    pub fn entities(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(Record::label)
            .filter(|e| seen.insert(*e))
            .collect()
    }

    /// Group records by entity. Every entity present gets a slice, in order
    /// of first appearance; record order within a slice is preserved.
    /// Records without an entity id share one slice labelled
    /// [`UNKNOWN_ENTITY`](crate::record::UNKNOWN_ENTITY).
    pub fn partition(&self) -> Vec<EntitySlice> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut slices: Vec<EntitySlice> = Vec::new();

        for record in &self.records {
            let pos = *index.entry(record.label()).or_insert_with(|| {
                slices.push(EntitySlice::empty(record.label()));
                slices.len() - 1
            });
            slices[pos].records.push(record.clone());
        }

        slices
    }
}

impl From<Vec<Record>> for Batch {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

/// The subset of a batch belonging to one entity. Lives for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySlice {
    pub entity: String,
    pub records: Vec<Record>,
}

impl EntitySlice {
    /// A slice with no records, used for expected entities absent from a batch.
    pub fn empty(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
