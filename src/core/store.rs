use hashbrown::{HashMap, HashSet};

use crate::{
    car::{CarPatch, CarRecord},
    types::CarId,
};

/// Rejected store mutation. The store is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record has this id.
    #[error("car {0} not found")]
    NotFound(CarId),
    /// A record with this id is already held.
    #[error("car {0} already exists")]
    AlreadyExists(CarId),
}

/// Ordered, id-unique cache of server-acknowledged cars.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<CarRecord>,
    pos: HashMap<CarId, usize>,
}

impl RecordStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `records` in order. Fails on duplicate ids.
    pub fn from_records(records: Vec<CarRecord>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.replace_all(records)?;
        Ok(store)
    }

    /// Replaces the whole contents, keeping the given order.
    ///
    /// A batch with a repeated id is rejected as a whole.
    pub fn replace_all(&mut self, records: Vec<CarRecord>) -> Result<(), StoreError> {
        if let Some(dup) = first_duplicate(&records) {
            return Err(StoreError::AlreadyExists(dup.to_string()));
        }

        self.records = records;
        self.reindex_from(0);
        Ok(())
    }

    /// Appends a newly created record.
    pub fn insert(&mut self, record: CarRecord) -> Result<(), StoreError> {
        if self.pos.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }

        self.pos.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Merges `patch` into the record with `id`, keeping its position.
    pub fn update(&mut self, id: &str, patch: &CarPatch) -> Result<&CarRecord, StoreError> {
        let idx = *self
            .pos
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let rec = &mut self.records[idx];
        patch.apply_to(rec);
        Ok(rec)
    }

    /// Removes the record with `id`; later records keep their relative order.
    pub fn remove(&mut self, id: &str) -> Result<CarRecord, StoreError> {
        let idx = self
            .pos
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = self.records.remove(idx);
        self.reindex_from(idx);
        Ok(removed)
    }

    /// Current records in display order.
    pub fn snapshot(&self) -> &[CarRecord] {
        &self.records
    }

    /// Owned copy of [`RecordStore::snapshot`].
    pub fn snapshot_cloned(&self) -> Vec<CarRecord> {
        self.records.clone()
    }

    /// Record with `id`, if held.
    pub fn get(&self, id: &str) -> Option<&CarRecord> {
        self.pos.get(id).map(|idx| &self.records[*idx])
    }

    /// True when a record with `id` is held.
    pub fn contains(&self, id: &str) -> bool {
        self.pos.contains_key(id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn reindex_from(&mut self, start: usize) {
        if start == 0 {
            self.pos.clear();
        }
        for (idx, rec) in self.records.iter().enumerate().skip(start) {
            self.pos.insert(rec.id.clone(), idx);
        }
    }
}

fn first_duplicate(records: &[CarRecord]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .map(|r| r.id.as_str())
        .find(|id| !seen.insert(*id))
}
