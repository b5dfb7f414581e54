use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{EntityStore, Record, StoreError};

/// Process-local store over a map keyed by identity.
///
/// The lock is taken inside each call and released before it returns, so it is
/// never held across an await point.
pub struct MemoryStore<T: Record> {
    rows: Mutex<BTreeMap<T::Id, T>>,
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self { rows: Mutex::new(BTreeMap::new()) }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rows(&self) -> Result<MutexGuard<'_, BTreeMap<T::Id, T>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Backend(format!("{} store lock poisoned", T::KIND)))
    }

    /// Rows matching `pred`, in identity order.
    pub(crate) fn select(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        Ok(self.rows()?.values().filter(|r| pred(r)).cloned().collect())
    }
}

#[async_trait]
impl<T: Record> EntityStore<T> for MemoryStore<T> {
    async fn find(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        Ok(self.rows()?.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.select(|_| true)
    }

    async fn add(&self, mut record: T) -> Result<T, StoreError> {
        let mut rows = self.rows()?;
        let id = record.id();
        if rows.contains_key(&id) {
            return Err(StoreError::Constraint(format!("{} {} already stored", T::KIND, id)));
        }
        record.set_row_version(0);
        rows.insert(id, record.clone());
        Ok(record)
    }

    async fn replace(&self, mut record: T, expected_version: i32) -> Result<T, StoreError> {
        let mut rows = self.rows()?;
        match rows.get_mut(&record.id()) {
            Some(current) if current.row_version() == expected_version => {
                record.set_row_version(expected_version + 1);
                *current = record.clone();
                Ok(record)
            }
            _ => Err(StoreError::Conflict),
        }
    }

    async fn remove(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        Ok(self.rows()?.remove(id))
    }
}
