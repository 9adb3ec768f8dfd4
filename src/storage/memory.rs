//! In-memory record store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{BookRecord, PropertyWrites};
use crate::storage::{QueryFilter, RecordStore, WriteOutcome};

#[derive(Default)]
struct State {
    records: Vec<BookRecord>,
    next_id: usize,
    writes: usize,
}

/// Record store kept in process memory.
///
/// Queries evaluate [`QueryFilter::matches`]. Writes can be made to fail
/// to simulate an unreachable backend.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<BookRecord>) -> Self {
        Self {
            state: Mutex::new(State {
                records,
                ..State::default()
            }),
            fail_writes: false,
        }
    }

    /// Make every create and update fail with a remote error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all records.
    pub fn records(&self) -> Vec<BookRecord> {
        self.state().records.clone()
    }

    pub fn get(&self, page_id: &str) -> Option<BookRecord> {
        self.state().records.iter().find(|r| r.id == page_id).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    fn check_writable(&self, context: &str) -> Result<()> {
        if self.fail_writes {
            Err(AppError::remote(context, "store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<BookRecord>> {
        Ok(self
            .state()
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn create_page(&self, properties: &PropertyWrites) -> Result<WriteOutcome> {
        self.check_writable("pages.create")?;
        let mut state = self.state();
        state.next_id += 1;
        let id = format!("mem-{}", state.next_id);
        state.records.push(BookRecord::new(id, properties.clone()));
        state.writes += 1;
        Ok(WriteOutcome::Written)
    }

    async fn update_page(
        &self,
        page_id: &str,
        properties: &PropertyWrites,
    ) -> Result<WriteOutcome> {
        self.check_writable("pages.update")?;
        let mut state = self.state();
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == page_id)
            .ok_or_else(|| {
                AppError::remote("pages.update", format!("Could not find page {page_id}"))
            })?;
        record.properties.merge(properties);
        state.writes += 1;
        Ok(WriteOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Properties, PropertyValue, fields};

    #[tokio::test]
    async fn create_then_update_merges() {
        let store = MemoryStore::new();
        store
            .create_page(&Properties::new().with(fields::TITLE, PropertyValue::title("Dune")))
            .await
            .unwrap();

        let id = store.records()[0].id.clone();
        store
            .update_page(&id, &Properties::new().with(fields::PAGES_READ, PropertyValue::number(5)))
            .await
            .unwrap();

        let record = store.get(&id).unwrap();
        assert_eq!(record.title(), "Dune");
        assert_eq!(record.pages_read(), 5);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn update_of_unknown_page_is_remote_error() {
        let store = MemoryStore::new();
        let err = store.update_page("nope", &Properties::new()).await.unwrap_err();
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn failing_store_rejects_writes() {
        let store = MemoryStore::new().failing_writes();
        assert!(store.create_page(&Properties::new()).await.unwrap_err().is_remote());
        assert!(store.records().is_empty());
    }
}
