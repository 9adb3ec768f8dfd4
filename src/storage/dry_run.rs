//! Dry-run decorator for a record store.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{BookRecord, PropertyWrites};
use crate::storage::{QueryFilter, RecordStore, WriteOutcome};

/// A write that was skipped, with the request body it would have sent.
#[derive(Debug, Clone, PartialEq)]
pub enum DryRunEntry {
    Create { payload: Value },
    Update { page_id: String, payload: Value },
}

/// Reads go to the inner store; writes are logged and reported as done.
pub struct DryRunStore<S> {
    inner: S,
    journal: Mutex<Vec<DryRunEntry>>,
}

impl<S: RecordStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Writes skipped so far, oldest first.
    pub fn recorded(&self) -> Vec<DryRunEntry> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn record(&self, entry: DryRunEntry) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for DryRunStore<S> {
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<BookRecord>> {
        self.inner.query(filter).await
    }

    async fn create_page(&self, properties: &PropertyWrites) -> Result<WriteOutcome> {
        let payload = self.inner.create_payload(properties)?;
        log::info!("DRY RUN: {}", serde_json::to_string_pretty(&payload)?);
        self.record(DryRunEntry::Create { payload });
        Ok(WriteOutcome::DryRun)
    }

    async fn update_page(
        &self,
        page_id: &str,
        properties: &PropertyWrites,
    ) -> Result<WriteOutcome> {
        let payload = self.inner.update_payload(page_id, properties)?;
        log::info!(
            "DRY RUN UPDATE: {} {}",
            page_id,
            serde_json::to_string_pretty(&payload)?
        );
        self.record(DryRunEntry::Update {
            page_id: page_id.to_string(),
            payload,
        });
        Ok(WriteOutcome::DryRun)
    }

    fn create_payload(&self, properties: &PropertyWrites) -> Result<Value> {
        self.inner.create_payload(properties)
    }

    fn update_payload(&self, page_id: &str, properties: &PropertyWrites) -> Result<Value> {
        self.inner.update_payload(page_id, properties)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Properties, PropertyValue, fields};
    use crate::storage::MemoryStore;

    fn unstarted() -> BookRecord {
        BookRecord::new(
            "p1",
            Properties::new().with(fields::TITLE, PropertyValue::title("Dune")),
        )
    }

    #[tokio::test]
    async fn writes_are_journaled_not_applied() {
        let store = DryRunStore::new(MemoryStore::with_records(vec![unstarted()]));
        let writes = Properties::new().with(fields::PAGES_READ, PropertyValue::number(7));

        let outcome = store.update_page("p1", &writes).await.unwrap();
        assert_eq!(outcome, WriteOutcome::DryRun);
        assert_eq!(store.inner().write_count(), 0);
        assert_eq!(store.inner().get("p1").unwrap().pages_read(), 0);
        assert_eq!(
            store.recorded(),
            vec![DryRunEntry::Update {
                page_id: "p1".to_string(),
                payload: json!({"properties": {"Pages Read": {"number": 7}}}),
            }]
        );
    }

    #[tokio::test]
    async fn create_is_skipped() {
        let store = DryRunStore::new(MemoryStore::new());
        let writes = Properties::new().with(fields::TITLE, PropertyValue::title("Dune"));
        assert_eq!(store.create_page(&writes).await.unwrap(), WriteOutcome::DryRun);
        assert!(store.inner().records().is_empty());
        assert_eq!(store.recorded().len(), 1);
    }

    #[tokio::test]
    async fn queries_pass_through() {
        let store = DryRunStore::new(MemoryStore::with_records(vec![unstarted()]));
        let found = store.query(&QueryFilter::unstarted()).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn dry_run_ignores_failing_backend() {
        let store = DryRunStore::new(MemoryStore::new().failing_writes());
        let writes = Properties::new().with(fields::PAGES_READ, PropertyValue::number(1));
        assert!(store.update_page("p1", &writes).await.is_ok());
    }
}
