//! Store gateway for book records.
//!
//! - [`NotionStore`]: the Notion database over HTTP
//! - [`DryRunStore`]: wraps another store and swallows writes
//! - [`MemoryStore`]: in-process records for tests and local runs
//!
//! Callers see the same success or failure from every backend. Whether a
//! write really happened is only visible through [`WriteOutcome`].

pub mod dry_run;
pub mod filter;
pub mod memory;
pub mod notion;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::models::{BookRecord, PropertyWrites};

pub use dry_run::{DryRunEntry, DryRunStore};
pub use filter::QueryFilter;
pub use memory::MemoryStore;
pub use notion::NotionStore;

/// Result of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Sent to the store
    Written,
    /// Skipped because dry run is on
    DryRun,
}

impl WriteOutcome {
    /// Notification title and message for this outcome.
    pub fn describe<'a>(&self, done: &'a str) -> (&'a str, Option<&'static str>) {
        match self {
            WriteOutcome::Written => (done, None),
            WriteOutcome::DryRun => ("Dry run complete", Some("No data written")),
        }
    }
}

/// Backend holding the book database.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch all records matching `filter`.
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<BookRecord>>;

    /// Create one record in the book database.
    async fn create_page(&self, properties: &PropertyWrites) -> Result<WriteOutcome>;

    /// Apply a partial property update to one record.
    async fn update_page(&self, page_id: &str, properties: &PropertyWrites)
    -> Result<WriteOutcome>;

    /// Request body `create_page` would send.
    fn create_payload(&self, properties: &PropertyWrites) -> Result<Value> {
        let properties = serde_json::to_value(properties)?;
        Ok(json!({ "properties": properties }))
    }

    /// Request body `update_page` would send.
    fn update_payload(&self, _page_id: &str, properties: &PropertyWrites) -> Result<Value> {
        let properties = serde_json::to_value(properties)?;
        Ok(json!({ "properties": properties }))
    }
}

/// Whether a record with this ISBN already exists.
///
/// Advisory only: nothing stops a concurrent create between this check and
/// the write that follows it.
pub async fn isbn_exists(store: &dyn RecordStore, isbn: u64) -> Result<bool> {
    let matches = store.query(&QueryFilter::isbn_equals(isbn)).await?;
    Ok(!matches.is_empty())
}
