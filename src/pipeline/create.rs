// src/pipeline/create.rs

//! Add-a-book flow: ISBN → lookup → draft → confirm → duplicate check → create.

use crate::error::{AppError, Result};
use crate::models::{BookDraft, DraftOverrides, Format, NewBookInput, PropertyWrites};
use crate::services::lookup::{BibliographicLookup, lookup_draft};
use crate::services::normalize::normalize_isbn;
use crate::services::planner::plan_create;
use crate::storage::{RecordStore, WriteOutcome, isbn_exists};
use crate::utils::notify;

/// A created (or dry-run) book.
#[derive(Debug, Clone)]
pub struct Created {
    pub isbn: u64,
    pub writes: PropertyWrites,
    pub outcome: WriteOutcome,
}

/// Look up an ISBN and return the values to confirm.
///
/// Nothing is written. Failures are reported and returned.
pub async fn prepare_draft(
    lookup: &dyn BibliographicLookup,
    isbn: &str,
    format: Format,
    concurrency: usize,
) -> Result<BookDraft> {
    let result: Result<BookDraft> = async {
        let isbn = normalize_isbn(isbn)?;
        log::info!("Looking up ISBN {isbn}");
        lookup_draft(lookup, isbn, format, concurrency).await
    }
    .await;

    result.inspect_err(|e| notify::fail("Lookup failed", Some(&e.to_string())))
}

/// Create a book from confirmed values.
///
/// Refuses an ISBN that is already in the database. The check and the
/// create are separate calls, so two simultaneous adds can both pass.
pub async fn create_book(store: &dyn RecordStore, input: &NewBookInput) -> Result<Created> {
    let writes = plan_create(input)
        .inspect_err(|e| notify::fail("Create failed", Some(&e.to_string())))?;
    let isbn = normalize_isbn(&input.isbn)?;

    match isbn_exists(store, isbn).await {
        Ok(false) => {}
        Ok(true) => {
            notify::fail("ISBN already exists", None);
            return Err(AppError::DuplicateKey(isbn));
        }
        Err(e) => {
            notify::fail("Create failed", Some(&e.to_string()));
            return Err(e);
        }
    }

    match store.create_page(&writes).await {
        Ok(outcome) => {
            let (title, message) = outcome.describe("Success");
            notify::success(title, message);
            Ok(Created {
                isbn,
                writes,
                outcome,
            })
        }
        Err(e) => {
            log::warn!("Create of ISBN {isbn} failed: {e}");
            notify::fail("Create failed", Some(&e.to_string()));
            Err(e)
        }
    }
}

/// Full add-a-book flow with the user's edits applied to the draft.
pub async fn run_new(
    store: &dyn RecordStore,
    lookup: &dyn BibliographicLookup,
    isbn: &str,
    format: Format,
    overrides: DraftOverrides,
    concurrency: usize,
) -> Result<Created> {
    let draft = prepare_draft(lookup, isbn, format, concurrency).await?;
    let input = draft.into_input(overrides);
    create_book(store, &input).await
}
