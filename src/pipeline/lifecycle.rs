// src/pipeline/lifecycle.rs

//! Start, update and finish flows.
//!
//! Each flow lists the books its transition applies to, or runs it on one of
//! them: select → guard state → fill form defaults → plan → write → notify.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{
    BookRecord, FinishInput, ProgressInput, PropertyWrites, StartInput, Transition,
};
use crate::services::planner::{plan_finish, plan_start, plan_update};
use crate::services::progress::{progress_label, start_defaults, update_defaults};
use crate::storage::{QueryFilter, RecordStore, WriteOutcome};
use crate::utils::notify;

/// A book offered for a transition.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    /// Format for start/finish listings, progress for update listings
    pub subtitle: String,
}

/// A transition that went through.
#[derive(Debug, Clone)]
pub struct Applied {
    pub record: BookRecord,
    pub writes: PropertyWrites,
    pub outcome: WriteOutcome,
}

fn candidate(record: &BookRecord, transition: Transition) -> Candidate {
    let subtitle = match transition {
        Transition::UpdateProgress => progress_label(record),
        Transition::Start | Transition::Finish => record
            .format()
            .map(|format| format!("Format: {format}"))
            .unwrap_or_default(),
    };
    Candidate {
        id: record.id.clone(),
        title: record.title().to_string(),
        subtitle,
    }
}

/// Books a transition can be applied to.
pub async fn list_candidates(
    store: &dyn RecordStore,
    transition: Transition,
) -> Result<Vec<Candidate>> {
    let records = store
        .query(&QueryFilter::for_state(transition.source_state()))
        .await?;
    log::debug!("{} candidate(s) for {transition}", records.len());
    Ok(records
        .iter()
        .filter(|r| r.state().allows(transition))
        .map(|r| candidate(r, transition))
        .collect())
}

/// Find a listed book and check that the transition applies to it.
async fn select(
    store: &dyn RecordStore,
    transition: Transition,
    page_id: &str,
) -> Result<BookRecord> {
    let source = transition.source_state();
    let record = store
        .query(&QueryFilter::for_state(source))
        .await?
        .into_iter()
        .find(|r| r.id == page_id)
        .ok_or_else(|| AppError::not_found(format!("No {source} book with id {page_id}")))?;

    let state = record.state();
    if !state.allows(transition) {
        return Err(AppError::InvalidTransition { state, transition });
    }
    Ok(record)
}

async fn select_or_notify(
    store: &dyn RecordStore,
    transition: Transition,
    page_id: &str,
) -> Result<BookRecord> {
    select(store, transition, page_id).await.inspect_err(|e| {
        notify::fail("Book not available", Some(&e.to_string()));
    })
}

/// Write the plan and report the result.
async fn submit(
    store: &dyn RecordStore,
    record: BookRecord,
    writes: PropertyWrites,
    done: &str,
) -> Result<Applied> {
    match store.update_page(&record.id, &writes).await {
        Ok(outcome) => {
            let (title, message) = outcome.describe(done);
            notify::success(title, message);
            Ok(Applied {
                record,
                writes,
                outcome,
            })
        }
        Err(e) => {
            log::warn!("Update of {} failed: {}", record.id, e);
            notify::fail("Update failed", Some(&e.to_string()));
            Err(e)
        }
    }
}

/// Start reading a book.
///
/// Progress the user did not enter defaults to "nothing read yet".
pub async fn run_start(
    store: &dyn RecordStore,
    page_id: &str,
    input: StartInput,
) -> Result<Applied> {
    let record = select_or_notify(store, Transition::Start, page_id).await?;
    let input = StartInput {
        progress: start_defaults(&record).fill(input.progress),
        ..input
    };
    let writes = plan_start(&record, &input);
    log::info!("Starting \"{}\" on {}", record.title(), input.date);
    submit(store, record, writes, "Started").await
}

/// Record new progress on a book being read.
///
/// Progress the user did not enter keeps its stored value.
pub async fn run_update(
    store: &dyn RecordStore,
    page_id: &str,
    input: ProgressInput,
) -> Result<Applied> {
    let record = select_or_notify(store, Transition::UpdateProgress, page_id).await?;
    let input = update_defaults(&record).fill(input);
    let writes = plan_update(&record, &input);
    log::info!("Updating progress of \"{}\"", record.title());
    submit(store, record, writes, "Updated").await
}

/// Finish a book being read.
pub async fn run_finish(
    store: &dyn RecordStore,
    page_id: &str,
    input: FinishInput,
) -> Result<Applied> {
    let record = select_or_notify(store, Transition::Finish, page_id).await?;
    let writes = plan_finish(&record, &input);
    log::info!(
        "Finishing \"{}\" on {} with {}",
        record.title(),
        input.date,
        input.stars
    );
    submit(store, record, writes, "Finished").await
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{LifecycleState, Properties, PropertyValue, Rating, fields};
    use crate::storage::{DryRunStore, MemoryStore};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn book(id: &str, format: &str, start: Option<&str>, end: Option<&str>) -> BookRecord {
        let mut props = Properties::new()
            .with(fields::TITLE, PropertyValue::title(format!("Book {id}")))
            .with(fields::FORMAT, PropertyValue::select(format))
            .with(fields::PAGE_TOTAL, PropertyValue::number(300))
            .with(fields::MINUTES_TOTAL, PropertyValue::number(600));
        if let Some(start) = start {
            props.insert(fields::START_DATE, PropertyValue::date(start));
        }
        if let Some(end) = end {
            props.insert(fields::END_DATE, PropertyValue::date(end));
        }
        BookRecord::new(id, props)
    }

    fn shelf() -> MemoryStore {
        MemoryStore::with_records(vec![
            book("new-paper", "PAPERBACK", None, None),
            book("new-audio", "AUDIO", None, None),
            book("reading-audio", "AUDIO", Some("2026-04-01"), None),
            book("done", "EBOOK", Some("2026-01-01"), Some("2026-02-01")),
            book("odd", "EBOOK", None, Some("2026-02-01")),
        ])
    }

    #[tokio::test]
    async fn listings_per_transition() {
        let store = shelf();

        let start = list_candidates(&store, Transition::Start).await.unwrap();
        let ids: Vec<_> = start.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["new-paper", "new-audio"]);
        assert_eq!(start[0].subtitle, "Format: PAPERBACK");

        let update = list_candidates(&store, Transition::UpdateProgress).await.unwrap();
        assert_eq!(update.len(), 1);
        assert_eq!(update[0].subtitle, "0h 0m");
    }

    #[tokio::test]
    async fn start_defaults_to_nothing_read() {
        let store = shelf();
        let applied = run_start(
            &store,
            "new-audio",
            StartInput {
                date: day(3),
                progress: ProgressInput::default(),
            },
        )
        .await
        .unwrap();

        assert_eq!(applied.outcome, WriteOutcome::Written);
        let record = store.get("new-audio").unwrap();
        assert_eq!(record.state(), LifecycleState::Reading);
        assert_eq!(record.minutes_read(), 0);
        assert_eq!(record.start_date(), Some("2026-04-03"));
    }

    #[tokio::test]
    async fn start_then_update_then_finish() {
        let store = shelf();
        run_start(
            &store,
            "new-paper",
            StartInput {
                date: day(1),
                progress: ProgressInput::page("10"),
            },
        )
        .await
        .unwrap();

        run_update(&store, "new-paper", ProgressInput::page("150"))
            .await
            .unwrap();
        assert_eq!(store.get("new-paper").unwrap().pages_read(), 150);

        let finish = FinishInput {
            date: day(20),
            stars: Rating::new(5).unwrap(),
        };
        run_finish(&store, "new-paper", finish).await.unwrap();

        let record = store.get("new-paper").unwrap();
        assert_eq!(record.state(), LifecycleState::Finished);
        assert_eq!(record.pages_read(), 300);
        assert_eq!(record.stars(), Some("⭐⭐⭐⭐⭐"));
    }

    #[tokio::test]
    async fn update_audio_keeps_stored_time_when_blank() {
        let store = shelf();
        run_update(&store, "reading-audio", ProgressInput::time_left("8", ""))
            .await
            .unwrap();
        // 600 - 8h = 120 read
        assert_eq!(store.get("reading-audio").unwrap().minutes_read(), 120);

        run_update(&store, "reading-audio", ProgressInput::default())
            .await
            .unwrap();
        assert_eq!(store.get("reading-audio").unwrap().minutes_read(), 120);
    }

    #[tokio::test]
    async fn wrong_state_is_rejected() {
        let store = shelf();
        let err = run_update(&store, "new-paper", ProgressInput::page("3"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = run_start(
            &store,
            "odd",
            StartInput {
                date: day(1),
                progress: ProgressInput::default(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                state: LifecycleState::Finished,
                transition: Transition::Start
            }
        ));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn failed_write_leaves_record_unchanged() {
        let store = MemoryStore::with_records(vec![book(
            "reading-audio",
            "AUDIO",
            Some("2026-04-01"),
            None,
        )])
        .failing_writes();

        let err = run_update(&store, "reading-audio", ProgressInput::time_left("1", "0"))
            .await
            .unwrap_err();
        assert!(err.is_remote());
        assert_eq!(store.get("reading-audio").unwrap().minutes_read(), 0);
    }

    #[tokio::test]
    async fn dry_run_reports_success_without_writing() {
        let store = DryRunStore::new(shelf());
        let applied = run_finish(
            &store,
            "reading-audio",
            FinishInput {
                date: day(9),
                stars: Rating::new(2).unwrap(),
            },
        )
        .await
        .unwrap();

        assert_eq!(applied.outcome, WriteOutcome::DryRun);
        assert_eq!(applied.writes.number(fields::MINUTES_READ), Some(600));
        assert_eq!(store.inner().write_count(), 0);
        assert_eq!(store.recorded().len(), 1);
    }
}
