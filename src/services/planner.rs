// src/services/planner.rs

//! Lifecycle transition planner.
//!
//! Turns a record plus form input into the property writes for one
//! transition. Planning is pure: nothing here talks to Notion, and the
//! caller decides whether the transition is allowed in the record's state.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{
    AUDIO, BookRecord, FinishInput, Medium, NewBookInput, ProgressInput, PropertyValue,
    PropertyWrites, StartInput, fields,
};
use crate::services::normalize::{normalize_isbn, split_names, to_title_case};
use crate::services::progress::{
    Remaining, parse_count, parse_optional_count, percent_to_total, remaining_to_read,
};

const COVER_URL_TEMPLATE: &str = "https://covers.openlibrary.org/b/isbn/{isbn}-L.jpg";

/// Large cover image for an ISBN. No request is made.
pub fn cover_url(isbn: u64) -> String {
    COVER_URL_TEMPLATE.replace("{isbn}", &isbn.to_string())
}

fn date_value(date: NaiveDate) -> PropertyValue {
    PropertyValue::date(date.format("%Y-%m-%d").to_string())
}

/// Progress write shared by start and update.
fn progress_write(record: &BookRecord, input: &ProgressInput) -> (&'static str, PropertyValue) {
    match record.medium() {
        Medium::Duration => {
            let read = remaining_to_read(
                record.minutes_total(),
                parse_optional_count(input.hours_left.as_deref()),
                parse_optional_count(input.minutes_left.as_deref()),
            );
            (fields::MINUTES_READ, PropertyValue::number(read))
        }
        Medium::Pages => {
            let page = parse_optional_count(input.page.as_deref());
            (fields::PAGES_READ, PropertyValue::number(page))
        }
    }
}

/// Writes for starting a book: the start date and initial progress.
pub fn plan_start(record: &BookRecord, input: &StartInput) -> PropertyWrites {
    let (field, progress) = progress_write(record, &input.progress);
    PropertyWrites::new()
        .with(fields::START_DATE, date_value(input.date))
        .with(field, progress)
}

/// Writes for a progress update. The value replaces the stored one.
pub fn plan_update(record: &BookRecord, input: &ProgressInput) -> PropertyWrites {
    let (field, progress) = progress_write(record, input);
    PropertyWrites::new().with(field, progress)
}

/// Writes for finishing a book: end date, rating, and full progress.
pub fn plan_finish(record: &BookRecord, input: &FinishInput) -> PropertyWrites {
    let completion = match record.medium() {
        Medium::Duration => (
            fields::MINUTES_READ,
            percent_to_total(record.minutes_total()),
        ),
        Medium::Pages => (fields::PAGES_READ, percent_to_total(record.page_total())),
    };

    PropertyWrites::new()
        .with(fields::END_DATE, date_value(input.date))
        .with(fields::STARS, PropertyValue::select(input.stars.label()))
        .with(completion.0, PropertyValue::number(completion.1))
}

/// Properties for a new book page.
///
/// Fails only when the ISBN does not normalize.
pub fn plan_create(input: &NewBookInput) -> Result<PropertyWrites> {
    let isbn = normalize_isbn(&input.isbn)?;
    let subtitle = if input.subtitle.is_empty() {
        String::new()
    } else {
        to_title_case(&input.subtitle)
    };

    let mut writes = PropertyWrites::new()
        .with(fields::TITLE, PropertyValue::title(to_title_case(&input.title)))
        .with(fields::SUBTITLE, PropertyValue::rich_text(subtitle))
        .with(fields::ISBN, PropertyValue::Number(Some(isbn as i64)))
        .with(fields::FICTION, PropertyValue::Checkbox(input.fiction))
        .with(
            fields::AUTHORS,
            PropertyValue::MultiSelect(split_names(&input.authors)),
        )
        .with(
            fields::PUBLISHERS,
            PropertyValue::MultiSelect(split_names(&input.publishers)),
        )
        .with(fields::COVER, PropertyValue::external_file("Cover", cover_url(isbn)))
        .with(fields::FORMAT, PropertyValue::select(input.format.as_str()))
        .with(
            fields::PAGE_TOTAL,
            PropertyValue::number(parse_count(&input.page_total)),
        );

    if input.format == AUDIO {
        let length = Remaining {
            hours: parse_optional_count(input.hours.as_deref()),
            minutes: parse_optional_count(input.minutes.as_deref()),
        };
        writes.insert(
            fields::MINUTES_TOTAL,
            PropertyValue::number(length.total_minutes()),
        );
    }

    Ok(writes)
}
