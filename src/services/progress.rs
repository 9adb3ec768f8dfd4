// src/services/progress.rs

//! Progress calculator.
//!
//! Converts between "time left" as a listener enters it and "minutes read"
//! as stored, and derives the values the forms and listings show.
//! Page-based books need no conversion: the page number is the progress.
//!
//! The two directions clamp differently. [`remaining_to_read`] floors at
//! zero, while [`read_to_remaining`] passes negative values through.
//! Arithmetic saturates, so absurd form input cannot overflow.

use serde::Serialize;

use crate::models::{BookRecord, Medium, ProgressInput};

const MINUTES_PER_HOUR: i64 = 60;

/// Time left in a book, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub hours: i64,
    pub minutes: i64,
}

impl Remaining {
    pub fn total_minutes(&self) -> i64 {
        self.hours
            .saturating_mul(MINUTES_PER_HOUR)
            .saturating_add(self.minutes)
    }
}

/// Minutes read, given the total and the time the user says is left.
///
/// Never negative: more time left than the book is long yields 0.
pub fn remaining_to_read(total: i64, remaining_hours: i64, remaining_minutes: i64) -> i64 {
    let minutes_left = remaining_hours
        .saturating_mul(MINUTES_PER_HOUR)
        .saturating_add(remaining_minutes);
    total.saturating_sub(minutes_left).max(0)
}

/// Time left, given the total and the minutes read.
///
/// Hours are floored and minutes keep the sign of the time left. Not
/// clamped: reading 130 of 100 minutes gives `-1h -30m`.
pub fn read_to_remaining(total: i64, read: i64) -> Remaining {
    let left = total.saturating_sub(read);
    Remaining {
        hours: left.div_euclid(MINUTES_PER_HOUR),
        minutes: left % MINUTES_PER_HOUR,
    }
}

/// Progress value meaning "done".
pub fn percent_to_total(total: i64) -> i64 {
    total
}

/// Parse a numeric form field. Anything that is not a finite number is 0.
pub fn parse_count(text: &str) -> i64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}

/// [`parse_count`] for optional fields; missing is 0.
pub fn parse_optional_count(text: Option<&str>) -> i64 {
    text.map(parse_count).unwrap_or(0)
}

/// Pages left; not clamped.
pub fn pages_remaining(record: &BookRecord) -> i64 {
    record.page_total().saturating_sub(record.pages_read())
}

/// Render minutes as `{h}h {m}m`.
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes.div_euclid(MINUTES_PER_HOUR);
    let rest = minutes.rem_euclid(MINUTES_PER_HOUR);
    format!("{hours}h {rest}m")
}

/// Short progress summary shown next to a book in progress.
pub fn progress_label(record: &BookRecord) -> String {
    match record.medium() {
        Medium::Duration => format_duration(record.minutes_read()),
        Medium::Pages => format!("Page {}", record.pages_read()),
    }
}

/// Form defaults for entering progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressDefaults {
    Pages { page: i64 },
    Duration(Remaining),
}

impl ProgressDefaults {
    /// Fill fields the user left empty.
    pub fn fill(&self, input: ProgressInput) -> ProgressInput {
        match self {
            ProgressDefaults::Pages { page } => ProgressInput {
                page: input.page.or_else(|| Some(page.to_string())),
                ..input
            },
            ProgressDefaults::Duration(left) => ProgressInput {
                hours_left: input.hours_left.or_else(|| Some(left.hours.to_string())),
                minutes_left: input.minutes_left.or_else(|| Some(left.minutes.to_string())),
                ..input
            },
        }
    }
}

/// Defaults when starting a book: all of it is left.
pub fn start_defaults(record: &BookRecord) -> ProgressDefaults {
    match record.medium() {
        Medium::Duration => {
            ProgressDefaults::Duration(read_to_remaining(record.minutes_total(), 0))
        }
        Medium::Pages => ProgressDefaults::Pages { page: 0 },
    }
}

/// Defaults when updating progress: whatever is stored now.
pub fn update_defaults(record: &BookRecord) -> ProgressDefaults {
    match record.medium() {
        Medium::Duration => ProgressDefaults::Duration(read_to_remaining(
            record.minutes_total(),
            record.minutes_read(),
        )),
        Medium::Pages => ProgressDefaults::Pages {
            page: record.pages_read(),
        },
    }
}
