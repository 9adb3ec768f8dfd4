//! User input for lifecycle transitions and book creation.
//!
//! Numeric fields stay as text, the way a form hands them over. The planner
//! parses them with a single policy: anything that is not a number counts as 0.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format::{Format, Medium};
use crate::error::{AppError, Result};

/// Progress entered by the user, in either medium.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressInput {
    /// Current page (page-based media)
    pub page: Option<String>,

    /// Hours still to listen (audio)
    pub hours_left: Option<String>,

    /// Minutes still to listen, on top of `hours_left` (audio)
    pub minutes_left: Option<String>,
}

impl ProgressInput {
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: Some(page.into()),
            ..Self::default()
        }
    }

    pub fn time_left(hours: impl Into<String>, minutes: impl Into<String>) -> Self {
        Self {
            page: None,
            hours_left: Some(hours.into()),
            minutes_left: Some(minutes.into()),
        }
    }
}

/// Values of the start form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartInput {
    pub date: NaiveDate,
    pub progress: ProgressInput,
}

/// Values of the finish form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishInput {
    pub date: NaiveDate,
    pub stars: Rating,
}

/// Star rating from one to five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self> {
        if (1..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(AppError::validation(format!(
                "rating must be between 1 and {}, got {stars}",
                Self::MAX
            )))
        }
    }

    pub fn stars(&self) -> u8 {
        self.0
    }

    /// Select value written to the `Stars` property.
    pub fn label(&self) -> String {
        "⭐".repeat(self.0 as usize)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Confirmed values for a new book, as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookInput {
    pub isbn: String,
    pub title: String,
    pub subtitle: String,
    /// Comma-separated author names
    pub authors: String,
    /// Comma-separated publisher names
    pub publishers: String,
    pub page_total: String,
    /// Audio length, hours part
    pub hours: Option<String>,
    /// Audio length, minutes part
    pub minutes: Option<String>,
    pub fiction: bool,
    pub format: String,
}

/// Pre-filled values for the confirmation step of adding a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDraft {
    pub isbn: u64,
    pub title: String,
    pub subtitle: String,
    pub authors: Vec<String>,
    pub publishers: Vec<String>,
    pub page_total: i64,
    pub hours: i64,
    pub minutes: i64,
    pub fiction: bool,
    pub format: Format,
}

/// Edits the user made on top of a [`BookDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftOverrides {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub authors: Option<String>,
    pub publishers: Option<String>,
    pub page_total: Option<String>,
    pub hours: Option<String>,
    pub minutes: Option<String>,
    pub fiction: bool,
}

impl BookDraft {
    /// Merge the draft with the user's edits into confirmed form values.
    ///
    /// Hours and minutes are only part of the form for audio books.
    pub fn into_input(self, overrides: DraftOverrides) -> NewBookInput {
        let is_audio = self.format.medium() == Medium::Duration;
        let hours = self.hours;
        let minutes = self.minutes;

        NewBookInput {
            isbn: overrides.isbn.unwrap_or_else(|| self.isbn.to_string()),
            title: overrides.title.unwrap_or(self.title),
            subtitle: overrides.subtitle.unwrap_or(self.subtitle),
            authors: overrides.authors.unwrap_or_else(|| self.authors.join(", ")),
            publishers: overrides
                .publishers
                .unwrap_or_else(|| self.publishers.join(", ")),
            page_total: overrides
                .page_total
                .unwrap_or_else(|| self.page_total.to_string()),
            hours: is_audio.then(|| overrides.hours.unwrap_or_else(|| hours.to_string())),
            minutes: is_audio.then(|| overrides.minutes.unwrap_or_else(|| minutes.to_string())),
            fiction: overrides.fiction || self.fiction,
            format: self.format.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(format: Format) -> BookDraft {
        BookDraft {
            isbn: 9780441013593,
            title: "Dune".to_string(),
            subtitle: String::new(),
            authors: vec!["Frank Herbert".to_string(), "Brian Herbert".to_string()],
            publishers: vec!["Ace".to_string()],
            page_total: 896,
            hours: 0,
            minutes: 0,
            fiction: false,
            format,
        }
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(3).unwrap().label(), "⭐⭐⭐");
    }

    #[test]
    fn draft_without_overrides_keeps_lookup_values() {
        let input = draft(Format::Paperback).into_input(DraftOverrides::default());
        assert_eq!(input.isbn, "9780441013593");
        assert_eq!(input.authors, "Frank Herbert, Brian Herbert");
        assert_eq!(input.publishers, "Ace");
        assert_eq!(input.page_total, "896");
        assert_eq!(input.format, "PAPERBACK");
        assert_eq!(input.hours, None);
        assert_eq!(input.minutes, None);
    }

    #[test]
    fn audio_draft_carries_length_fields() {
        let overrides = DraftOverrides {
            hours: Some("21".to_string()),
            title: Some("dune messiah".to_string()),
            fiction: true,
            ..DraftOverrides::default()
        };
        let input = draft(Format::Audio).into_input(overrides);
        assert_eq!(input.hours.as_deref(), Some("21"));
        assert_eq!(input.minutes.as_deref(), Some("0"));
        assert_eq!(input.title, "dune messiah");
        assert!(input.fiction);
    }
}
