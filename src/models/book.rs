//! Book record as stored in the Notion database.

use serde::{Deserialize, Serialize};

use super::format::Medium;
use super::lifecycle::LifecycleState;
use super::property::Properties;

/// Property names of the book database.
pub mod fields {
    pub const TITLE: &str = "Title";
    pub const SUBTITLE: &str = "Subtitle";
    pub const ISBN: &str = "ISBN";
    pub const FICTION: &str = "Fiction";
    pub const AUTHORS: &str = "Author(s)";
    pub const PUBLISHERS: &str = "Publishers";
    pub const COVER: &str = "Cover";
    pub const FORMAT: &str = "Format";
    pub const PAGE_TOTAL: &str = "Page Total";
    pub const MINUTES_TOTAL: &str = "Minutes Total";
    pub const PAGES_READ: &str = "Pages Read";
    pub const MINUTES_READ: &str = "Minutes Read";
    pub const START_DATE: &str = "Date Start";
    pub const END_DATE: &str = "Date Finish";
    pub const STARS: &str = "Stars";
}

/// One tracked book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Page id assigned by Notion
    pub id: String,

    /// Typed page properties
    #[serde(default)]
    pub properties: Properties,
}

impl BookRecord {
    pub fn new(id: impl Into<String>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }

    /// Display title; empty when the page has none.
    pub fn title(&self) -> &str {
        self.properties.text(fields::TITLE).unwrap_or_default()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.properties
            .text(fields::SUBTITLE)
            .filter(|s| !s.is_empty())
    }

    pub fn authors(&self) -> &[String] {
        self.properties.names(fields::AUTHORS).unwrap_or_default()
    }

    pub fn publishers(&self) -> &[String] {
        self.properties.names(fields::PUBLISHERS).unwrap_or_default()
    }

    pub fn isbn(&self) -> Option<i64> {
        self.properties.number(fields::ISBN)
    }

    /// Raw `Format` select value.
    pub fn format(&self) -> Option<&str> {
        self.properties.select(fields::FORMAT)
    }

    pub fn medium(&self) -> Medium {
        Medium::classify(self.format())
    }

    pub fn fiction(&self) -> bool {
        self.properties.checkbox(fields::FICTION).unwrap_or(false)
    }

    pub fn page_total(&self) -> i64 {
        self.properties.number(fields::PAGE_TOTAL).unwrap_or(0)
    }

    pub fn minutes_total(&self) -> i64 {
        self.properties.number(fields::MINUTES_TOTAL).unwrap_or(0)
    }

    pub fn pages_read(&self) -> i64 {
        self.properties.number(fields::PAGES_READ).unwrap_or(0)
    }

    pub fn minutes_read(&self) -> i64 {
        self.properties.number(fields::MINUTES_READ).unwrap_or(0)
    }

    pub fn start_date(&self) -> Option<&str> {
        self.properties.date(fields::START_DATE)
    }

    pub fn end_date(&self) -> Option<&str> {
        self.properties.date(fields::END_DATE)
    }

    pub fn stars(&self) -> Option<&str> {
        self.properties.select(fields::STARS)
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::of(self)
    }

    /// Target for the record's medium: minutes for audio, pages otherwise.
    pub fn total(&self) -> i64 {
        match self.medium() {
            Medium::Duration => self.minutes_total(),
            Medium::Pages => self.page_total(),
        }
    }

    /// Progress in the record's medium.
    pub fn read(&self) -> i64 {
        match self.medium() {
            Medium::Duration => self.minutes_read(),
            Medium::Pages => self.pages_read(),
        }
    }
}
