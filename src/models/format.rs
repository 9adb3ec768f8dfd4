//! Book formats and the medium they are tracked in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Select value that marks a book as tracked by listening time.
pub const AUDIO: &str = "AUDIO";

/// Physical or digital format of a book, as offered when adding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Format {
    Hardcover,
    Paperback,
    Ebook,
    Audio,
}

impl Format {
    /// Name stored in the `Format` select property.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Hardcover => "HARDCOVER",
            Format::Paperback => "PAPERBACK",
            Format::Ebook => "EBOOK",
            Format::Audio => AUDIO,
        }
    }

    pub fn medium(&self) -> Medium {
        Medium::classify(Some(self.as_str()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How reading progress is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    /// Progress is a page number
    Pages,
    /// Progress is minutes listened
    Duration,
}

impl Medium {
    /// Classify a raw format value.
    ///
    /// Only the exact string `AUDIO` is duration-based. Anything else,
    /// including a missing or unrecognized format, counts pages.
    pub fn classify(format: Option<&str>) -> Self {
        match format {
            Some(AUDIO) => Medium::Duration,
            _ => Medium::Pages,
        }
    }

    pub fn is_page_based(&self) -> bool {
        *self == Medium::Pages
    }

    pub fn is_duration_based(&self) -> bool {
        *self == Medium::Duration
    }
}
