// src/models/mod.rs

//! Domain models for the reading tracker.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod book;
mod config;
mod format;
mod forms;
mod lifecycle;
mod lookup;
mod property;

// Re-export all public types
pub use book::{BookRecord, fields};
pub use config::{Config, LoggingConfig, LookupConfig, NotionConfig};
pub use format::{AUDIO, Format, Medium};
pub use forms::{
    BookDraft, DraftOverrides, FinishInput, NewBookInput, ProgressInput, Rating, StartInput,
};
pub use lifecycle::{LifecycleState, Transition};
pub use lookup::{Author, AuthorRef, Edition};
pub use property::{ExternalFile, Properties, PropertyValue, PropertyWrites};
