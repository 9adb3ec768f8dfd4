//! Service layer for the reading tracker.
//!
//! This module contains the business logic for:
//! - Progress conversion and form defaults (`progress`)
//! - Text normalization (`normalize`)
//! - Lifecycle transition planning (`planner`)
//! - Bibliographic lookup (`lookup`)

pub mod lookup;
pub mod normalize;
pub mod planner;
pub mod progress;

pub use lookup::{BibliographicLookup, OpenLibraryClient};
