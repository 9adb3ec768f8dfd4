//! Command flows behind the CLI.
//!
//! - `run_start`, `run_update`, `run_finish`: lifecycle transitions on one book
//! - `list_candidates`: books a transition applies to
//! - `prepare_draft`, `create_book`, `run_new`: adding a book by ISBN

pub mod create;
pub mod lifecycle;

pub use create::{Created, create_book, prepare_draft, run_new};
pub use lifecycle::{Applied, Candidate, list_candidates, run_finish, run_start, run_update};
