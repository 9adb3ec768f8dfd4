//! Reading lifecycle of a book.
//!
//! State is never stored; it follows from which dates are set:
//!
//! ```text
//! Unstarted --start--> Reading --finish--> Finished
//!                       |   ^
//!                       +---+ update progress
//! ```

use std::fmt;

use super::book::BookRecord;

/// Position of a book in the reading lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No start date
    Unstarted,
    /// Started, no end date
    Reading,
    /// End date set; terminal
    Finished,
}

/// A user-triggered move between lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    UpdateProgress,
    Finish,
}

impl LifecycleState {
    /// Derive the state of a record from its date properties.
    pub fn of(record: &BookRecord) -> Self {
        if record.end_date().is_some() {
            LifecycleState::Finished
        } else if record.start_date().is_some() {
            LifecycleState::Reading
        } else {
            LifecycleState::Unstarted
        }
    }

    pub fn allows(&self, transition: Transition) -> bool {
        self.available_transitions().contains(&transition)
    }

    pub fn available_transitions(&self) -> &'static [Transition] {
        match self {
            LifecycleState::Unstarted => &[Transition::Start],
            LifecycleState::Reading => &[Transition::UpdateProgress, Transition::Finish],
            LifecycleState::Finished => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Unstarted => "unstarted",
            LifecycleState::Reading => "reading",
            LifecycleState::Finished => "finished",
        }
    }
}

impl Transition {
    /// State a record must be in for this transition.
    pub fn source_state(&self) -> LifecycleState {
        match self {
            Transition::Start => LifecycleState::Unstarted,
            Transition::UpdateProgress | Transition::Finish => LifecycleState::Reading,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Start => "start",
            Transition::UpdateProgress => "update progress of",
            Transition::Finish => "finish",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
