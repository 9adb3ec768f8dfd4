//! Database query filters.

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::models::{BookRecord, LifecycleState, fields};

/// Filter over page properties, as accepted by the database query endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFilter {
    DateIsEmpty(String),
    DateIsNotEmpty(String),
    /// Date property equals an ISO date (`YYYY-MM-DD`)
    DateEquals(String, String),
    NumberEquals(String, i64),
    And(Vec<QueryFilter>),
}

impl QueryFilter {
    /// Books not started yet.
    pub fn unstarted() -> Self {
        Self::for_state(LifecycleState::Unstarted)
    }

    /// Books started but not finished.
    pub fn in_progress() -> Self {
        Self::for_state(LifecycleState::Reading)
    }

    /// Books with the given ISBN.
    pub fn isbn_equals(isbn: u64) -> Self {
        Self::NumberEquals(fields::ISBN.to_string(), isbn as i64)
    }

    /// Books in a lifecycle state.
    pub fn for_state(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Unstarted => Self::DateIsEmpty(fields::START_DATE.to_string()),
            LifecycleState::Reading => Self::And(vec![
                Self::DateIsNotEmpty(fields::START_DATE.to_string()),
                Self::DateIsEmpty(fields::END_DATE.to_string()),
            ]),
            LifecycleState::Finished => Self::DateIsNotEmpty(fields::END_DATE.to_string()),
        }
    }

    /// Notion filter object.
    pub fn to_json(&self) -> Value {
        match self {
            Self::DateIsEmpty(property) => {
                json!({ "property": property, "date": { "is_empty": true } })
            }
            Self::DateIsNotEmpty(property) => {
                json!({ "property": property, "date": { "is_not_empty": true } })
            }
            Self::DateEquals(property, date) => {
                json!({ "property": property, "date": { "equals": date } })
            }
            Self::NumberEquals(property, number) => {
                json!({ "property": property, "number": { "equals": number } })
            }
            Self::And(filters) => {
                json!({ "and": filters.iter().map(Self::to_json).collect::<Vec<_>>() })
            }
        }
    }

    /// Evaluate the filter against a record locally.
    pub fn matches(&self, record: &BookRecord) -> bool {
        let props = &record.properties;
        match self {
            Self::DateIsEmpty(property) => props.date(property).is_none(),
            Self::DateIsNotEmpty(property) => props.date(property).is_some(),
            Self::DateEquals(property, date) => props
                .date(property)
                .is_some_and(|start| start.get(..10) == Some(date.as_str())),
            Self::NumberEquals(property, number) => props.number(property) == Some(*number),
            Self::And(filters) => filters.iter().all(|f| f.matches(record)),
        }
    }
}

impl Serialize for QueryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
