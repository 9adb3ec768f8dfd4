//! Open Library response shapes.

use serde::{Deserialize, Serialize};

/// Edition record returned for an ISBN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    /// References to author records, in credit order
    #[serde(default)]
    pub authors: Vec<AuthorRef>,

    #[serde(default)]
    pub publishers: Vec<String>,

    #[serde(default)]
    pub number_of_pages: Option<i64>,
}

/// Pointer to an author record, e.g. `/authors/OL79034A`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorRef {
    pub key: String,
}

impl AuthorRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Author record; only the display name is used.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sparse_edition() {
        let edition: Edition = serde_json::from_str(
            r#"{
                "title": "Fantastic Mr. Fox",
                "authors": [{"key": "/authors/OL34184A"}],
                "publishers": ["Puffin"],
                "number_of_pages": 96,
                "covers": [8739161],
                "key": "/books/OL7353617M"
            }"#,
        )
        .unwrap();

        assert_eq!(edition.title.as_deref(), Some("Fantastic Mr. Fox"));
        assert_eq!(edition.subtitle, None);
        assert_eq!(edition.authors, vec![AuthorRef::new("/authors/OL34184A")]);
        assert_eq!(edition.number_of_pages, Some(96));
    }
}
