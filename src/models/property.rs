//! Typed Notion property values.
//!
//! Notion returns properties tagged with a `type` field and accepts writes
//! keyed by that type name. Both directions go through [`PropertyValue`], a
//! closed union of the shapes the tracker uses. Anything else reads as
//! [`PropertyValue::Unsupported`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

/// A single property value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "wire::Incoming")]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    Number(Option<i64>),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    Date(Option<String>),
    Checkbox(bool),
    Files(Vec<ExternalFile>),
    Unsupported,
}

/// A file property entry pointing at an external URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFile {
    pub name: String,
    pub url: String,
}

impl PropertyValue {
    pub fn title(text: impl Into<String>) -> Self {
        Self::Title(text.into())
    }

    pub fn rich_text(text: impl Into<String>) -> Self {
        Self::RichText(text.into())
    }

    pub fn number(value: i64) -> Self {
        Self::Number(Some(value))
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::Select(Some(name.into()))
    }

    pub fn date(start: impl Into<String>) -> Self {
        Self::Date(Some(start.into()))
    }

    pub fn multi_select<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultiSelect(names.into_iter().map(Into::into).collect())
    }

    pub fn external_file(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Files(vec![ExternalFile {
            name: name.into(),
            url: url.into(),
        }])
    }

    /// Text of a title or rich-text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Title(text) | Self::RichText(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric value; `None` when unset or not a number.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) => *value,
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&str> {
        match self {
            Self::Select(Some(name)) => Some(name),
            _ => None,
        }
    }

    /// Start of a date value.
    pub fn as_date(&self) -> Option<&str> {
        match self {
            Self::Date(Some(start)) => Some(start),
            _ => None,
        }
    }

    pub fn as_names(&self) -> Option<&[String]> {
        match self {
            Self::MultiSelect(names) => Some(names),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<bool> {
        match self {
            Self::Checkbox(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&[ExternalFile]> {
        match self {
            Self::Files(files) => Some(files),
            _ => None,
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use wire::{DateOut, External, FileOut, Named, Outgoing, RichTextOut};

        let outgoing = match self {
            Self::Title(text) => Outgoing::Title(vec![RichTextOut::new(text)]),
            Self::RichText(text) if text.is_empty() => Outgoing::RichText(Vec::new()),
            Self::RichText(text) => Outgoing::RichText(vec![RichTextOut::new(text)]),
            Self::Number(value) => Outgoing::Number(*value),
            Self::Select(name) => Outgoing::Select(name.as_deref().map(|name| Named { name })),
            Self::MultiSelect(names) => {
                Outgoing::MultiSelect(names.iter().map(|name| Named { name }).collect())
            }
            Self::Date(start) => Outgoing::Date(start.as_deref().map(|start| DateOut { start })),
            Self::Checkbox(value) => Outgoing::Checkbox(*value),
            Self::Files(files) => Outgoing::Files(
                files
                    .iter()
                    .map(|file| FileOut {
                        name: &file.name,
                        external: External { url: &file.url },
                    })
                    .collect(),
            ),
            Self::Unsupported => {
                return Err(serde::ser::Error::custom(
                    "unsupported property values cannot be written",
                ));
            }
        };
        outgoing.serialize(serializer)
    }
}

/// Property map keyed by property name.
///
/// Used both for the properties of a fetched page and for the set of
/// writes a lifecycle transition wants to persist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, PropertyValue>);

/// Property writes planned for one create or update call.
pub type PropertyWrites = Properties;

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_text)
    }

    pub fn number(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(PropertyValue::as_number)
    }

    pub fn select(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_select)
    }

    pub fn date(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_date)
    }

    pub fn names(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(PropertyValue::as_names)
    }

    pub fn checkbox(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_checkbox)
    }

    /// Overwrite matching entries with those from `writes`.
    pub fn merge(&mut self, writes: &Properties) {
        for (name, value) in writes.iter() {
            self.0.insert(name.to_string(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, PropertyValue)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Notion wire shapes.
mod wire {
    use serde::{Deserialize, Serialize};

    use super::{ExternalFile, PropertyValue};

    // --- Outgoing (create/update payloads) ---

    #[derive(Serialize)]
    pub struct Text<'a> {
        pub content: &'a str,
    }

    #[derive(Serialize)]
    pub struct RichTextOut<'a> {
        pub text: Text<'a>,
    }

    impl<'a> RichTextOut<'a> {
        pub fn new(content: &'a str) -> Self {
            Self {
                text: Text { content },
            }
        }
    }

    #[derive(Serialize)]
    pub struct Named<'a> {
        pub name: &'a str,
    }

    #[derive(Serialize)]
    pub struct DateOut<'a> {
        pub start: &'a str,
    }

    #[derive(Serialize)]
    pub struct External<'a> {
        pub url: &'a str,
    }

    #[derive(Serialize)]
    pub struct FileOut<'a> {
        pub name: &'a str,
        pub external: External<'a>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Outgoing<'a> {
        Title(Vec<RichTextOut<'a>>),
        RichText(Vec<RichTextOut<'a>>),
        Number(Option<i64>),
        Select(Option<Named<'a>>),
        MultiSelect(Vec<Named<'a>>),
        Date(Option<DateOut<'a>>),
        Checkbox(bool),
        Files(Vec<FileOut<'a>>),
    }

    // --- Incoming (page query results) ---

    #[derive(Deserialize)]
    pub struct RichTextIn {
        #[serde(default)]
        pub plain_text: String,
    }

    #[derive(Deserialize)]
    pub struct NamedIn {
        pub name: String,
    }

    #[derive(Deserialize)]
    pub struct DateIn {
        pub start: Option<String>,
    }

    #[derive(Deserialize)]
    pub struct UrlIn {
        pub url: String,
    }

    #[derive(Deserialize)]
    pub struct FileIn {
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub external: Option<UrlIn>,
        #[serde(default)]
        pub file: Option<UrlIn>,
    }

    #[derive(Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum Incoming {
        Title {
            title: Vec<RichTextIn>,
        },
        RichText {
            rich_text: Vec<RichTextIn>,
        },
        Number {
            number: Option<f64>,
        },
        Select {
            select: Option<NamedIn>,
        },
        MultiSelect {
            multi_select: Vec<NamedIn>,
        },
        Date {
            date: Option<DateIn>,
        },
        Checkbox {
            checkbox: bool,
        },
        Files {
            files: Vec<FileIn>,
        },
        #[serde(other)]
        Unsupported,
    }

    fn join_plain(parts: Vec<RichTextIn>) -> String {
        parts.into_iter().map(|p| p.plain_text).collect()
    }

    impl From<Incoming> for PropertyValue {
        fn from(incoming: Incoming) -> Self {
            match incoming {
                Incoming::Title { title } => PropertyValue::Title(join_plain(title)),
                Incoming::RichText { rich_text } => PropertyValue::RichText(join_plain(rich_text)),
                Incoming::Number { number } => PropertyValue::Number(number.map(|n| n as i64)),
                Incoming::Select { select } => PropertyValue::Select(select.map(|s| s.name)),
                Incoming::MultiSelect { multi_select } => {
                    PropertyValue::MultiSelect(multi_select.into_iter().map(|s| s.name).collect())
                }
                Incoming::Date { date } => PropertyValue::Date(date.and_then(|d| d.start)),
                Incoming::Checkbox { checkbox } => PropertyValue::Checkbox(checkbox),
                Incoming::Files { files } => PropertyValue::Files(
                    files
                        .into_iter()
                        .filter_map(|f| {
                            let url = f.external.or(f.file)?.url;
                            Some(ExternalFile { name: f.name, url })
                        })
                        .collect(),
                ),
                Incoming::Unsupported => PropertyValue::Unsupported,
            }
        }
    }
}
