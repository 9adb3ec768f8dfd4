// src/services/lookup.rs

//! Bibliographic lookup against Open Library.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Author, AuthorRef, BookDraft, Edition, Format, LookupConfig};
use crate::services::normalize::to_title_case;
use crate::utils::http;

/// Source of edition and author data.
#[async_trait]
pub trait BibliographicLookup: Send + Sync {
    /// Fetch the edition for an ISBN. A miss is [`AppError::NotFound`].
    async fn lookup_by_isbn(&self, isbn: u64) -> Result<Edition>;

    /// Resolve one author reference to a display name.
    async fn resolve_author(&self, author: &AuthorRef) -> Result<String>;
}

/// HTTP client for openlibrary.org.
pub struct OpenLibraryClient {
    client: Client,
    base_url: Url,
}

impl OpenLibraryClient {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let client = http::create_client(&config.user_agent, config.timeout_secs)?;
        let base_url = http::base_url(&config.base_url)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl BibliographicLookup for OpenLibraryClient {
    async fn lookup_by_isbn(&self, isbn: u64) -> Result<Edition> {
        let url = self.base_url.join(&format!("isbn/{isbn}.json"))?;
        log::debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::not_found(format!("No book found for ISBN {isbn}")));
        }
        Ok(response.json().await?)
    }

    async fn resolve_author(&self, author: &AuthorRef) -> Result<String> {
        let path = format!("{}.json", author.key.trim_start_matches('/'));
        let url = self.base_url.join(&path)?;
        log::debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        check_author_status(author, response.status())?;
        author_name(author, response.json().await?)
    }
}

/// Any non-success status on an author reference is a remote failure.
fn check_author_status(author: &AuthorRef, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(AppError::remote(&author.key, status))
    }
}

fn author_name(author: &AuthorRef, record: Author) -> Result<String> {
    record
        .name
        .ok_or_else(|| AppError::remote(&author.key, "author record has no name"))
}

/// Resolve author names concurrently, keeping the order of `refs`.
pub async fn fetch_authors(
    lookup: &dyn BibliographicLookup,
    refs: &[AuthorRef],
    concurrency: usize,
) -> Result<Vec<String>> {
    if refs.is_empty() {
        return Ok(Vec::new());
    }

    stream::iter(refs)
        .map(|author| lookup.resolve_author(author))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Initial confirmation values for a looked-up edition.
pub fn draft_from_lookup(
    isbn: u64,
    format: Format,
    edition: &Edition,
    authors: Vec<String>,
) -> BookDraft {
    BookDraft {
        isbn,
        title: to_title_case(edition.title.as_deref().unwrap_or_default()),
        subtitle: edition
            .subtitle
            .as_deref()
            .map(to_title_case)
            .unwrap_or_default(),
        authors,
        publishers: edition.publishers.clone(),
        page_total: edition.number_of_pages.unwrap_or(0),
        hours: 0,
        minutes: 0,
        fiction: false,
        format,
    }
}

/// Look up an ISBN and build its draft.
pub async fn lookup_draft(
    lookup: &dyn BibliographicLookup,
    isbn: u64,
    format: Format,
    concurrency: usize,
) -> Result<BookDraft> {
    let edition = lookup.lookup_by_isbn(isbn).await?;
    let authors = fetch_authors(lookup, &edition.authors, concurrency).await?;
    log::debug!(
        "Resolved {} author(s) for ISBN {isbn}",
        authors.len()
    );
    Ok(draft_from_lookup(isbn, format, &edition, authors))
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    /// In-process lookup with optional per-author latency.
    #[derive(Default)]
    pub struct FakeLookup {
        pub editions: HashMap<u64, Edition>,
        pub authors: HashMap<String, (String, u64)>,
    }

    impl FakeLookup {
        pub fn with_edition(mut self, isbn: u64, edition: Edition) -> Self {
            self.editions.insert(isbn, edition);
            self
        }

        pub fn with_author(mut self, key: &str, name: &str, delay_ms: u64) -> Self {
            self.authors
                .insert(key.to_string(), (name.to_string(), delay_ms));
            self
        }
    }

    #[async_trait]
    impl BibliographicLookup for FakeLookup {
        async fn lookup_by_isbn(&self, isbn: u64) -> Result<Edition> {
            self.editions
                .get(&isbn)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("No book found for ISBN {isbn}")))
        }

        async fn resolve_author(&self, author: &AuthorRef) -> Result<String> {
            let (name, delay_ms) = self
                .authors
                .get(&author.key)
                .cloned()
                .ok_or_else(|| AppError::remote(&author.key, "404"))?;
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(name)
        }
    }
}
