//! Notion database backend.
//!
//! Talks to the public REST API:
//!
//! ```text
//! POST  {api_base}databases/{database_id}/query   paged, 100 per page
//! POST  {api_base}pages                           parent = database
//! PATCH {api_base}pages/{page_id}                 partial properties
//! ```

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{BookRecord, NotionConfig, PropertyWrites};
use crate::storage::{QueryFilter, RecordStore, WriteOutcome};
use crate::utils::http;

const PAGE_SIZE: u32 = 100;
const NOTION_VERSION: HeaderName = HeaderName::from_static("notion-version");

/// Record store backed by one Notion database.
///
/// Built once per command and owned by the caller.
pub struct NotionStore {
    client: Client,
    base_url: Url,
    database_id: String,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    filter: &'a QueryFilter,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryPage {
    results: Vec<BookRecord>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl QueryPage {
    /// Records of this page and the cursor of the next one, if any.
    fn into_parts(self) -> (Vec<BookRecord>, Option<String>) {
        let has_more = self.has_more;
        let next = self.next_cursor.filter(|_| has_more);
        (self.results, next)
    }
}

#[derive(Serialize)]
struct Parent<'a> {
    database_id: &'a str,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    parent: Parent<'a>,
    properties: &'a PropertyWrites,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    properties: &'a PropertyWrites,
}

/// Error object returned by the API.
#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl NotionStore {
    pub fn new(config: &NotionConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(AppError::config("notion.token is empty"));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|e| AppError::config(format!("notion.token is not a valid header: {e}")))?;
        auth.set_sensitive(true);
        let version = HeaderValue::from_str(&config.api_version).map_err(|e| {
            AppError::config(format!("notion.api_version is not a valid header: {e}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(NOTION_VERSION, version);

        let user_agent = concat!("booktrack/", env!("CARGO_PKG_VERSION"));
        let client = http::create_client_with_headers(user_agent, config.timeout_secs, headers)?;

        Ok(Self {
            client,
            base_url: http::base_url(&config.api_base)?,
            database_id: config.database_id.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a request and turn non-success statuses into remote errors.
    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::remote(context, remote_message(status, &body)))
    }

    fn create_body<'a>(&'a self, properties: &'a PropertyWrites) -> CreateBody<'a> {
        CreateBody {
            parent: Parent {
                database_id: &self.database_id,
            },
            properties,
        }
    }
}

/// Failure text for a non-success response, preferring Notion's error body.
fn remote_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            code: Some(code),
            message: Some(message),
        }) => format!("{status} {code}: {message}"),
        Ok(ApiError {
            message: Some(message),
            ..
        }) => format!("{status}: {message}"),
        _ => status.to_string(),
    }
}

#[async_trait]
impl RecordStore for NotionStore {
    async fn query(&self, filter: &QueryFilter) -> Result<Vec<BookRecord>> {
        let url = self.endpoint(&format!("databases/{}/query", self.database_id))?;
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = QueryBody {
                filter,
                page_size: PAGE_SIZE,
                start_cursor: cursor.as_deref(),
            };
            log::debug!("POST {url} {}", serde_json::to_string(&body)?);

            let response = self
                .send(self.client.post(url.clone()).json(&body), "databases.query")
                .await?;
            let page: QueryPage = response.json().await?;
            let (results, next) = page.into_parts();
            records.extend(results);

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        log::debug!("Query returned {} record(s)", records.len());
        Ok(records)
    }

    async fn create_page(&self, properties: &PropertyWrites) -> Result<WriteOutcome> {
        let url = self.endpoint("pages")?;
        let body = self.create_body(properties);
        self.send(self.client.post(url).json(&body), "pages.create")
            .await?;
        Ok(WriteOutcome::Written)
    }

    async fn update_page(
        &self,
        page_id: &str,
        properties: &PropertyWrites,
    ) -> Result<WriteOutcome> {
        let url = self.endpoint(&format!("pages/{page_id}"))?;
        let body = UpdateBody { properties };
        self.send(self.client.patch(url).json(&body), "pages.update")
            .await?;
        Ok(WriteOutcome::Written)
    }

    fn create_payload(&self, properties: &PropertyWrites) -> Result<Value> {
        Ok(serde_json::to_value(self.create_body(properties))?)
    }

    fn update_payload(&self, _page_id: &str, properties: &PropertyWrites) -> Result<Value> {
        Ok(serde_json::to_value(UpdateBody { properties })?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Properties, PropertyValue, fields};
    use crate::storage::{DryRunEntry, DryRunStore};

    fn config() -> NotionConfig {
        NotionConfig {
            token: "secret_abc".to_string(),
            database_id: "db123".to_string(),
            ..NotionConfig::default()
        }
    }

    #[test]
    fn new_requires_token() {
        let mut cfg = config();
        cfg.token = " ".to_string();
        assert!(matches!(NotionStore::new(&cfg), Err(AppError::Config(_))));
        assert!(NotionStore::new(&config()).is_ok());
    }

    #[test]
    fn endpoints_join_under_api_root() {
        let store = NotionStore::new(&config()).unwrap();
        assert_eq!(
            store.endpoint("databases/db123/query").unwrap().as_str(),
            "https://api.notion.com/v1/databases/db123/query"
        );
    }

    #[test]
    fn query_body_shape() {
        let filter = QueryFilter::unstarted();
        let body = QueryBody {
            filter: &filter,
            page_size: PAGE_SIZE,
            start_cursor: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "filter": {"property": "Date Start", "date": {"is_empty": true}},
                "page_size": 100
            })
        );
    }

    #[test]
    fn create_body_shape() {
        let props = Properties::new().with(fields::TITLE, PropertyValue::title("Dune"));
        let body = CreateBody {
            parent: Parent {
                database_id: "db123",
            },
            properties: &props,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "parent": {"database_id": "db123"},
                "properties": {"Title": {"title": [{"text": {"content": "Dune"}}]}}
            })
        );
    }

    #[test]
    fn remote_message_prefers_error_body() {
        let body = json!({
            "object": "error",
            "status": 400,
            "code": "validation_error",
            "message": "Title is not a property"
        })
        .to_string();
        assert_eq!(
            remote_message(StatusCode::BAD_REQUEST, &body),
            "400 Bad Request validation_error: Title is not a property"
        );

        let body = r#"{"message":"rate limited"}"#;
        assert_eq!(
            remote_message(StatusCode::TOO_MANY_REQUESTS, body),
            "429 Too Many Requests: rate limited"
        );

        assert_eq!(
            remote_message(StatusCode::BAD_GATEWAY, "<html>upstream</html>"),
            "502 Bad Gateway"
        );
        assert_eq!(
            remote_message(StatusCode::UNAUTHORIZED, r#"{"code":"unauthorized"}"#),
            "401 Unauthorized"
        );
    }

    fn page(has_more: bool, next_cursor: Option<&str>) -> QueryPage {
        serde_json::from_value(json!({
            "results": [{"id": "p1", "properties": {}}],
            "has_more": has_more,
            "next_cursor": next_cursor,
        }))
        .unwrap()
    }

    #[test]
    fn pagination_follows_cursor_only_while_more() {
        let (results, next) = page(true, Some("c2")).into_parts();
        assert_eq!(results.len(), 1);
        assert_eq!(next.as_deref(), Some("c2"));

        assert_eq!(page(false, Some("c2")).into_parts().1, None);
        assert_eq!(page(true, None).into_parts().1, None);
        assert_eq!(page(false, None).into_parts().1, None);
    }

    #[test]
    fn payloads_match_request_bodies() {
        let store = NotionStore::new(&config()).unwrap();
        let props = Properties::new().with(fields::PAGES_READ, PropertyValue::number(3));
        assert_eq!(
            store.create_payload(&props).unwrap(),
            json!({
                "parent": {"database_id": "db123"},
                "properties": {"Pages Read": {"number": 3}}
            })
        );
        assert_eq!(
            store.update_payload("p1", &props).unwrap(),
            json!({"properties": {"Pages Read": {"number": 3}}})
        );
    }

    #[tokio::test]
    async fn dry_run_journals_full_create_body() {
        let store = DryRunStore::new(NotionStore::new(&config()).unwrap());
        let props = Properties::new().with(fields::TITLE, PropertyValue::title("Dune"));
        assert_eq!(store.create_page(&props).await.unwrap(), WriteOutcome::DryRun);
        assert_eq!(
            store.recorded(),
            vec![DryRunEntry::Create {
                payload: json!({
                    "parent": {"database_id": "db123"},
                    "properties": {"Title": {"title": [{"text": {"content": "Dune"}}]}}
                })
            }]
        );
    }

    #[test]
    fn query_page_parses_results() {
        let page: QueryPage = serde_json::from_value(json!({
            "object": "list",
            "results": [{"object": "page", "id": "p1", "properties": {}}],
            "has_more": true,
            "next_cursor": "c2"
        }))
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));
    }
}
