//! Telegraph API client: the external publishing collaborator.
//!
//! Telegraph exposes a small JSON-over-POST protocol: every call is
//! `POST {base}/{method}` with a JSON body and answers with the envelope
//! `{"ok": true, "result": …}` or `{"ok": false, "error": "…"}`. The error
//! field is a terse upper-snake string (`ACCESS_TOKEN_INVALID`,
//! `PAGE_NOT_FOUND`, `CONTENT_TEXT_REQUIRED`, …) which the client maps onto
//! the [`ApiError`] taxonomy so callers can react to the class of failure
//! without string matching.
//!
//! The orchestrator in [`crate::publish`] talks to the service through the
//! [`PageApi`] trait rather than this concrete client, so its whole
//! protocol can be driven against an in-memory fake in tests.

use crate::config::PublishConfig;
use crate::error::ApiError;
use crate::node::Node;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Server-side maximum for `getPageList` limits.
const LIST_LIMIT_MAX: usize = 200;

/// The page content and metadata sent to `createPage` / `editPage`.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub title: String,
    pub content: Vec<Node>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
}

/// A page as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub path: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default)]
    pub views: u64,
    /// Present only when the call asked for `return_content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
}

/// Result of `getPageList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageList {
    pub total_count: u64,
    pub pages: Vec<Page>,
}

/// The four operations the publish pipeline needs from the service.
///
/// Implemented by [`TelegraphClient`] for the real API and by in-memory
/// fakes in tests. The orchestrator is generic over this trait.
#[allow(async_fn_in_trait)]
pub trait PageApi {
    /// Create a new page; fails with [`ApiError::Auth`] or
    /// [`ApiError::Validation`].
    async fn create_page(&self, page: NewPage) -> Result<Page, ApiError>;

    /// Overwrite an existing page's title and content, keeping its path.
    /// Fails with [`ApiError::NotFound`] for an unknown path.
    async fn edit_page(&self, path: &str, page: NewPage) -> Result<Page, ApiError>;

    /// Fetch a page (with content) by path. Requires no token.
    async fn get_page(&self, path: &str) -> Result<Page, ApiError>;

    /// List pages created by the account, newest first.
    async fn list_pages(&self, offset: usize, limit: usize) -> Result<PageList, ApiError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Envelope<T> {
    ok: bool,
    #[serde(default = "Option::default")]
    result: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct CreatePageParams<'a> {
    access_token: &'a str,
    title: &'a str,
    content: &'a [Node],
    return_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_url: Option<&'a str>,
}

#[derive(Serialize)]
struct EditPageParams<'a> {
    access_token: &'a str,
    path: &'a str,
    title: &'a str,
    content: &'a [Node],
    return_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_url: Option<&'a str>,
}

#[derive(Serialize)]
struct GetPageParams<'a> {
    path: &'a str,
    return_content: bool,
}

#[derive(Serialize)]
struct PageListParams<'a> {
    access_token: &'a str,
    offset: usize,
    limit: usize,
}

// ── Client ───────────────────────────────────────────────────────────────

/// HTTP client for the Telegraph API.
#[derive(Debug, Clone)]
pub struct TelegraphClient {
    http: reqwest::Client,
    base: String,
    access_token: Option<String>,
    timeout_secs: u64,
}

impl TelegraphClient {
    /// Build a client from the publish configuration. Every call made
    /// through it is bounded by `config.api_timeout_secs`.
    pub fn new(config: &PublishConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            timeout_secs: config.api_timeout_secs,
        })
    }

    fn token(&self) -> Result<&str, ApiError> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Auth {
                detail: "no access token configured".into(),
            })
    }

    async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &str,
        body: &B,
        path_context: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base, method);
        debug!("Telegraph call: {}", method);

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    secs: self.timeout_secs,
                }
            } else {
                ApiError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(format!("HTTP {status}")));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| ApiError::InvalidResponse("ok response without result".into()))
        } else {
            let detail = envelope.error.unwrap_or_else(|| "unknown error".into());
            Err(classify_api_error(&detail, path_context))
        }
    }
}

impl PageApi for TelegraphClient {
    async fn create_page(&self, page: NewPage) -> Result<Page, ApiError> {
        let params = CreatePageParams {
            access_token: self.token()?,
            title: &page.title,
            content: &page.content,
            return_content: false,
            author_name: page.author_name.as_deref(),
            author_url: page.author_url.as_deref(),
        };
        self.call("createPage", &params, None).await
    }

    async fn edit_page(&self, path: &str, page: NewPage) -> Result<Page, ApiError> {
        let params = EditPageParams {
            access_token: self.token()?,
            path,
            title: &page.title,
            content: &page.content,
            return_content: false,
            author_name: page.author_name.as_deref(),
            author_url: page.author_url.as_deref(),
        };
        self.call("editPage", &params, Some(path)).await
    }

    async fn get_page(&self, path: &str) -> Result<Page, ApiError> {
        let params = GetPageParams {
            path,
            return_content: true,
        };
        self.call("getPage", &params, Some(path)).await
    }

    async fn list_pages(&self, offset: usize, limit: usize) -> Result<PageList, ApiError> {
        let params = PageListParams {
            access_token: self.token()?,
            offset,
            limit: limit.min(LIST_LIMIT_MAX),
        };
        self.call("getPageList", &params, None).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// Map a Telegraph error string onto the [`ApiError`] taxonomy.
fn classify_api_error(detail: &str, path_context: Option<&str>) -> ApiError {
    let upper = detail.to_ascii_uppercase();
    if upper.contains("ACCESS_TOKEN") {
        ApiError::Auth {
            detail: detail.to_string(),
        }
    } else if upper.contains("NOT_FOUND") {
        ApiError::NotFound {
            path: path_context.unwrap_or(detail).to_string(),
        }
    } else if upper.starts_with("CONTENT")
        || upper.starts_with("TITLE")
        || upper.starts_with("AUTHOR")
        || upper.ends_with("_INVALID")
        || upper.ends_with("_REQUIRED")
        || upper.contains("_TOO_")
    {
        ApiError::Validation {
            detail: detail.to_string(),
        }
    } else {
        ApiError::Api(detail.to_string())
    }
}

/// Accept either a full Telegraph URL or a bare page path, returning the
/// path. Anything that is not a telegra.ph URL passes through unchanged.
pub fn page_path_from_url(input: &str) -> &str {
    for prefix in ["https://telegra.ph/", "http://telegra.ph/"] {
        if let Some(rest) = input.strip_prefix(prefix) {
            return rest;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Tag;

    #[test]
    fn envelope_ok_and_error() {
        let ok: Envelope<Page> = serde_json::from_str(
            r#"{"ok":true,"result":{"path":"T-1","url":"https://telegra.ph/T-1","title":"T"}}"#,
        )
        .unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.unwrap().path, "T-1");

        let err: Envelope<Page> =
            serde_json::from_str(r#"{"ok":false,"error":"PAGE_NOT_FOUND"}"#).unwrap();
        assert!(!err.ok);
        assert_eq!(err.error.as_deref(), Some("PAGE_NOT_FOUND"));
    }

    #[test]
    fn error_classification() {
        assert!(matches!(
            classify_api_error("ACCESS_TOKEN_INVALID", None),
            ApiError::Auth { .. }
        ));
        assert!(matches!(
            classify_api_error("PAGE_NOT_FOUND", Some("Some-Page")),
            ApiError::NotFound { path } if path == "Some-Page"
        ));
        assert!(matches!(
            classify_api_error("CONTENT_TEXT_REQUIRED", None),
            ApiError::Validation { .. }
        ));
        assert!(matches!(
            classify_api_error("TITLE_TOO_LONG", None),
            ApiError::Validation { .. }
        ));
        assert!(matches!(
            classify_api_error("FLOOD_WAIT_5", None),
            ApiError::Api(_)
        ));
    }

    #[test]
    fn create_params_wire_shape() {
        let content = vec![Node::element(Tag::P, vec![Node::text("hi")])];
        let params = CreatePageParams {
            access_token: "tok",
            title: "T",
            content: &content,
            return_content: false,
            author_name: None,
            author_url: None,
        };
        let json = serde_json::to_string(&params).unwrap();
        // Absent author fields must be omitted, not null.
        assert!(!json.contains("author_name"));
        assert!(json.contains(r#""content":[{"tag":"p","children":["hi"]}]"#));
    }

    #[test]
    fn page_deserialises_with_missing_optionals() {
        let page: Page = serde_json::from_str(
            r#"{"path":"a-b","url":"https://telegra.ph/a-b","title":"A"}"#,
        )
        .unwrap();
        assert_eq!(page.views, 0);
        assert!(page.content.is_none());
        assert!(page.description.is_empty());
    }

    #[test]
    fn path_from_url_variants() {
        assert_eq!(page_path_from_url("https://telegra.ph/My-Page-01-01"), "My-Page-01-01");
        assert_eq!(page_path_from_url("http://telegra.ph/My-Page"), "My-Page");
        assert_eq!(page_path_from_url("My-Page"), "My-Page");
    }
}
