//! Configuration types for publishing to Telegraph.
//!
//! All publish behaviour is controlled through [`PublishConfig`], built via
//! its [`PublishConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across commands and to diff two runs.

use crate::error::PublishError;
use crate::node::MAX_PAGE_BYTES;
use serde::{Deserialize, Serialize};

/// Default Telegraph API endpoint.
pub const TELEGRAPH_API: &str = "https://api.telegra.ph";

/// Configuration for a Telegraph publish or edit operation.
///
/// Built via [`PublishConfig::builder()`] or [`PublishConfig::default()`].
///
/// # Example
/// ```rust
/// use md2telegraph::PublishConfig;
///
/// let config = PublishConfig::builder()
///     .access_token("abc123")
///     .author_name("Docs Bot")
///     .api_timeout_secs(15)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Telegraph access token. Required for create/edit/list; `getPage`
    /// works without one.
    pub access_token: Option<String>,

    /// Author name shown under the page title.
    pub author_name: Option<String>,

    /// Author profile URL shown under the page title.
    pub author_url: Option<String>,

    /// API endpoint base URL. Default: `https://api.telegra.ph`.
    ///
    /// Overridable so tests and self-hosted mirrors can point the client
    /// elsewhere.
    pub api_base: String,

    /// Per-page serialised content budget in bytes. Default: 65536.
    ///
    /// Telegraph rejects pages over 64 KiB of serialised content. Lowering
    /// this produces more, smaller parts; raising it past the service limit
    /// only moves the failure from the client to the API.
    pub max_page_bytes: usize,

    /// Per-API-call timeout in seconds. Default: 30.
    ///
    /// A timed-out call counts as a failure of that call; the core never
    /// retries automatically.
    pub api_timeout_secs: u64,

    /// Number of concurrent relink (edit) calls. Default: 4.
    ///
    /// Relink failures are collected per part rather than aborting, so the
    /// edits can safely overlap. Results are still reported in part order
    /// regardless of completion order. Placeholder creation is always
    /// sequential: its abort-on-first-failure report must state exactly
    /// which part failed and which pages already exist.
    pub edit_concurrency: usize,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            author_name: None,
            author_url: None,
            api_base: TELEGRAPH_API.to_string(),
            max_page_bytes: MAX_PAGE_BYTES,
            api_timeout_secs: 30,
            edit_concurrency: 4,
        }
    }
}

impl PublishConfig {
    /// Create a new builder for `PublishConfig`.
    pub fn builder() -> PublishConfigBuilder {
        PublishConfigBuilder {
            config: Self::default(),
        }
    }

    /// The configured token, or [`PublishError::MissingToken`].
    pub fn require_token(&self) -> Result<&str, PublishError> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(PublishError::MissingToken)
    }
}

/// Builder for [`PublishConfig`].
#[derive(Debug)]
pub struct PublishConfigBuilder {
    config: PublishConfig,
}

impl PublishConfigBuilder {
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    pub fn author_name(mut self, name: impl Into<String>) -> Self {
        self.config.author_name = Some(name.into());
        self
    }

    pub fn author_url(mut self, url: impl Into<String>) -> Self {
        self.config.author_url = Some(url.into());
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn max_page_bytes(mut self, bytes: usize) -> Self {
        self.config.max_page_bytes = bytes;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn edit_concurrency(mut self, n: usize) -> Self {
        self.config.edit_concurrency = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PublishConfig, PublishError> {
        let c = &self.config;
        // A budget below the navigation overhead cannot fit any content.
        if c.max_page_bytes < 256 {
            return Err(PublishError::InvalidConfig(format!(
                "max_page_bytes must be at least 256, got {}",
                c.max_page_bytes
            )));
        }
        if c.api_base.is_empty() {
            return Err(PublishError::InvalidConfig(
                "api_base must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = PublishConfig::default();
        assert_eq!(c.api_base, TELEGRAPH_API);
        assert_eq!(c.max_page_bytes, 64 * 1024);
        assert_eq!(c.api_timeout_secs, 30);
        assert_eq!(c.edit_concurrency, 4);
        assert!(c.access_token.is_none());
    }

    #[test]
    fn builder_trims_trailing_slash_on_api_base() {
        let c = PublishConfig::builder()
            .api_base("https://example.test/")
            .build()
            .unwrap();
        assert_eq!(c.api_base, "https://example.test");
    }

    #[test]
    fn tiny_budget_rejected() {
        let err = PublishConfig::builder().max_page_bytes(10).build();
        assert!(matches!(err, Err(PublishError::InvalidConfig(_))));
    }

    #[test]
    fn require_token() {
        let c = PublishConfig::default();
        assert!(matches!(
            c.require_token(),
            Err(PublishError::MissingToken)
        ));

        let c = PublishConfig::builder().access_token("t").build().unwrap();
        assert_eq!(c.require_token().unwrap(), "t");
    }
}
