//! Error types for the md2telegraph library.
//!
//! Two distinct error types reflect two distinct failure boundaries:
//!
//! * [`ApiError`] — one Telegraph API call went wrong (bad token, unknown
//!   page, rejected content, timeout). Produced by the client in
//!   [`crate::telegraph`] and surfaced verbatim with the part it affected.
//!
//! * [`PublishError`] — the overall operation cannot produce a complete
//!   result (unreadable source, empty document, placeholder creation
//!   aborted). Returned as `Err(PublishError)` from the top-level
//!   `publish*` functions.
//!
//! Relink (edit) failures are deliberately NOT in either `Err` path: they
//! are collected per part inside [`crate::publish::PublishReport`], because
//! a failed edit leaves a live, readable page that earlier successful edits
//! already link to. Callers inspect the report to decide their tolerance.

use crate::publish::PublishedPart;
use std::path::PathBuf;
use thiserror::Error;

/// A failure of a single Telegraph API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The access token was missing, malformed, or revoked.
    #[error("Telegraph rejected the access token: {detail}")]
    Auth { detail: String },

    /// The page path does not exist on the service.
    #[error("Telegraph page not found: '{path}'")]
    NotFound { path: String },

    /// Title or content failed the service's validation rules.
    #[error("Telegraph rejected the request: {detail}")]
    Validation { detail: String },

    /// The call exceeded the configured timeout. Not retried by the core.
    #[error("Telegraph API call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Transport-level failure (connection refused, TLS, non-2xx status).
    #[error("HTTP request to Telegraph failed: {0}")]
    Http(String),

    /// The service answered `ok: false` with an error string not covered by
    /// a more specific variant.
    #[error("Telegraph API error: {0}")]
    Api(String),

    /// The response body was not the expected JSON envelope.
    #[error("Invalid JSON in Telegraph response: {0}")]
    InvalidResponse(String),
}

/// All fatal errors returned by the md2telegraph library.
#[derive(Debug, Error)]
pub enum PublishError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The source file could not be read.
    #[error("Failed to read source file '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file exists but is not UTF-8 text.
    #[error("Source file '{path}' is not valid UTF-8 text")]
    SourceNotText { path: PathBuf },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The document converted to nothing (empty or whitespace-only input).
    #[error("Conversion produced no content: the document is empty after stripping")]
    EmptyDocument,

    // ── Publish errors ────────────────────────────────────────────────────
    /// No access token was configured for an operation that requires one.
    #[error("No Telegraph access token configured.\nPass --token, set TELEGRAPH_TOKEN, or run 'md2tg auth --token <TOKEN>'.")]
    MissingToken,

    /// Creating the placeholder page for one part failed; the remaining
    /// parts were not attempted. `created` holds the pages that already
    /// exist so the caller can report or clean them up.
    #[error("Failed to create page for part {part} of {total}: {source}")]
    PartCreateFailed {
        /// 1-indexed part number that failed.
        part: usize,
        /// Total number of parts in the publication.
        total: usize,
        /// Parts successfully created before the failure, in order.
        created: Vec<PublishedPart>,
        #[source]
        source: ApiError,
    },

    /// Editing an existing page with content that needs more than one page.
    #[error("Content is {size} bytes serialised, over the {budget}-byte page limit.\nEditing does not support multi-part pages; publish as a new article instead.")]
    EditTooLarge { size: usize, budget: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Collaborator errors ───────────────────────────────────────────────
    /// A single-page operation (create, edit, get, list) failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PublishError {
    /// Stable machine-readable kind for structured CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            PublishError::SourceRead { .. } => "source_read",
            PublishError::SourceNotText { .. } => "source_not_text",
            PublishError::EmptyDocument => "empty_document",
            PublishError::MissingToken => "missing_token",
            PublishError::PartCreateFailed { .. } => "part_create_failed",
            PublishError::EditTooLarge { .. } => "edit_too_large",
            PublishError::InvalidConfig(_) => "invalid_config",
            PublishError::Api(ApiError::Auth { .. }) => "auth",
            PublishError::Api(ApiError::NotFound { .. }) => "not_found",
            PublishError::Api(ApiError::Validation { .. }) => "validation",
            PublishError::Api(ApiError::Timeout { .. }) => "timeout",
            PublishError::Api(_) => "api",
        }
    }
}
