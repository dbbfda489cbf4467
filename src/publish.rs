//! Publish orchestration: Markdown in, live Telegraph pages out.
//!
//! The orchestrator is a state machine,
//! `Converting → Partitioned → PlaceholdersPublished → Linked → Finalized`,
//! because navigation links need the final URL of every part and a URL only
//! exists once its page does. The two publishing states:
//!
//! 1. **Placeholders** — create one page per chunk, sequentially and in
//!    order, each holding its real content but no navigation. A failure here
//!    aborts with [`PublishError::PartCreateFailed`], reporting exactly which
//!    part failed and which pages already exist.
//! 2. **Relink** — with all URLs known, rebuild each chunk with its
//!    navigation header and footer and edit the placeholder pages in place.
//!    Edits run concurrently (bounded by `edit_concurrency`) and a failed
//!    edit does not abort: the page stays live with its placeholder content,
//!    and the failure is recorded on that part in the [`PublishReport`].
//!
//! A document that fits in one page skips all of this: one `createPage`
//! call, no navigation, no edits.

use crate::config::PublishConfig;
use crate::convert::markdown_to_document;
use crate::error::PublishError;
use crate::nav::link_chunks;
use crate::node::content_size;
use crate::split::{partition, Chunk};
use crate::telegraph::{NewPage, Page, PageApi};
use futures::{stream, StreamExt};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// One published part of a document.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPart {
    /// 0-indexed position among the parts.
    pub index: usize,
    /// Total number of parts in this publication.
    pub total: usize,
    /// Title this part was published under.
    pub title: String,
    /// Telegraph page path (stable across edits).
    pub path: String,
    /// Public page URL.
    pub url: String,
    /// Serialised byte length of the part's final content.
    pub content_bytes: usize,
    /// The part alone exceeded the page budget and was published
    /// best-effort.
    pub oversized: bool,
    /// Set when the relink edit for this part failed. The page is still
    /// live, but shows placeholder content without navigation.
    pub relink_error: Option<String>,
}

/// Outcome of a successful publish: every part exists as a live page.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    /// Title of the publication (part 1's title).
    pub title: String,
    /// URL of the first part, the article's entry point.
    pub main_url: String,
    /// All published parts, in document order.
    pub parts: Vec<PublishedPart>,
}

impl PublishReport {
    /// True when every part carries its navigation links.
    pub fn fully_relinked(&self) -> bool {
        self.parts.iter().all(|p| p.relink_error.is_none())
    }

    /// URLs of all parts, in order.
    pub fn urls(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.url.as_str()).collect()
    }
}

/// The orchestrator's state machine. Each variant owns everything the next
/// transition needs, so a partially-completed multi-part publish could be
/// resumed from any state.
enum Stage {
    Converting,
    Partitioned(Vec<Chunk>),
    PlaceholdersPublished(Vec<Chunk>, Vec<PublishedPart>),
    Linked(Vec<Chunk>, Vec<PublishedPart>),
    Finalized(PublishReport),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Converting => "converting",
            Stage::Partitioned(_) => "partitioned",
            Stage::PlaceholdersPublished(..) => "placeholders_published",
            Stage::Linked(..) => "linked",
            Stage::Finalized(_) => "finalized",
        }
    }
}

/// Convert `markdown` and publish it as one or more Telegraph pages.
///
/// Returns `Err` only when no complete set of pages could be created; see
/// the module docs for the failure semantics of each phase.
pub async fn publish<P: PageApi>(
    api: &P,
    title: &str,
    markdown: &str,
    config: &PublishConfig,
) -> Result<PublishReport, PublishError> {
    let mut stage = Stage::Converting;
    loop {
        stage = match stage {
            Stage::Converting => convert_stage(markdown, config)?,
            Stage::Partitioned(chunks) => {
                create_placeholders(api, title, chunks, config).await?
            }
            Stage::PlaceholdersPublished(chunks, parts) => link_stage(chunks, parts, title),
            Stage::Linked(chunks, parts) => relink_pages(api, chunks, parts, title, config).await,
            Stage::Finalized(report) => {
                info!(
                    "published {} part(s), main page {}",
                    report.parts.len(),
                    report.main_url
                );
                return Ok(report);
            }
        };
        debug!("publish stage: {}", stage.name());
    }
}

fn convert_stage(markdown: &str, config: &PublishConfig) -> Result<Stage, PublishError> {
    let document = markdown_to_document(markdown);
    if document.is_empty() {
        return Err(PublishError::EmptyDocument);
    }
    debug!("converted {} top-level nodes", document.len());
    Ok(Stage::Partitioned(partition(document, config.max_page_bytes)))
}

/// Create one page per chunk, sequentially and in order. A single-chunk
/// document terminates here: its lone page needs no navigation, so the
/// machine jumps straight to `Finalized`.
async fn create_placeholders<P: PageApi>(
    api: &P,
    title: &str,
    mut chunks: Vec<Chunk>,
    config: &PublishConfig,
) -> Result<Stage, PublishError> {
    if chunks.len() == 1 {
        let chunk = chunks.remove(0);
        let page = api
            .create_page(new_page(title.to_string(), chunk.nodes, config))
            .await?;
        return Ok(Stage::Finalized(PublishReport {
            title: title.to_string(),
            main_url: page.url.clone(),
            parts: vec![PublishedPart {
                index: 0,
                total: 1,
                title: title.to_string(),
                path: page.path,
                url: page.url,
                content_bytes: chunk.serialized_bytes,
                oversized: chunk.oversized,
                relink_error: None,
            }],
        }));
    }

    let total = chunks.len();
    info!("document split into {} parts", total);
    let mut parts: Vec<PublishedPart> = Vec::with_capacity(total);
    for chunk in &chunks {
        let part_title = part_title(title, chunk.index);
        let result = api
            .create_page(new_page(part_title.clone(), chunk.nodes.clone(), config))
            .await;
        match result {
            Ok(page) => {
                debug!("created placeholder {}/{}: {}", chunk.index + 1, total, page.url);
                parts.push(PublishedPart {
                    index: chunk.index,
                    total,
                    title: part_title,
                    path: page.path,
                    url: page.url,
                    content_bytes: chunk.serialized_bytes,
                    oversized: chunk.oversized,
                    relink_error: None,
                });
            }
            Err(source) => {
                return Err(PublishError::PartCreateFailed {
                    part: chunk.index + 1,
                    total,
                    created: parts,
                    source,
                });
            }
        }
    }
    Ok(Stage::PlaceholdersPublished(chunks, parts))
}

fn link_stage(chunks: Vec<Chunk>, mut parts: Vec<PublishedPart>, title: &str) -> Stage {
    let urls: Vec<String> = parts.iter().map(|p| p.url.clone()).collect();
    let linked = link_chunks(&chunks, &urls, title);
    for chunk in &linked {
        parts[chunk.index].content_bytes = chunk.serialized_bytes;
    }
    Stage::Linked(linked, parts)
}

/// Overwrite every placeholder with its navigation-carrying content.
/// Edits run concurrently up to `edit_concurrency`; failures are recorded
/// per part, never rolled back.
async fn relink_pages<P: PageApi>(
    api: &P,
    chunks: Vec<Chunk>,
    mut parts: Vec<PublishedPart>,
    title: &str,
    config: &PublishConfig,
) -> Stage {
    let total = parts.len();
    let edits: Vec<_> = stream::iter(chunks.into_iter().map(|chunk| {
        let path = parts[chunk.index].path.clone();
        let page = new_page(parts[chunk.index].title.clone(), chunk.nodes, config);
        async move { api.edit_page(&path, page).await }
    }))
    .buffered(config.edit_concurrency)
    .collect()
    .await;

    for (part, result) in parts.iter_mut().zip(edits) {
        match result {
            Ok(page) => {
                part.url = page.url;
            }
            Err(e) => {
                warn!("relink of part {}/{} failed: {}", part.index + 1, total, e);
                part.relink_error = Some(e.to_string());
            }
        }
    }

    Stage::Finalized(PublishReport {
        title: title.to_string(),
        main_url: parts[0].url.clone(),
        parts,
    })
}

/// Read a Markdown file and publish it. Convenience wrapper over
/// [`publish`].
pub async fn publish_file<P: PageApi>(
    api: &P,
    title: &str,
    path: impl AsRef<Path>,
    config: &PublishConfig,
) -> Result<PublishReport, PublishError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| PublishError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
    let markdown = String::from_utf8(bytes).map_err(|_| PublishError::SourceNotText {
        path: path.to_path_buf(),
    })?;
    publish(api, title, &markdown, config).await
}

/// Replace the content of an existing page with converted Markdown.
///
/// Editing keeps the page's path and URL, so multi-part output is refused:
/// content over the page budget fails with [`PublishError::EditTooLarge`].
/// When `title` is `None` the current title is fetched and kept.
pub async fn edit_existing<P: PageApi>(
    api: &P,
    path: &str,
    title: Option<&str>,
    markdown: &str,
    config: &PublishConfig,
) -> Result<Page, PublishError> {
    let document = markdown_to_document(markdown);
    if document.is_empty() {
        return Err(PublishError::EmptyDocument);
    }

    let size = content_size(&document);
    if size > config.max_page_bytes {
        return Err(PublishError::EditTooLarge {
            size,
            budget: config.max_page_bytes,
        });
    }

    let title = match title {
        Some(t) => t.to_string(),
        None => api.get_page(path).await?.title,
    };

    let page = api
        .edit_page(path, new_page(title, document, config))
        .await?;
    info!("edited page: {}", page.url);
    Ok(page)
}

/// Part 1 keeps the document title; later parts are suffixed.
fn part_title(title: &str, index: usize) -> String {
    if index == 0 {
        title.to_string()
    } else {
        format!("{} (part {})", title, index + 1)
    }
}

fn new_page(title: String, content: Vec<crate::node::Node>, config: &PublishConfig) -> NewPage {
    NewPage {
        title,
        content,
        author_name: config.author_name.clone(),
        author_url: config.author_url.clone(),
    }
}
