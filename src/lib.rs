//! # md2telegraph
//!
//! Convert Markdown to Telegraph page nodes and publish it, splitting long
//! documents into linked multi-part pages.
//!
//! The pipeline has four stages, each usable on its own:
//!
//! 1. **Convert** — [`convert::markdown_to_document`] turns Markdown text
//!    into the node tree Telegraph accepts (paragraphs, headings, lists,
//!    code blocks, inline emphasis and links).
//! 2. **Partition** — [`split::partition`] cuts the document into chunks
//!    that fit the 64 KiB serialised-page budget, never splitting a single
//!    node.
//! 3. **Link** — [`nav::link_chunks`] adds part counters and
//!    prev/start/next navigation once every part's URL is known.
//! 4. **Publish** — [`publish::publish`] drives the whole thing against the
//!    API: create placeholder pages first, then edit navigation in.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use md2telegraph::{publish, PublishConfig, TelegraphClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PublishConfig::builder()
//!     .access_token("your-token")
//!     .author_name("Docs Bot")
//!     .build()?;
//! let client = TelegraphClient::new(&config)?;
//!
//! let report = publish(&client, "My Article", "# Hello\n\nWorld.", &config).await?;
//! println!("published at {}", report.main_url);
//! # Ok(())
//! # }
//! ```
//!
//! Conversion alone needs no network:
//!
//! ```rust
//! use md2telegraph::markdown_to_document;
//!
//! let document = markdown_to_document("Some **bold** text.");
//! assert_eq!(document.len(), 1);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod nav;
pub mod node;
pub mod publish;
pub mod split;
pub mod telegraph;

pub use config::{PublishConfig, PublishConfigBuilder, TELEGRAPH_API};
pub use convert::markdown_to_document;
pub use error::{ApiError, PublishError};
pub use nav::link_chunks;
pub use node::{content_size, Document, Node, Tag, MAX_PAGE_BYTES};
pub use publish::{edit_existing, publish, publish_file, PublishReport, PublishedPart};
pub use split::{partition, Chunk};
pub use telegraph::{page_path_from_url, NewPage, Page, PageApi, PageList, TelegraphClient};
