//! Markdown → Telegraph node conversion.
//!
//! Each submodule implements exactly one transformation step, so every
//! stage stays independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ segment ──▶ block ──▶ inline
//! (raw text)   (blocks)   (nodes)   (spans)
//! ```
//!
//! 1. [`segment`] — split normalised text into blank-line-delimited blocks,
//!    never breaking inside a fenced code block
//! 2. [`block`]   — classify each block (heading, rule, quote, list, table,
//!    code, paragraph) and render it into nodes
//! 3. [`inline`]  — tokenise flat text spans into images, links, bold,
//!    italic, and code nodes, with nesting
//!
//! The whole pipeline is a pure function of the input string: no I/O, no
//! shared state, safe to call concurrently on independent inputs.

mod block;
mod inline;
mod segment;

use crate::node::Document;

/// Convert a Markdown string into a Telegraph node document.
///
/// Line endings are normalised first (`\r\n` and `\r` collapse to `\n`).
/// Blocks that render to nothing (blank paragraphs, empty fences) are
/// dropped, so an input of pure whitespace yields an empty document.
pub fn markdown_to_document(markdown: &str) -> Document {
    let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");

    let mut document = Document::new();
    for block in segment::split_blocks(&normalized) {
        if block.trim().is_empty() {
            continue;
        }
        block::render_block(&block, &mut document);
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, Tag};

    #[test]
    fn crlf_input_converts_like_lf() {
        let unix = markdown_to_document("# T\n\npara\n");
        let dos = markdown_to_document("# T\r\n\r\npara\r\n");
        let mac = markdown_to_document("# T\r\rpara\r");
        assert_eq!(unix, dos);
        assert_eq!(unix, mac);
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert!(markdown_to_document("").is_empty());
        assert!(markdown_to_document("  \n\n\t\n").is_empty());
    }

    #[test]
    fn document_order_follows_source_order() {
        let doc = markdown_to_document("first\n\n---\n\nlast");
        assert_eq!(doc.len(), 3);
        assert!(matches!(&doc[0], Node::Element(el) if el.tag == Tag::P));
        assert_eq!(doc[1], Node::hr());
        assert!(matches!(&doc[2], Node::Element(el) if el.tag == Tag::P));
    }

    #[test]
    fn fence_body_never_classified_as_blocks() {
        let doc = markdown_to_document("```\n# not a heading\n\n- not a list\n```");
        assert_eq!(
            doc,
            vec![Node::element(
                Tag::Pre,
                vec![Node::text("# not a heading\n\n- not a list")]
            )]
        );
    }
}
