//! Navigation linking: stitch multi-part publications together.
//!
//! Once every part's final URL is known, each chunk gets a part-counter
//! header and a footer with prev/first/next links. This is pure node-tree
//! construction; the Markdown parser is never re-invoked.
//!
//! For chunk `i` of `N`:
//! - prepended: a paragraph with an italic `"Part i+1 of N"` label
//! - appended: a horizontal rule, then one paragraph containing, in order,
//!   a `"← Back"` link to part `i-1` (only when `i > 0`), a
//!   `"{title} (start)"` link to part 0 (always), and a `"Next →"` link to
//!   part `i+1` (only when `i < N-1`), separated by `" | "`.

use crate::node::{content_size, Node, Tag};
use crate::split::Chunk;

const SEPARATOR: &str = " | ";

/// Insert navigation nodes into every chunk, using the resolved URL of each
/// part. `urls[i]` must be the final URL of `chunks[i]`.
///
/// With fewer than two chunks there is nothing to link; the input is
/// returned unchanged.
pub fn link_chunks(chunks: &[Chunk], urls: &[String], title: &str) -> Vec<Chunk> {
    debug_assert_eq!(chunks.len(), urls.len());
    if chunks.len() <= 1 {
        return chunks.to_vec();
    }

    let total = chunks.len();
    chunks
        .iter()
        .map(|chunk| {
            let i = chunk.index;
            let mut nodes = Vec::with_capacity(chunk.nodes.len() + 3);

            nodes.push(part_header(i, total));
            nodes.extend(chunk.nodes.iter().cloned());
            nodes.push(Node::hr());
            nodes.push(nav_footer(i, total, urls, title));

            let serialized_bytes = content_size(&nodes);
            Chunk {
                nodes,
                index: chunk.index,
                total: chunk.total,
                serialized_bytes,
                oversized: chunk.oversized,
            }
        })
        .collect()
}

fn part_header(index: usize, total: usize) -> Node {
    Node::element(
        Tag::P,
        vec![Node::element(
            Tag::I,
            vec![Node::text(format!("Part {} of {}", index + 1, total))],
        )],
    )
}

fn nav_footer(index: usize, total: usize, urls: &[String], title: &str) -> Node {
    let mut children: Vec<Node> = Vec::new();

    if index > 0 {
        children.push(Node::link(&urls[index - 1], vec![Node::text("← Back")]));
        children.push(Node::text(SEPARATOR));
    }

    children.push(Node::link(
        &urls[0],
        vec![Node::text(format!("{title} (start)"))],
    ));

    if index < total - 1 {
        children.push(Node::text(SEPARATOR));
        children.push(Node::link(&urls[index + 1], vec![Node::text("Next →")]));
    }

    Node::element(Tag::P, children)
}
