//! Size partitioning: cut a document into page-sized chunks.
//!
//! Telegraph rejects pages whose serialised content exceeds the byte
//! budget, so a converted document must be split into parts before
//! publishing. The cut points are always between top-level nodes: a single
//! node is atomic and is never split, even when it alone exceeds the budget.
//! Such a node becomes its own over-budget chunk, flagged [`Chunk::oversized`],
//! and the publish attempt for that part is best-effort.
//!
//! Size accounting mirrors the wire format: each chunk serialises to a JSON
//! array, so the running total starts at 2 bytes for the brackets and each
//! node contributes its serialised length plus one separator byte.

use crate::node::{content_size, Document, Node};
use tracing::warn;

/// A contiguous slice of a document's top-level nodes, sized for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The top-level nodes of this part, in document order.
    pub nodes: Vec<Node>,
    /// 0-indexed position among the document's chunks.
    pub index: usize,
    /// Total number of chunks the document was split into.
    pub total: usize,
    /// Serialised byte length of `nodes` (the JSON array).
    pub serialized_bytes: usize,
    /// True when this chunk alone exceeds the budget (a single atomic node
    /// bigger than a page). Publishing it may be rejected by the service.
    pub oversized: bool,
}

/// Split `document` into chunks whose serialised size stays within
/// `budget` bytes wherever possible.
///
/// A document that already fits yields exactly one chunk. Concatenating the
/// node lists of all chunks, in order, always reproduces the input node
/// sequence exactly.
pub fn partition(document: Document, budget: usize) -> Vec<Chunk> {
    let groups = if content_size(&document) <= budget {
        vec![document]
    } else {
        split_greedy(document, budget)
    };

    let total = groups.len();
    groups
        .into_iter()
        .enumerate()
        .map(|(index, nodes)| {
            let serialized_bytes = content_size(&nodes);
            let oversized = serialized_bytes > budget;
            if oversized {
                warn!(
                    "chunk {}/{} is {} bytes, over the {} byte budget; publishing best-effort",
                    index + 1,
                    total,
                    serialized_bytes,
                    budget
                );
            }
            Chunk {
                nodes,
                index,
                total,
                serialized_bytes,
                oversized,
            }
        })
        .collect()
}

/// Greedy accumulation: close the current chunk when the next node would
/// push the running size over budget, unless the chunk is still empty.
fn split_greedy(document: Document, budget: usize) -> Vec<Vec<Node>> {
    let mut groups: Vec<Vec<Node>> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    // 2 bytes for the surrounding "[" and "]".
    let mut current_size = 2usize;

    for node in document {
        let node_size = node.serialized_size() + 1;
        if current_size + node_size > budget && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
            current_size = 2;
        }
        current.push(node);
        current_size += node_size;
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}
