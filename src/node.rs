//! The Telegraph rich-text node model and its wire serialisation.
//!
//! Telegraph accepts page content as a JSON array of nodes. A node is either
//! a bare string (a text leaf) or an object `{"tag": …, "attrs"?: …,
//! "children"?: …}`. The `children` array of an element may freely mix bare
//! strings and tagged objects; this exact shape is what the API validates,
//! so [`Node`] serialises to it bit-for-bit via `#[serde(untagged)]`.
//!
//! The tag vocabulary is deliberately small. Telegraph has no native table
//! tag and only two heading levels (`h3`/`h4`); the converter degrades
//! richer Markdown constructs into this vocabulary rather than rejecting
//! them.

use serde::{Deserialize, Serialize};

/// Maximum serialised content size Telegraph accepts per page, in bytes.
pub const MAX_PAGE_BYTES: usize = 64 * 1024;

/// The fixed set of element tags Telegraph accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Paragraph.
    P,
    /// Major heading. Markdown levels 1–2 map here.
    H3,
    /// Minor heading. Markdown levels 3–6 map here.
    H4,
    /// Bold span.
    B,
    /// Italic span.
    I,
    /// Inline code span. Children are literal text, never parsed further.
    Code,
    /// Preformatted block (fenced code).
    Pre,
    /// Blockquote.
    Blockquote,
    /// Ordered list.
    Ol,
    /// Unordered list.
    Ul,
    /// List item.
    Li,
    /// Link. Carries an `href` attribute.
    A,
    /// Image. Carries `src` and optionally `alt`; never has children.
    Img,
    /// Horizontal rule. No attributes, no children.
    Hr,
}

/// Attributes an element may carry.
///
/// Telegraph only honours `href` on links and `src`/`alt` on images, so a
/// closed struct with optional fields reproduces the wire shape exactly
/// while ruling out junk keys at the type level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A tagged element node.
///
/// Field order matters for the canonical serialisation: `tag`, then
/// `attrs`, then `children`, with absent fields omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

/// One node of the converted rich-text tree.
///
/// Serialises untagged: a text leaf becomes a bare JSON string, an element
/// becomes a `{"tag": …}` object. Deserialisation distinguishes the two by
/// shape, matching what `getPage` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// An ordered sequence of top-level (block-level) nodes.
pub type Document = Vec<Node>;

impl Node {
    /// A text leaf.
    pub fn text(s: impl Into<String>) -> Node {
        Node::Text(s.into())
    }

    /// An element with children and no attributes.
    pub fn element(tag: Tag, children: Vec<Node>) -> Node {
        Node::Element(Element {
            tag,
            attrs: None,
            children: Some(children),
        })
    }

    /// A link to `href` wrapping `children`.
    pub fn link(href: impl Into<String>, children: Vec<Node>) -> Node {
        Node::Element(Element {
            tag: Tag::A,
            attrs: Some(Attrs {
                href: Some(href.into()),
                ..Attrs::default()
            }),
            children: Some(children),
        })
    }

    /// An image leaf. `alt` is omitted from the wire when empty.
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Node {
        let alt = alt.into();
        Node::Element(Element {
            tag: Tag::Img,
            attrs: Some(Attrs {
                src: Some(src.into()),
                alt: if alt.is_empty() { None } else { Some(alt) },
                ..Attrs::default()
            }),
            children: None,
        })
    }

    /// A horizontal rule.
    pub fn hr() -> Node {
        Node::Element(Element {
            tag: Tag::Hr,
            attrs: None,
            children: None,
        })
    }

    /// Byte length of this node's canonical (compact JSON) form.
    pub fn serialized_size(&self) -> usize {
        // Infallible: the model contains only strings and enums.
        serde_json::to_string(self).map(|s| s.len()).unwrap_or(0)
    }
}

/// Byte length of a node list's canonical form (the JSON array Telegraph
/// receives as `content`). This is the quantity the page byte budget is
/// measured against.
pub fn content_size(nodes: &[Node]) -> usize {
    serde_json::to_string(nodes).map(|s| s.len()).unwrap_or(0)
}
