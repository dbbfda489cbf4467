//! Inline tokenisation: flat text span → node list.
//!
//! Recognised forms, in precedence order: image `![alt](url)`, link
//! `[text](url)`, bold `**…**` / `__…__`, italic `*…*` / `_…_`, inline code
//! `` `…` ``. Link text, bold, and italic content are tokenised recursively;
//! code spans are literal.
//!
//! The scanner keeps an explicit byte cursor and a per-pattern candidate
//! cache. Each pattern is searched at most once per consumed region: a
//! cached candidate stays valid while its start is at or past the cursor,
//! and a pattern that finds nothing is never searched again. Among valid
//! candidates the earliest start wins; when two candidates start at the same
//! byte, the pattern table order decides (image before link before bold
//! before italic before code).
//!
//! Italic requires its markers not to be flanked by a word character or
//! another marker, so `*` inside `**bold**` or `_` inside `snake_case` never
//! opens an emphasis span. The regex crate has no look-around, so the flank
//! check is done on the candidate match and the search resumes past a
//! rejected candidate.

use crate::node::{Node, Tag};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
// Lazy content so a single `*` or `_` inside the span does not break the
// match; the nested marker is handled by the recursive tokenise of the body.
static RE_BOLD_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static RE_BOLD_UNDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());
static RE_ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static RE_ITALIC_UNDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+)_").unwrap());
static RE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// The ordered pattern table. Array position is the precedence rank used to
/// break ties between candidates starting at the same byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    Image,
    Link,
    BoldStar,
    BoldUnder,
    ItalicStar,
    ItalicUnder,
    Code,
}

const PATTERNS: [Pattern; 7] = [
    Pattern::Image,
    Pattern::Link,
    Pattern::BoldStar,
    Pattern::BoldUnder,
    Pattern::ItalicStar,
    Pattern::ItalicUnder,
    Pattern::Code,
];

/// A pattern hit: the matched byte range plus its captured pieces.
#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    end: usize,
    pattern: Pattern,
    /// Alt text (image), link text, or span body.
    body: String,
    /// URL for image/link patterns.
    url: Option<String>,
}

/// True if `c` may not sit directly outside an italic marker.
fn bad_italic_flank(c: char, marker: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == marker
}

/// Search for an italic span from `from`, skipping candidates whose markers
/// are flanked by a word character or another marker.
fn find_italic(re: &Regex, marker: char, text: &str, from: usize) -> Option<(usize, usize, String)> {
    let mut at = from;
    while at <= text.len() {
        let caps = re.captures_at(text, at)?;
        let m = caps.get(0).unwrap();
        let before_ok = text[..m.start()]
            .chars()
            .next_back()
            .is_none_or(|c| !bad_italic_flank(c, marker));
        let after_ok = text[m.end()..]
            .chars()
            .next()
            .is_none_or(|c| !bad_italic_flank(c, marker));
        if before_ok && after_ok {
            return Some((m.start(), m.end(), caps[1].to_string()));
        }
        // The marker is ASCII, so start + 1 is a char boundary.
        at = m.start() + 1;
    }
    None
}

/// Find the first hit for one pattern at or after `from`.
fn search(pattern: Pattern, text: &str, from: usize) -> Option<Candidate> {
    let (start, end, body, url) = match pattern {
        Pattern::Image => {
            let caps = RE_IMAGE.captures_at(text, from)?;
            let m = caps.get(0).unwrap();
            (m.start(), m.end(), caps[1].to_string(), Some(caps[2].to_string()))
        }
        Pattern::Link => {
            let caps = RE_LINK.captures_at(text, from)?;
            let m = caps.get(0).unwrap();
            (m.start(), m.end(), caps[1].to_string(), Some(caps[2].to_string()))
        }
        Pattern::BoldStar => {
            let caps = RE_BOLD_STAR.captures_at(text, from)?;
            let m = caps.get(0).unwrap();
            (m.start(), m.end(), caps[1].to_string(), None)
        }
        Pattern::BoldUnder => {
            let caps = RE_BOLD_UNDER.captures_at(text, from)?;
            let m = caps.get(0).unwrap();
            (m.start(), m.end(), caps[1].to_string(), None)
        }
        Pattern::ItalicStar => {
            let (s, e, body) = find_italic(&RE_ITALIC_STAR, '*', text, from)?;
            (s, e, body, None)
        }
        Pattern::ItalicUnder => {
            let (s, e, body) = find_italic(&RE_ITALIC_UNDER, '_', text, from)?;
            (s, e, body, None)
        }
        Pattern::Code => {
            let caps = RE_CODE.captures_at(text, from)?;
            let m = caps.get(0).unwrap();
            (m.start(), m.end(), caps[1].to_string(), None)
        }
    };
    Some(Candidate {
        start,
        end,
        pattern,
        body,
        url,
    })
}

/// Build the node for a selected candidate. Recursion happens only here,
/// once per winning match.
fn build_node(c: Candidate) -> Node {
    match c.pattern {
        Pattern::Image => Node::image(c.url.unwrap_or_default(), c.body),
        Pattern::Link => Node::link(c.url.unwrap_or_default(), tokenize_inline(&c.body)),
        Pattern::BoldStar | Pattern::BoldUnder => {
            Node::element(Tag::B, tokenize_inline(&c.body))
        }
        Pattern::ItalicStar | Pattern::ItalicUnder => {
            Node::element(Tag::I, tokenize_inline(&c.body))
        }
        // Code spans are literal: no recursive parsing.
        Pattern::Code => Node::element(Tag::Code, vec![Node::text(c.body)]),
    }
}

/// Append literal text, merging into a trailing text node.
fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Node::text(text));
    }
}

/// Tokenise a flat text span into an ordered node list.
///
/// Always yields at least one node: an input with no matches (including the
/// empty string) comes back as a single text node.
pub(crate) fn tokenize_inline(text: &str) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    let mut cursor = 0usize;
    // None = needs (re)search from the cursor; Some(None) = exhausted.
    let mut cache: [Option<Option<Candidate>>; PATTERNS.len()] = Default::default();

    while cursor < text.len() {
        let mut best: Option<Candidate> = None;
        for (slot, &pattern) in PATTERNS.iter().enumerate() {
            let entry = match &cache[slot] {
                Some(Some(c)) if c.start >= cursor => Some(c.clone()),
                Some(None) => None,
                _ => {
                    let found = search(pattern, text, cursor);
                    cache[slot] = Some(found.clone());
                    found
                }
            };
            if let Some(c) = entry {
                // Strict < keeps the earlier table entry on equal starts.
                if best.as_ref().is_none_or(|b| c.start < b.start) {
                    best = Some(c);
                }
            }
        }

        match best {
            Some(winner) => {
                push_text(&mut out, &text[cursor..winner.start]);
                cursor = winner.end;
                out.push(build_node(winner));
            }
            None => {
                push_text(&mut out, &text[cursor..]);
                break;
            }
        }
    }

    if out.is_empty() {
        out.push(Node::text(""));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Attrs, Element};

    fn bold(children: Vec<Node>) -> Node {
        Node::element(Tag::B, children)
    }

    fn italic(children: Vec<Node>) -> Node {
        Node::element(Tag::I, children)
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(tokenize_inline("plain text"), vec![Node::text("plain text")]);
    }

    #[test]
    fn empty_input_yields_single_empty_text() {
        assert_eq!(tokenize_inline(""), vec![Node::text("")]);
    }

    #[test]
    fn bold_double_star_and_double_underscore() {
        assert_eq!(
            tokenize_inline("**a**"),
            vec![bold(vec![Node::text("a")])]
        );
        assert_eq!(
            tokenize_inline("__a__"),
            vec![bold(vec![Node::text("a")])]
        );
    }

    #[test]
    fn italic_nested_inside_bold() {
        assert_eq!(
            tokenize_inline("**a *b* c**"),
            vec![bold(vec![
                Node::text("a "),
                italic(vec![Node::text("b")]),
                Node::text(" c"),
            ])]
        );
    }

    #[test]
    fn italic_not_fired_inside_words() {
        // snake_case underscores are flanked by word characters.
        assert_eq!(
            tokenize_inline("use snake_case_names here"),
            vec![Node::text("use snake_case_names here")]
        );
    }

    #[test]
    fn italic_star_standalone() {
        assert_eq!(
            tokenize_inline("an *emphasised* word"),
            vec![
                Node::text("an "),
                italic(vec![Node::text("emphasised")]),
                Node::text(" word"),
            ]
        );
    }

    #[test]
    fn image_has_attrs_and_no_children() {
        let nodes = tokenize_inline("![alt](http://x/i.png)");
        assert_eq!(
            nodes,
            vec![Node::Element(Element {
                tag: Tag::Img,
                attrs: Some(Attrs {
                    src: Some("http://x/i.png".into()),
                    alt: Some("alt".into()),
                    href: None,
                }),
                children: None,
            })]
        );
    }

    #[test]
    fn image_alt_is_optional() {
        let nodes = tokenize_inline("![](http://x/i.png)");
        match &nodes[0] {
            Node::Element(el) => {
                assert_eq!(el.tag, Tag::Img);
                assert_eq!(el.attrs.as_ref().unwrap().alt, None);
            }
            other => panic!("expected image element, got {other:?}"),
        }
    }

    #[test]
    fn image_wins_over_link_at_same_position() {
        // `![x](u)` contains `[x](u)`; the image pattern must claim it.
        let nodes = tokenize_inline("![x](http://u)");
        assert!(matches!(&nodes[0], Node::Element(el) if el.tag == Tag::Img));
    }

    #[test]
    fn link_text_is_tokenised_recursively() {
        assert_eq!(
            tokenize_inline("[see **docs**](http://u)"),
            vec![Node::link(
                "http://u",
                vec![Node::text("see "), bold(vec![Node::text("docs")])]
            )]
        );
    }

    #[test]
    fn code_span_is_literal() {
        assert_eq!(
            tokenize_inline("run `cargo **build**` now"),
            vec![
                Node::text("run "),
                Node::element(Tag::Code, vec![Node::text("cargo **build**")]),
                Node::text(" now"),
            ]
        );
    }

    #[test]
    fn mixed_spans_in_order() {
        assert_eq!(
            tokenize_inline("a **b** and `c`"),
            vec![
                Node::text("a "),
                bold(vec![Node::text("b")]),
                Node::text(" and "),
                Node::element(Tag::Code, vec![Node::text("c")]),
            ]
        );
    }

    #[test]
    fn unterminated_markers_stay_literal() {
        assert_eq!(
            tokenize_inline("a ** b"),
            vec![Node::text("a ** b")]
        );
        assert_eq!(tokenize_inline("`open"), vec![Node::text("`open")]);
    }

    #[test]
    fn adjacent_text_segments_merge() {
        // A rejected italic candidate must not fragment the literal text.
        let nodes = tokenize_inline("x_y_z plus *i*");
        assert_eq!(
            nodes,
            vec![
                Node::text("x_y_z plus "),
                italic(vec![Node::text("i")]),
            ]
        );
    }
}
