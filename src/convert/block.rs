//! Block classification: map one block string to its rendered node(s).
//!
//! Each block is dispatched on its first line (plus the full text where the
//! structure spans lines), in a fixed precedence order, first match wins:
//! fenced code, heading, horizontal rule, blockquote, list, table,
//! paragraph. Every handler that carries prose delegates the flat text to
//! the inline tokeniser.
//!
//! Tables are deliberately lossy: Telegraph has no table tag, so the header
//! row becomes a bold paragraph and each data row an unordered-list item,
//! with cells joined by `" | "`.

use super::inline::tokenize_inline;
use crate::node::{Document, Node, Tag};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static RE_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*_]{3,}$").unwrap());
static RE_UL_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*+]\s+").unwrap());
static RE_OL_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+").unwrap());
static RE_QUOTE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s?").unwrap());
static RE_TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|?[\s\-:]+\|").unwrap());

/// Render one block into zero or more top-level nodes appended to `out`.
///
/// A block can legitimately produce nothing (an empty paragraph after
/// trimming, or a fence with an empty body) or two nodes (a table's bold
/// header paragraph plus its row list).
pub(crate) fn render_block(block: &str, out: &mut Document) {
    let first_line = block.lines().next().unwrap_or("").trim();

    if first_line.starts_with("```") || first_line.starts_with("~~~") {
        render_code_block(block, out);
    } else if let Some(caps) = RE_HEADING.captures(first_line) {
        let tag = if caps[1].len() <= 2 { Tag::H3 } else { Tag::H4 };
        out.push(Node::element(tag, tokenize_inline(caps[2].trim())));
    } else if RE_RULE.is_match(first_line) {
        out.push(Node::hr());
    } else if first_line.starts_with('>') {
        render_blockquote(block, out);
    } else if RE_UL_MARKER.is_match(first_line) || RE_OL_MARKER.is_match(first_line) {
        render_list(block, out);
    } else if is_table(block, first_line) {
        render_table(block, out);
    } else {
        render_paragraph(block, out);
    }
}

// ── Fenced code ──────────────────────────────────────────────────────────

fn render_code_block(block: &str, out: &mut Document) {
    let mut lines: Vec<&str> = block.lines().collect();
    if !lines.is_empty() {
        lines.remove(0);
    }
    if let Some(last) = lines.last() {
        let t = last.trim();
        if t.starts_with("```") || t.starts_with("~~~") {
            lines.pop();
        }
    }
    let code = lines.join("\n");
    if !code.is_empty() {
        out.push(Node::element(Tag::Pre, vec![Node::text(code)]));
    }
}

// ── Blockquote ───────────────────────────────────────────────────────────

fn render_blockquote(block: &str, out: &mut Document) {
    let text = block
        .lines()
        .map(|line| RE_QUOTE_PREFIX.replace(line, ""))
        .collect::<Vec<_>>()
        .join(" ");
    let text = text.trim();
    out.push(Node::element(Tag::Blockquote, tokenize_inline(text)));
}

// ── Lists ────────────────────────────────────────────────────────────────

fn strip_list_marker(line: &str) -> String {
    let stripped = RE_UL_MARKER.replace(line, "");
    RE_OL_MARKER.replace(&stripped, "").into_owned()
}

fn render_list(block: &str, out: &mut Document) {
    let first = block.lines().next().unwrap_or("").trim();
    // The first item's marker fixes the list type for the whole block.
    let tag = if RE_OL_MARKER.is_match(first) { Tag::Ol } else { Tag::Ul };

    let mut items: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in block.lines() {
        let trimmed = line.trim();
        if RE_UL_MARKER.is_match(trimmed) || RE_OL_MARKER.is_match(trimmed) {
            if !current.is_empty() {
                items.push(current.join(" "));
            }
            current = vec![strip_list_marker(trimmed)];
        } else {
            // Not a marker line: continuation of the previous item.
            current.push(trimmed.to_string());
        }
    }
    if !current.is_empty() {
        items.push(current.join(" "));
    }

    let children = items
        .iter()
        .map(|item| Node::element(Tag::Li, tokenize_inline(item)))
        .collect();
    out.push(Node::element(tag, children));
}

// ── Tables ───────────────────────────────────────────────────────────────

fn is_table(block: &str, first_line: &str) -> bool {
    if !first_line.contains('|') {
        return false;
    }
    match block.lines().nth(1) {
        Some(second) => RE_TABLE_SEPARATOR.is_match(second.trim()),
        None => false,
    }
}

fn parse_table_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn render_table(block: &str, out: &mut Document) {
    let lines: Vec<&str> = block.lines().collect();

    let header_cells = parse_table_row(lines[0]);
    if !header_cells.is_empty() {
        let header_text = header_cells.join(" | ");
        out.push(Node::element(
            Tag::P,
            vec![Node::element(Tag::B, vec![Node::text(header_text)])],
        ));
    }

    // Line 1 is the separator row; data rows follow.
    let items: Vec<Node> = lines
        .iter()
        .skip(2)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let row_text = parse_table_row(line).join(" | ");
            Node::element(Tag::Li, tokenize_inline(&row_text))
        })
        .collect();
    if !items.is_empty() {
        out.push(Node::element(Tag::Ul, items));
    }
}

// ── Paragraphs ───────────────────────────────────────────────────────────

fn render_paragraph(block: &str, out: &mut Document) {
    let text = block
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    out.push(Node::element(Tag::P, tokenize_inline(text)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(block: &str) -> Document {
        let mut out = Document::new();
        render_block(block, &mut out);
        out
    }

    #[test]
    fn heading_levels_collapse_to_two() {
        for (md, tag) in [
            ("# One", Tag::H3),
            ("## Two", Tag::H3),
            ("### Three", Tag::H4),
            ("###### Six", Tag::H4),
        ] {
            let nodes = render(md);
            assert!(
                matches!(&nodes[0], Node::Element(el) if el.tag == tag),
                "wrong tag for {md:?}"
            );
        }
    }

    #[test]
    fn hash_without_space_falls_through_to_paragraph() {
        let nodes = render("#hashtag");
        assert!(matches!(&nodes[0], Node::Element(el) if el.tag == Tag::P));
    }

    #[test]
    fn heading_text_is_tokenised() {
        let nodes = render("## A **bold** title");
        match &nodes[0] {
            Node::Element(el) => {
                let children = el.children.as_ref().unwrap();
                assert_eq!(children[0], Node::text("A "));
                assert!(matches!(&children[1], Node::Element(b) if b.tag == Tag::B));
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn horizontal_rules() {
        for md in ["---", "*****", "___", "----------"] {
            assert_eq!(render(md), vec![Node::hr()], "failed for {md:?}");
        }
    }

    #[test]
    fn code_block_strips_fences_and_keeps_body_verbatim() {
        let nodes = render("```rust\nfn main() {\n\n    1;\n}\n```");
        assert_eq!(
            nodes,
            vec![Node::element(
                Tag::Pre,
                vec![Node::text("fn main() {\n\n    1;\n}")]
            )]
        );
    }

    #[test]
    fn empty_code_block_produces_nothing() {
        assert!(render("```\n```").is_empty());
    }

    #[test]
    fn blockquote_strips_markers_and_joins_lines() {
        let nodes = render("> first line\n> second line\n>bare");
        assert_eq!(
            nodes,
            vec![Node::element(
                Tag::Blockquote,
                vec![Node::text("first line second line bare")]
            )]
        );
    }

    #[test]
    fn unordered_list_with_continuation_lines() {
        let nodes = render("- alpha\n  wrapped\n- beta");
        assert_eq!(
            nodes,
            vec![Node::element(
                Tag::Ul,
                vec![
                    Node::element(Tag::Li, vec![Node::text("alpha wrapped")]),
                    Node::element(Tag::Li, vec![Node::text("beta")]),
                ]
            )]
        );
    }

    #[test]
    fn ordered_list_detected_by_first_marker() {
        let nodes = render("1. one\n2. two");
        assert!(matches!(&nodes[0], Node::Element(el) if el.tag == Tag::Ol));
    }

    #[test]
    fn list_items_are_tokenised() {
        let nodes = render("- plain\n- has `code`");
        match &nodes[0] {
            Node::Element(list) => {
                let items = list.children.as_ref().unwrap();
                match &items[1] {
                    Node::Element(li) => {
                        let inner = li.children.as_ref().unwrap();
                        assert!(inner
                            .iter()
                            .any(|n| matches!(n, Node::Element(e) if e.tag == Tag::Code)));
                    }
                    other => panic!("expected li, got {other:?}"),
                }
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn table_degrades_to_bold_header_and_list() {
        let nodes = render("| Name | Age |\n| --- | --- |\n| Ada | 36 |\n| Alan | 41 |");
        assert_eq!(nodes.len(), 2);
        assert_eq!(
            nodes[0],
            Node::element(
                Tag::P,
                vec![Node::element(Tag::B, vec![Node::text("Name | Age")])]
            )
        );
        assert_eq!(
            nodes[1],
            Node::element(
                Tag::Ul,
                vec![
                    Node::element(Tag::Li, vec![Node::text("Ada | 36")]),
                    Node::element(Tag::Li, vec![Node::text("Alan | 41")]),
                ]
            )
        );
    }

    #[test]
    fn pipe_without_separator_row_is_a_paragraph() {
        let nodes = render("a | b\nc | d");
        assert!(matches!(&nodes[0], Node::Element(el) if el.tag == Tag::P));
    }

    #[test]
    fn paragraph_joins_lines_with_single_spaces() {
        let nodes = render("one\n  two  \nthree");
        assert_eq!(
            nodes,
            vec![Node::element(Tag::P, vec![Node::text("one two three")])]
        );
    }

    #[test]
    fn whitespace_only_block_is_dropped() {
        assert!(render("   \n   ").is_empty());
    }
}
