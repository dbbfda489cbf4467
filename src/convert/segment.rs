//! Block segmentation: split normalised Markdown into block strings.
//!
//! Blocks are blank-line-delimited, with one exception: a fenced code block
//! is a single block from its opening fence to its closing fence, no matter
//! what appears inside. The scanner is a two-state machine (inside/outside a
//! fence) that records the character and length of the fence that opened the
//! block, so blank lines, `#` markers, or `>` markers inside a fence never
//! introduce a block boundary.

/// The fence that opened the current block: marker character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

/// Parse a line as an opening fence: three or more backticks or tildes,
/// optionally followed by an info string (`\w*`, e.g. a language name).
fn opening_fence(line: &str) -> Option<Fence> {
    let trimmed = line.trim();
    let marker = match trimmed.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return None,
    };
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    let rest = &trimmed[len..];
    if rest.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some(Fence { marker, len })
    } else {
        None
    }
}

/// A closing fence is a line consisting solely of the opening marker,
/// repeated at least as many times as the opening run.
fn is_closing_fence(line: &str, fence: Fence) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.chars().all(|c| c == fence.marker)
        && trimmed.chars().count() >= fence.len
}

/// Split normalised text (LF line endings) into an ordered list of blocks.
///
/// An unclosed fence runs to the end of the input and is emitted as-is.
pub(crate) fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut open_fence: Option<Fence> = None;

    for line in text.split('\n') {
        if let Some(fence) = open_fence {
            current.push(line);
            if is_closing_fence(line, fence) {
                blocks.push(current.join("\n"));
                current.clear();
                open_fence = None;
            }
        } else if let Some(fence) = opening_fence(line) {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
            open_fence = Some(fence);
            current.push(line);
        } else if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let blocks = split_blocks("one\ntwo\n\nthree");
        assert_eq!(blocks, vec!["one\ntwo", "three"]);
    }

    #[test]
    fn multiple_blank_lines_collapse() {
        let blocks = split_blocks("a\n\n\n\nb");
        assert_eq!(blocks, vec!["a", "b"]);
    }

    #[test]
    fn fence_keeps_blank_lines_and_markers_inside() {
        let text = "before\n\n```\nlet x = 1;\n\n# not a heading\n- not a list\n> not a quote\n```\n\nafter";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[1],
            "```\nlet x = 1;\n\n# not a heading\n- not a list\n> not a quote\n```"
        );
    }

    #[test]
    fn fence_with_language_info_string() {
        let blocks = split_blocks("```rust\nfn main() {}\n```");
        assert_eq!(blocks, vec!["```rust\nfn main() {}\n```"]);
    }

    #[test]
    fn tilde_fence() {
        let blocks = split_blocks("~~~\ncode\n~~~");
        assert_eq!(blocks, vec!["~~~\ncode\n~~~"]);
    }

    #[test]
    fn closing_fence_must_match_marker_and_length() {
        // A three-tick line cannot close a four-tick fence.
        let blocks = split_blocks("````\ninner ``` line\n````");
        assert_eq!(blocks, vec!["````\ninner ``` line\n````"]);
        // Tildes cannot close a backtick fence.
        let blocks = split_blocks("```\n~~~\n```");
        assert_eq!(blocks, vec!["```\n~~~\n```"]);
    }

    #[test]
    fn longer_closing_fence_closes() {
        let blocks = split_blocks("```\ncode\n`````");
        assert_eq!(blocks, vec!["```\ncode\n`````"]);
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let blocks = split_blocks("```\ncode\nmore");
        assert_eq!(blocks, vec!["```\ncode\nmore"]);
    }

    #[test]
    fn fence_immediately_after_text_starts_new_block() {
        let blocks = split_blocks("para\n```\ncode\n```");
        assert_eq!(blocks, vec!["para", "```\ncode\n```"]);
    }

    #[test]
    fn short_tick_run_is_not_a_fence() {
        let blocks = split_blocks("``\nnot fenced\n``");
        assert_eq!(blocks, vec!["``\nnot fenced\n``"]);
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("\n\n\n").is_empty());
    }
}
