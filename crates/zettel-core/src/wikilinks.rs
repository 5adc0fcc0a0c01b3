use regex::Regex;
use std::sync::LazyLock;

// Compile regex once, reuse across calls
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]]+)\]\]").unwrap()
});

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[^\n]*\n.*?```|~~~[^\n]*\n.*?~~~").unwrap()
});

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`]*`").unwrap()
});

/// Extract wikilink targets from markdown text.
/// Returns page names only (strips anchors and aliases).
/// Ignores links inside code blocks and inline code.
pub fn extract_wikilinks(markdown: &str) -> Vec<String> {
    let without_fenced = FENCED_CODE_RE.replace_all(markdown, "");
    let without_code = INLINE_CODE_RE.replace_all(&without_fenced, "");

    let mut links = Vec::new();

    for cap in WIKILINK_RE.captures_iter(&without_code) {
        let content = &cap[1];

        // The page name is the part before any '|' alias or '#' anchor
        let name_end = content
            .find('#')
            .unwrap_or(content.len())
            .min(content.find('|').unwrap_or(content.len()));

        let trimmed = content[..name_end].trim();
        if !trimmed.is_empty() {
            links.push(trimmed.to_string());
        }
    }

    links
}

/// Byte ranges that text rewriting must leave alone: existing wikilinks,
/// fenced code blocks and inline code spans.
pub fn protected_ranges(markdown: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for m in FENCED_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    for m in INLINE_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    for m in WIKILINK_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    ranges
}

/// Returns true if the byte offset falls within any protected range.
pub fn is_protected(offset: usize, ranges: &[(usize, usize)]) -> bool {
    ranges.iter().any(|&(start, end)| offset >= start && offset < end)
}

/// A text edit: replace `remove_len` bytes at `offset` with `insert_text`.
#[derive(Debug, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset in source
    pub offset: usize,
    /// Number of bytes to remove
    pub remove_len: usize,
    /// Replacement text
    pub insert_text: String,
}

/// Apply edits to `text`. Edits are sorted into reverse offset order first so
/// earlier offsets stay valid while later spans are replaced.
pub fn apply_edits(text: &mut String, mut edits: Vec<TextEdit>) {
    edits.sort_by(|a, b| b.offset.cmp(&a.offset));
    for edit in &edits {
        text.replace_range(edit.offset..edit.offset + edit.remove_len, &edit.insert_text);
    }
}
