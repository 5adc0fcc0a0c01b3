use crate::scripture::{ScriptureBook, ScriptureTable};
use crate::wikilinks::{apply_edits, is_protected, protected_ranges, TextEdit};

/// Result of annotating one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub body: String,
    /// Number of citations turned into archive references.
    pub references: usize,
}

/// Build the archive wikilink for one citation.
///
/// Example: `("archive", "pentateuch", "Genesis", "1", Some("1"), "Gen. 1:1")`
/// → `"[[archive/pentateuch/Genesis-1#1|Gen. 1:1]]"`
pub fn archive_link(
    archive_root: &str,
    group: &str,
    book: &str,
    chapter: &str,
    verse: Option<&str>,
    display: &str,
) -> String {
    let anchor = verse.map(|v| format!("#{}", v)).unwrap_or_default();
    let root = archive_root.trim_matches('/');
    if root.is_empty() {
        format!("[[{}/{}-{}{}|{}]]", group, book, chapter, anchor, display)
    } else {
        format!("[[{}/{}/{}-{}{}|{}]]", root, group, book, chapter, anchor, display)
    }
}

/// Rewrite inline scripture citations into archive references.
pub fn annotate(body: &str, table: &ScriptureTable, archive_root: &str) -> String {
    annotate_counted(body, table, archive_root).body
}

/// Like [`annotate`], also counting the references created.
///
/// Each book runs as its own full-body pass in table order. Matches starting
/// inside an existing wikilink or code span are skipped, so the display text
/// of a reference made by an earlier pass is never claimed by a later book,
/// and annotating an annotated body changes nothing.
pub fn annotate_counted(body: &str, table: &ScriptureTable, archive_root: &str) -> Annotation {
    let mut text = body.to_string();
    let mut references = 0;

    for book in table.iter() {
        let edits = book_edits(&text, book, archive_root);
        references += edits.len();
        if !edits.is_empty() {
            apply_edits(&mut text, edits);
        }
    }

    Annotation {
        body: text,
        references,
    }
}

fn book_edits(text: &str, book: &ScriptureBook, archive_root: &str) -> Vec<TextEdit> {
    if !book.pattern().is_match(text) {
        return Vec::new();
    }
    let protected = protected_ranges(text);

    book.pattern()
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            if is_protected(whole.start(), &protected) {
                return None;
            }
            let chapter = cap.get(1)?.as_str();
            let verse = cap.get(2).map(|m| m.as_str());
            Some(TextEdit {
                offset: whole.start(),
                remove_len: whole.len(),
                insert_text: archive_link(
                    archive_root,
                    &book.group,
                    &book.name,
                    chapter,
                    verse,
                    whole.as_str(),
                ),
            })
        })
        .collect()
}
