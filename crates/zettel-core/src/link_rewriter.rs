use crate::corpus_index::CorpusIndex;

/// Result of relinking one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub body: String,
    /// Number of identifier occurrences replaced.
    pub substitutions: usize,
}

/// Replace every occurrence of every indexed identifier with its resolved path.
pub fn rewrite_links(body: &str, index: &CorpusIndex) -> String {
    rewrite_links_counted(body, index).body
}

/// Like [`rewrite_links`], also counting substitutions.
///
/// Replacement is a literal, global substring replacement per index entry,
/// applied in index (input) order and accumulated across entries. It is not
/// limited to wikilink syntax: an identifier written as plain prose is
/// rewritten too.
pub fn rewrite_links_counted(body: &str, index: &CorpusIndex) -> Rewrite {
    let mut text = body.to_string();
    let mut substitutions = 0;

    for entry in index.iter() {
        let identifier = entry.note.identifier.as_str();
        let target = entry.resolved.full_path.as_str();
        if identifier.is_empty() || identifier == target {
            continue;
        }

        let count = text.matches(identifier).count();
        if count > 0 {
            text = text.replace(identifier, target);
            substitutions += count;
        }
    }

    Rewrite {
        body: text,
        substitutions,
    }
}
