use crate::note::{tag_name, BOOKNOTE_TAG, CAREER_TAG, JOURNAL_TAG, LINKS_TAG};
use crate::path_resolver::sanitize_filename;

/// Flat classification rules in priority order: (tag, destination folder).
const FOLDER_RULES: &[(&str, &str)] = &[
    (BOOKNOTE_TAG, "booknotes"),
    (LINKS_TAG, "links"),
    (JOURNAL_TAG, "journal"),
];

/// Decide the destination folder for a note from its tags.
///
/// First match wins, regardless of the order tags appear in:
/// 1. no tags → `None` (corpus root)
/// 2. `#booknote` → `["booknotes"]`
/// 3. `#links` → `["links"]`
/// 4. `#journal` → `["journal"]`
/// 5. first `#career/...` tag → its segments, e.g. `["career", "eab", "notes"]`
/// 6. otherwise → `None`
pub fn classify<S: AsRef<str>>(tags: Option<&[S]>) -> Option<Vec<String>> {
    let tags = tags?;

    for (tag, folder) in FOLDER_RULES {
        if tags.iter().any(|t| tag_name(t.as_ref()) == *tag) {
            return Some(vec![folder.to_string()]);
        }
    }

    tags.iter().find_map(|t| career_folder(t.as_ref()))
}

/// `#career/eab/notes` → `["career", "eab", "notes"]`. A bare `#career` is not
/// hierarchical and does not match.
///
/// Segments are sanitized like filenames; `.` and `..` are dropped so the
/// folder always stays below the destination root.
fn career_folder(tag: &str) -> Option<Vec<String>> {
    let name = tag_name(tag);
    let rest = name.strip_prefix(CAREER_TAG)?.strip_prefix('/')?;
    let segments: Vec<String> = rest
        .split('/')
        .map(sanitize_filename)
        .filter(|s| !s.is_empty() && s != "." && s != "..")
        .collect();
    if segments.is_empty() {
        return None;
    }

    let mut folder = Vec::with_capacity(segments.len() + 1);
    folder.push(CAREER_TAG.to_string());
    folder.extend(segments);
    Some(folder)
}
