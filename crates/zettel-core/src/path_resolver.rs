use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

use crate::classifier::classify;
use crate::dates::{resolve_date, DateOptions};
use crate::error::Result;
use crate::note::{Note, BOOKNOTE_TAG, JOURNAL_TAG, LINKS_TAG};

/// Characters that may not appear in a destination filename.
pub const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>()\[\]"'`]+"#).unwrap()
});

/// Destination of a note, relative to the output root and without extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    /// Folder segments; empty for the output root.
    pub folder: Vec<String>,
    pub filename: String,
    /// `folder` joined with `filename` by `/`, computed once.
    pub full_path: String,
}

impl ResolvedPath {
    pub fn new(folder: Vec<String>, filename: String) -> Self {
        let full_path = if folder.is_empty() {
            filename.clone()
        } else {
            format!("{}/{}", folder.join("/"), filename)
        };
        Self {
            folder,
            filename,
            full_path,
        }
    }

    /// Relative filesystem path of the emitted `.md` file.
    pub fn relative_file(&self) -> PathBuf {
        let mut path: PathBuf = self.folder.iter().collect();
        path.push(format!("{}.md", self.filename));
        path
    }
}

/// Remove every forbidden filesystem character. Idempotent.
///
/// Example: `"What? A: Story"` → `"What A Story"`
pub fn sanitize_filename(name: &str) -> String {
    name.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect()
}

/// Host of the first well-formed http(s) URL in `body`.
pub fn first_url_host(body: &str) -> Option<String> {
    URL_RE.find_iter(body).find_map(|m| {
        let candidate = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        let url = Url::parse(candidate).ok()?;
        url.host_str().map(str::to_string)
    })
}

/// Decide the destination filename of a note.
///
/// First matching branch wins:
/// 1. `#links` with a URL in the body → `"{title without host} - {host}"`
/// 2. `#booknote` with an author → `"{title} by {first author}"`
/// 3. `#journal` → the resolved date as `YYYY-MM-DD` (fatal if unresolvable)
/// 4. the title
///
/// The result is always sanitized.
pub fn resolve_filename(note: &Note, dates: &DateOptions) -> Result<String> {
    let title = note.title();

    if note.has_tag(LINKS_TAG) {
        match first_url_host(&note.body) {
            Some(host) => {
                let stripped = title.replace(&host, "");
                let stripped = stripped.trim();
                let name = if stripped.is_empty() {
                    host
                } else {
                    format!("{} - {}", stripped, host)
                };
                return Ok(sanitize_filename(&name));
            }
            None => {
                tracing::warn!(
                    "{}: tagged #links but no URL found, using title",
                    note.identifier
                );
            }
        }
    }

    if note.has_tag(BOOKNOTE_TAG) {
        if let Some(author) = note.first_author() {
            return Ok(sanitize_filename(&format!("{} by {}", title, author)));
        }
    }

    if note.has_tag(JOURNAL_TAG) {
        let date = resolve_date(note, dates)?;
        return Ok(date.format("%Y-%m-%d").to_string());
    }

    Ok(sanitize_filename(&title))
}

/// Combine the classifier folder with the resolved filename.
pub fn resolve_path(note: &Note, dates: &DateOptions) -> Result<ResolvedPath> {
    let folder = classify(note.tags().as_deref()).unwrap_or_default();
    let filename = resolve_filename(note, dates)?;
    Ok(ResolvedPath::new(folder, filename))
}
