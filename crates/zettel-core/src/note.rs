use crate::error::{MigrateError, Result};
use crate::frontmatter::{parse_metadata, scalar_string, split_frontmatter, Metadata};

pub const BOOKNOTE_TAG: &str = "booknote";
pub const LINKS_TAG: &str = "links";
pub const JOURNAL_TAG: &str = "journal";
pub const CAREER_TAG: &str = "career";

/// Strip surrounding whitespace and the leading `#` from a tag.
///
/// Exports contain both `#journal` (quoted in YAML) and bare `journal`, so
/// every comparison goes through this.
pub fn tag_name(tag: &str) -> &str {
    let trimmed = tag.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed)
}

/// One source note: identifier, header metadata and body text.
#[derive(Debug, Clone)]
pub struct Note {
    /// Source filename without extension; the token searched for when relinking.
    pub identifier: String,
    pub metadata: Metadata,
    /// Content after the header block.
    pub body: String,
}

impl Note {
    pub fn new(identifier: impl Into<String>, metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            metadata,
            body: body.into(),
        }
    }

    /// Parse a note from raw file text.
    pub fn parse(identifier: impl Into<String>, text: &str) -> Result<Self> {
        let identifier = identifier.into();
        let malformed = |reason: String| MigrateError::MalformedMetadata {
            identifier: identifier.clone(),
            reason,
        };

        let (header, body) = split_frontmatter(text).map_err(malformed)?;
        let metadata = match header {
            Some(header) => parse_metadata(header).map_err(malformed)?,
            None => Metadata::new(),
        };

        Ok(Self::new(identifier, metadata, body))
    }

    /// A scalar metadata field as a string (numbers are stringified).
    pub fn field(&self, key: &str) -> Option<String> {
        self.metadata.get(key).and_then(scalar_string)
    }

    /// The `title` field, falling back to the identifier.
    pub fn title(&self) -> String {
        self.field("title")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.identifier.clone())
    }

    /// Tags in declared order, or `None` when the note has no `tags` field.
    pub fn tags(&self) -> Option<Vec<&str>> {
        let tags = self.metadata.get("tags")?.as_sequence()?;
        Some(tags.iter().filter_map(|t| t.as_str()).collect())
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags()
            .map(|tags| tags.iter().any(|t| tag_name(t) == name))
            .unwrap_or(false)
    }

    /// First name of the comma-separated `author` field.
    pub fn first_author(&self) -> Option<String> {
        let author = self.field("author")?;
        let first = author.split(',').next()?.trim();
        if first.is_empty() {
            None
        } else {
            Some(first.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Note {
        Note::parse("202101011200", text).expect("note should parse")
    }

    #[test]
    fn tag_name_strips_hash() {
        assert_eq!(tag_name("#journal"), "journal");
        assert_eq!(tag_name(" journal "), "journal");
        assert_eq!(tag_name("#career/eab"), "career/eab");
    }

    #[test]
    fn parses_header_and_body() {
        let n = note("---\ntitle: Hello\n---\nBody text");
        assert_eq!(n.title(), "Hello");
        assert_eq!(n.body, "Body text");
    }

    #[test]
    fn title_falls_back_to_identifier() {
        let n = note("just a body");
        assert_eq!(n.title(), "202101011200");
        assert!(n.tags().is_none());
    }

    #[test]
    fn numeric_fields_are_stringified() {
        let n = note("---\nid: 202103051230\n---\n");
        assert_eq!(n.field("id").as_deref(), Some("202103051230"));
    }

    #[test]
    fn has_tag_ignores_hash_prefix() {
        let n = note("---\ntags: [\"#booknote\", links]\n---\n");
        assert!(n.has_tag(BOOKNOTE_TAG));
        assert!(n.has_tag(LINKS_TAG));
        assert!(!n.has_tag(JOURNAL_TAG));
    }

    #[test]
    fn first_author_takes_first_comma_segment() {
        let n = note("---\nauthor: \"Lewis, C.S.\"\n---\n");
        assert_eq!(n.first_author().as_deref(), Some("Lewis"));

        let n = note("---\nauthor: \", nobody\"\n---\n");
        assert_eq!(n.first_author(), None);
    }

    #[test]
    fn malformed_header_reports_identifier() {
        let err = Note::parse("broken", "---\ntitle: [oops\n---\n").unwrap_err();
        match err {
            MigrateError::MalformedMetadata { identifier, .. } => assert_eq!(identifier, "broken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
