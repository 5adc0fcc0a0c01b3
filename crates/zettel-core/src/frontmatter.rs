use serde_yaml::{Mapping, Value};

/// Order-preserving header metadata of a note.
pub type Metadata = Mapping;

/// Split a note into its header block and body.
///
/// The header opens with a first line of `---` (an optional BOM is ignored)
/// and closes with a line of `---` or `...`. Text without an opening
/// delimiter is all body. Returns `Err` when the header is never closed.
///
/// Example: `"---\ntitle: A\n---\nBody"` → `(Some("title: A\n"), "Body")`
pub fn split_frontmatter(input: &str) -> Result<(Option<&str>, &str), String> {
    let text = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok((None, text));
    };
    if first.trim_end() != "---" {
        return Ok((None, text));
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let header = &text[header_start..offset];
            let body = &text[offset + line.len()..];
            return Ok((Some(header), body));
        }
        offset += line.len();
    }

    Err("header opened with '---' but never closed".to_string())
}

/// Parse header YAML into normalised metadata.
///
/// An empty header yields empty metadata. Anything other than a key/value
/// mapping is rejected.
pub fn parse_metadata(header: &str) -> Result<Metadata, String> {
    if header.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value = serde_yaml::from_str(header).map_err(|e| e.to_string())?;
    match value {
        Value::Mapping(mapping) => Ok(normalize(mapping)),
        Value::Null => Ok(Metadata::new()),
        _ => Err("header is not a key/value mapping".to_string()),
    }
}

/// Serialize metadata back into a header block followed by the body.
/// Notes without metadata are written as the bare body.
pub fn render_note(metadata: &Metadata, body: &str) -> Result<String, serde_yaml::Error> {
    if metadata.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(metadata)?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

/// Render a scalar metadata value as a string. Sequences and maps yield `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Rebuild the mapping in order, normalising `tags` and `aliases`.
///
/// - `tags` becomes a sequence of non-blank strings; a bare string is split
///   on whitespace and commas. An empty result drops the key.
/// - `aliases` loses any entry equal to the title. An empty result drops the key.
fn normalize(mapping: Mapping) -> Metadata {
    let title = mapping.get("title").and_then(scalar_string);
    let mut out = Metadata::with_capacity(mapping.len());

    for (key, value) in mapping {
        match key.as_str() {
            Some("tags") => {
                let tags = normalize_tags(&value);
                if !tags.is_empty() {
                    out.insert(key, string_sequence(tags));
                }
            }
            Some("aliases") => {
                let aliases: Vec<String> = list_of_strings(&value)
                    .into_iter()
                    .filter(|alias| Some(alias.as_str()) != title.as_deref())
                    .collect();
                if !aliases.is_empty() {
                    out.insert(key, string_sequence(aliases));
                }
            }
            _ => {
                out.insert(key, value);
            }
        }
    }

    out
}

fn normalize_tags(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        other => list_of_strings(other),
    }
}

fn list_of_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(scalar_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        other => scalar_string(other)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
    }
}

fn string_sequence(items: Vec<String>) -> Value {
    Value::Sequence(items.into_iter().map(Value::String).collect())
}
