use anyhow::{Context, Result};
use glob_match::glob_match;
use std::fs;
use std::path::{Path, PathBuf};
use zettel_core::Note;

/// Markdown files directly inside `source`, sorted by filename, minus any
/// whose filename matches an `exclude` glob.
pub fn source_files(source: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(source)
        .with_context(|| format!("failed to read source directory {}", source.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("skipping non UTF-8 filename {}", path.display());
            continue;
        };
        if exclude.iter().any(|pattern| glob_match(pattern, name)) {
            tracing::debug!("excluded {}", name);
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Read and parse every source note. The identifier is the file stem.
pub fn load_notes(source: &Path, exclude: &[String]) -> Result<Vec<Note>> {
    let files = source_files(source, exclude)?;
    tracing::info!("loading {} notes from {}", files.len(), source.display());

    files
        .iter()
        .map(|path| {
            let identifier = path
                .file_stem()
                .and_then(|s| s.to_str())
                .with_context(|| format!("invalid filename {}", path.display()))?;
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Note::parse(identifier, &text).with_context(|| format!("in {}", path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn loads_markdown_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.md", "---\ntitle: B\n---\nbee");
        write(dir.path(), "a.md", "ay");
        write(dir.path(), "notes.txt", "ignored");
        fs::create_dir(dir.path().join("sub.md")).unwrap();

        let notes = load_notes(dir.path(), &[]).unwrap();
        let ids: Vec<&str> = notes.iter().map(|n| n.identifier.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(notes[1].title(), "B");
        assert_eq!(notes[1].body, "bee");
    }

    #[test]
    fn exclude_globs_skip_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "keep.md", "x");
        write(dir.path(), "drawing.excalidraw.md", "y");

        let files = source_files(dir.path(), &["*.excalidraw.md".to_string()]).unwrap();
        assert_eq!(files, vec![dir.path().join("keep.md")]);
    }

    #[test]
    fn malformed_header_names_the_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.md", "---\ntitle: [x\n---\n");

        let err = load_notes(dir.path(), &[]).unwrap_err();
        assert!(format!("{err:#}").contains("bad.md"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_notes(&dir.path().join("nope"), &[]).is_err());
    }
}
