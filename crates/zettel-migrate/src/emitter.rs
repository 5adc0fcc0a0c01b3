use anyhow::{Context, Result};
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use zettel_core::{render_note, EmittedNote, Emitter, MigrateError};

/// Delete `root` if present and create it empty.
pub fn reset_destination(root: &Path) -> Result<()> {
    if root.exists() {
        fs::remove_dir_all(root)
            .with_context(|| format!("failed to clear destination {}", root.display()))?;
    }
    fs::create_dir_all(root)
        .with_context(|| format!("failed to create destination {}", root.display()))
}

/// Writes each note to `{root}/{folder...}/{filename}.md`.
pub struct FsEmitter {
    root: PathBuf,
}

impl FsEmitter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Emitter for FsEmitter {
    fn emit(&mut self, note: &EmittedNote<'_>) -> zettel_core::Result<()> {
        let path = self.root.join(note.resolved.relative_file());
        let emit_error = |reason: String| MigrateError::Emit {
            path: path.clone(),
            reason,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| emit_error(e.to_string()))?;
        }
        let contents =
            render_note(note.metadata, note.body).map_err(|e| emit_error(e.to_string()))?;
        fs::write(&path, contents).map_err(|e| emit_error(e.to_string()))?;

        tracing::debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Writes nothing; logs each planned move and optionally prints body diffs.
pub struct DryRunEmitter {
    show_diff: bool,
}

impl DryRunEmitter {
    pub fn new(show_diff: bool) -> Self {
        Self { show_diff }
    }
}

impl Emitter for DryRunEmitter {
    fn emit(&mut self, note: &EmittedNote<'_>) -> zettel_core::Result<()> {
        tracing::info!("{} -> {}.md", note.identifier, note.resolved.full_path);
        if self.show_diff {
            if let Some(diff) = body_diff(note) {
                println!("{}", diff);
            }
        }
        Ok(())
    }
}

/// Unified diff of a note's body, or `None` when rewriting changed nothing.
pub fn body_diff(note: &EmittedNote<'_>) -> Option<String> {
    if note.original_body == note.body {
        return None;
    }
    let old_header = format!("{}.md", note.identifier);
    let new_header = format!("{}.md", note.resolved.full_path);
    Some(
        TextDiff::from_lines(note.original_body, note.body)
            .unified_diff()
            .header(&old_header, &new_header)
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zettel_core::{Metadata, ResolvedPath};

    /// Build metadata through the note parser.
    fn metadata(yaml: &str) -> Metadata {
        zettel_core::Note::parse("m", &format!("---\n{}---\n", yaml))
            .unwrap()
            .metadata
    }

    fn emitted<'a>(
        resolved: &'a ResolvedPath,
        metadata: &'a Metadata,
        original: &'a str,
        body: &'a str,
    ) -> EmittedNote<'a> {
        EmittedNote {
            identifier: "202001011200",
            resolved,
            metadata,
            original_body: original,
            body,
        }
    }

    #[test]
    fn writes_nested_file_with_header() {
        let dir = TempDir::new().unwrap();
        let resolved = ResolvedPath::new(vec!["career".into(), "eab".into()], "Oncall".into());
        let meta = metadata("title: Oncall\n");

        FsEmitter::new(dir.path())
            .emit(&emitted(&resolved, &meta, "old", "new body\n"))
            .unwrap();

        let written = fs::read_to_string(dir.path().join("career/eab/Oncall.md")).unwrap();
        assert_eq!(written, "---\ntitle: Oncall\n---\nnew body\n");
    }

    #[test]
    fn career_tag_with_parent_segments_stays_inside_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("out");
        let note = zettel_core::Note::parse(
            "202001011200",
            "---\ntitle: Escaped\ntags: [\"#career/../../pwn\"]\n---\nbody\n",
        )
        .unwrap();
        let resolved =
            zettel_core::path_resolver::resolve_path(&note, &zettel_core::DateOptions::default())
                .unwrap();

        FsEmitter::new(&root)
            .emit(&emitted(&resolved, &note.metadata, "body\n", "body\n"))
            .unwrap();

        assert!(root.join("career/pwn/Escaped.md").exists());
        assert!(!dir.path().join("pwn").exists());
    }

    #[test]
    fn last_writer_wins() {
        let dir = TempDir::new().unwrap();
        let resolved = ResolvedPath::new(Vec::new(), "Same".into());
        let meta = Metadata::new();
        let mut emitter = FsEmitter::new(dir.path());

        emitter.emit(&emitted(&resolved, &meta, "", "first")).unwrap();
        emitter.emit(&emitted(&resolved, &meta, "", "second")).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("Same.md")).unwrap(), "second");
    }

    #[test]
    fn reset_destination_clears_previous_output() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("out");
        fs::create_dir_all(root.join("stale")).unwrap();
        fs::write(root.join("stale/old.md"), "x").unwrap();

        reset_destination(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }

    #[test]
    fn body_diff_only_when_changed() {
        let resolved = ResolvedPath::new(vec!["links".into()], "Essay".into());
        let meta = Metadata::new();

        assert!(body_diff(&emitted(&resolved, &meta, "same\n", "same\n")).is_none());

        let diff = body_diff(&emitted(&resolved, &meta, "see [[2020]]\n", "see [[Essay]]\n")).unwrap();
        assert!(diff.contains("--- 202001011200.md"));
        assert!(diff.contains("+++ links/Essay.md"));
        assert!(diff.contains("-see [[2020]]"));
        assert!(diff.contains("+see [[Essay]]"));
    }
}
