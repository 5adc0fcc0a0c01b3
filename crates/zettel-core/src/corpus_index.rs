use serde::Serialize;
use std::collections::HashMap;

use crate::dates::DateOptions;
use crate::error::{MigrateError, Result};
use crate::note::Note;
use crate::path_resolver::{resolve_path, ResolvedPath};

/// A note together with the destination decided for it.
#[derive(Clone, Debug)]
pub struct IndexEntry {
    pub note: Note,
    pub resolved: ResolvedPath,
}

/// Two notes that resolved to the same destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateDestination {
    pub path: String,
    /// Identifier of the note that claimed the path first.
    pub first: String,
    /// Identifier of the note that will overwrite it.
    pub second: String,
}

impl From<&DuplicateDestination> for MigrateError {
    fn from(dup: &DuplicateDestination) -> Self {
        MigrateError::DuplicateDestination {
            path: dup.path.clone(),
            first: dup.first.clone(),
            second: dup.second.clone(),
        }
    }
}

/// Whole-corpus mapping from original identifier to note and resolved path.
///
/// Built once before any body is rewritten and never mutated afterwards.
/// Iteration follows input order.
pub struct CorpusIndex {
    entries: Vec<IndexEntry>,
    /// identifier -> position in `entries`
    by_identifier: HashMap<String, usize>,
    /// lowercased full path -> position of the last note claiming it
    by_path: HashMap<String, usize>,
    /// lowercased filename -> count of notes using it
    filenames: HashMap<String, usize>,
    duplicates: Vec<DuplicateDestination>,
}

impl CorpusIndex {
    /// Resolve every note's path, in input order.
    ///
    /// Fails on the first note whose path cannot be resolved, or when two
    /// notes share an identifier. Destinations that collide (compared
    /// case-insensitively) are recorded and logged, and the later note wins.
    pub fn build(notes: Vec<Note>, dates: &DateOptions) -> Result<Self> {
        let mut index = Self {
            entries: Vec::with_capacity(notes.len()),
            by_identifier: HashMap::with_capacity(notes.len()),
            by_path: HashMap::with_capacity(notes.len()),
            filenames: HashMap::new(),
            duplicates: Vec::new(),
        };

        for note in notes {
            if index.by_identifier.contains_key(&note.identifier) {
                return Err(MigrateError::DuplicateIdentifier {
                    identifier: note.identifier,
                });
            }

            let resolved = resolve_path(&note, dates)?;
            tracing::debug!("{} -> {}", note.identifier, resolved.full_path);

            let position = index.entries.len();
            let path_key = resolved.full_path.to_lowercase();
            if let Some(&previous) = index.by_path.get(&path_key) {
                let dup = DuplicateDestination {
                    path: resolved.full_path.clone(),
                    first: index.entries[previous].note.identifier.clone(),
                    second: note.identifier.clone(),
                };
                tracing::warn!(
                    "duplicate destination {}: {} will be overwritten by {}",
                    dup.path,
                    dup.first,
                    dup.second
                );
                index.duplicates.push(dup);
            }

            index.by_path.insert(path_key, position);
            *index
                .filenames
                .entry(resolved.filename.to_lowercase())
                .or_insert(0) += 1;
            index.by_identifier.insert(note.identifier.clone(), position);
            index.entries.push(IndexEntry { note, resolved });
        }

        Ok(index)
    }

    pub fn get(&self, identifier: &str) -> Option<&IndexEntry> {
        self.by_identifier.get(identifier).map(|&i| &self.entries[i])
    }

    /// Whether a wikilink target names an emitted note, either by full path
    /// or by bare filename. Case-insensitive.
    pub fn resolves(&self, target: &str) -> bool {
        let lower = target.to_lowercase();
        self.by_path.contains_key(&lower) || self.filenames.contains_key(&lower)
    }

    /// Entries in input order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicates(&self) -> &[DuplicateDestination] {
        &self.duplicates
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // === Test Helpers ===

    fn note(identifier: &str, yaml: &str) -> Note {
        Note::parse(identifier, &format!("---\n{}---\nbody\n", yaml)).unwrap()
    }

    fn build(notes: Vec<Note>) -> CorpusIndex {
        CorpusIndex::build(notes, &DateOptions::default()).expect("index should build")
    }

    // === build tests ===

    #[test]
    fn build_resolves_every_note_in_input_order() {
        let index = build(vec![
            note("b-note", "title: Beta\n"),
            note("a-note", "title: Alpha\ntags: [\"#links\"]\n"),
        ]);

        assert_eq!(index.len(), 2);
        let order: Vec<&str> = index.iter().map(|e| e.note.identifier.as_str()).collect();
        assert_eq!(order, vec!["b-note", "a-note"]);
        assert_eq!(index.get("b-note").unwrap().resolved.full_path, "Beta");
        assert_eq!(index.get("a-note").unwrap().resolved.full_path, "links/Alpha");
    }

    #[test]
    fn unknown_identifier_is_none() {
        let index = build(vec![note("a", "title: A\n")]);
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn duplicate_identifier_is_an_error() {
        let result = CorpusIndex::build(
            vec![note("same", "title: One\n"), note("same", "title: Two\n")],
            &DateOptions::default(),
        );
        assert!(matches!(
            result,
            Err(MigrateError::DuplicateIdentifier { ref identifier }) if identifier == "same"
        ));
    }

    #[test]
    fn duplicate_destination_is_recorded_not_fatal() {
        let index = build(vec![
            note("first", "title: Grace\n"),
            note("second", "title: grace\n"),
            note("third", "title: Other\n"),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.duplicates(),
            &[DuplicateDestination {
                path: "grace".to_string(),
                first: "first".to_string(),
                second: "second".to_string(),
            }]
        );
    }

    #[test]
    fn unresolvable_journal_aborts_build() {
        let result = CorpusIndex::build(
            vec![
                note("ok", "title: Fine\n"),
                note("bad", "title: Someday\ntags: [\"#journal\"]\n"),
            ],
            &DateOptions::default(),
        );
        assert!(matches!(result, Err(MigrateError::UnresolvableDate { .. })));
    }

    // === resolves tests ===

    #[test]
    fn resolves_full_paths_and_bare_filenames() {
        let index = build(vec![note("x", "title: Alpha\ntags: [\"#career/eab\"]\n")]);
        assert!(index.resolves("career/eab/Alpha"));
        assert!(index.resolves("alpha"));
        assert!(!index.resolves("career/Alpha"));
    }
}
