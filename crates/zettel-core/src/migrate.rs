use serde::Serialize;

use crate::annotator::annotate_counted;
use crate::corpus_index::{CorpusIndex, DuplicateDestination, IndexEntry};
use crate::dates::DateOptions;
use crate::error::{MigrateError, Result};
use crate::frontmatter::Metadata;
use crate::link_rewriter::rewrite_links_counted;
use crate::note::Note;
use crate::path_resolver::ResolvedPath;
use crate::scripture::ScriptureTable;
use crate::wikilinks::extract_wikilinks;

/// A fully transformed note, ready to be written.
#[derive(Debug)]
pub struct EmittedNote<'a> {
    pub identifier: &'a str,
    pub resolved: &'a ResolvedPath,
    pub metadata: &'a Metadata,
    /// Body as read from the source, before any rewriting.
    pub original_body: &'a str,
    pub body: &'a str,
}

/// Sink for transformed notes.
///
/// Implementations must create missing folders and let the last writer for a
/// path win.
pub trait Emitter {
    fn emit(&mut self, note: &EmittedNote<'_>) -> Result<()>;
}

/// Engine settings.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Folder prefix of archive references, e.g. `archive`.
    pub archive_root: String,
    pub dates: DateOptions,
    /// Treat duplicate destinations as fatal.
    pub strict: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            archive_root: "archive".to_string(),
            dates: DateOptions::default(),
            strict: false,
        }
    }
}

/// A note's move from its source identifier to its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: String,
    pub to: String,
}

/// A wikilink in migrated output that points at nothing known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingLink {
    /// Resolved path of the note containing the link.
    pub source: String,
    pub target: String,
}

/// Summary of one run.
#[derive(Debug, Default, Serialize)]
pub struct MigrationReport {
    pub notes_migrated: usize,
    pub links_rewritten: usize,
    pub scripture_references: usize,
    pub duplicates: Vec<DuplicateDestination>,
    pub dangling_links: Vec<DanglingLink>,
    pub moves: Vec<Move>,
}

/// Rewritten body of one note plus counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedBody {
    pub body: String,
    pub links_rewritten: usize,
    pub scripture_references: usize,
}

/// Relink then annotate one indexed note. Pure with respect to the index.
pub fn transform_body(
    entry: &IndexEntry,
    index: &CorpusIndex,
    table: &ScriptureTable,
    archive_root: &str,
) -> TransformedBody {
    let relinked = rewrite_links_counted(&entry.note.body, index);
    let annotated = annotate_counted(&relinked.body, table, archive_root);
    TransformedBody {
        body: annotated.body,
        links_rewritten: relinked.substitutions,
        scripture_references: annotated.references,
    }
}

/// Run the migration over a whole corpus.
///
/// Phase 1 builds the complete [`CorpusIndex`]; any fatal per-note error
/// stops the run before anything is emitted. Phase 2 transforms each note
/// in input order and hands it to `emitter`; the first emit failure stops
/// the run.
pub fn migrate(
    notes: Vec<Note>,
    table: &ScriptureTable,
    options: &MigrateOptions,
    emitter: &mut dyn Emitter,
) -> Result<MigrationReport> {
    tracing::info!("phase 1: indexing {} notes", notes.len());
    let index = CorpusIndex::build(notes, &options.dates)?;

    if options.strict {
        if let Some(dup) = index.duplicates().first() {
            return Err(MigrateError::from(dup));
        }
    }

    tracing::info!("phase 2: rewriting {} notes", index.len());
    let mut report = MigrationReport {
        duplicates: index.duplicates().to_vec(),
        ..Default::default()
    };

    for entry in index.iter() {
        let transformed = transform_body(entry, &index, table, &options.archive_root);

        report.dangling_links.extend(dangling_links(
            &transformed.body,
            &entry.resolved.full_path,
            &index,
            &options.archive_root,
        ));

        emitter.emit(&EmittedNote {
            identifier: &entry.note.identifier,
            resolved: &entry.resolved,
            metadata: &entry.note.metadata,
            original_body: &entry.note.body,
            body: &transformed.body,
        })?;

        report.notes_migrated += 1;
        report.links_rewritten += transformed.links_rewritten;
        report.scripture_references += transformed.scripture_references;
        report.moves.push(Move {
            from: entry.note.identifier.clone(),
            to: entry.resolved.full_path.clone(),
        });
    }

    if !report.dangling_links.is_empty() {
        tracing::warn!("{} wikilinks point at no migrated note", report.dangling_links.len());
    }
    tracing::info!(
        "migrated {} notes: {} links rewritten, {} scripture references",
        report.notes_migrated,
        report.links_rewritten,
        report.scripture_references
    );

    Ok(report)
}

/// Wikilinks in `body` that resolve neither to a migrated note nor into the archive.
fn dangling_links(
    body: &str,
    source: &str,
    index: &CorpusIndex,
    archive_root: &str,
) -> Vec<DanglingLink> {
    let archive_prefix = format!("{}/", archive_root.trim_matches('/'));
    extract_wikilinks(body)
        .into_iter()
        .filter(|target| !target.starts_with(&archive_prefix) && !index.resolves(target))
        .map(|target| {
            tracing::debug!("{}: dangling link [[{}]]", source, target);
            DanglingLink {
                source: source.to_string(),
                target,
            }
        })
        .collect()
}
