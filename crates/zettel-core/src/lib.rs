//! Sans-IO core of the zettelkasten migration.
//!
//! Notes are classified into folders, renamed from their metadata, relinked
//! against the whole corpus and annotated with scripture archive references.
//! Reading sources and writing the output tree is left to an [`Emitter`].

pub mod annotator;
pub mod classifier;
pub mod corpus_index;
pub mod dates;
pub mod error;
pub mod frontmatter;
pub mod link_rewriter;
pub mod migrate;
pub mod note;
pub mod path_resolver;
pub mod scripture;
pub mod wikilinks;

pub use corpus_index::{CorpusIndex, DuplicateDestination, IndexEntry};
pub use dates::DateOptions;
pub use error::{MigrateError, Result};
pub use frontmatter::{render_note, Metadata};
pub use migrate::{migrate, EmittedNote, Emitter, MigrateOptions, MigrationReport};
pub use note::Note;
pub use path_resolver::ResolvedPath;
pub use scripture::{ScriptureBook, ScriptureTable};
