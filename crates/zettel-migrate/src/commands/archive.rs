use anyhow::{Context, Result};
use clap::Args;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use zettel_core::ScriptureTable;

use crate::emitter::reset_destination;

static CHAPTER_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-(\d+)").unwrap()
});

static VERSE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(###### \d+) ").unwrap()
});

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    /// Per-book chapter export: `{source}/{Book}/{Book}-{n}.md`
    #[arg(long)]
    pub source: PathBuf,

    /// Archive output directory; cleared at the start of every run
    #[arg(long)]
    pub destination: PathBuf,

    /// Folder prefix the archive is linked under from migrated notes
    #[arg(long)]
    pub archive_root: Option<String>,
}

/// Counts from one archive reflow.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub books: usize,
    pub chapters: usize,
}

/// Chapter number of a chapter file name: `Genesis-12.md` → `Some(12)`.
pub fn chapter_number(filename: &str) -> Option<u32> {
    CHAPTER_NUMBER_RE
        .captures(filename)
        .and_then(|cap| cap[1].parse().ok())
}

/// Put every `###### N` verse heading on its own line between blank lines.
pub fn reflow_verses(content: &str) -> String {
    VERSE_HEADING_RE
        .replace_all(content, "\n\n$1\n\n")
        .into_owned()
}

/// Chapter page: a heading linking back to the book page, then the text.
pub fn chapter_page(content: &str, root: &str, group: &str, book: &str, number: u32) -> String {
    format!(
        "# [[{}/{}/{}|{} {}]]\n{}",
        root,
        group,
        book,
        book,
        number,
        reflow_verses(content)
    )
}

/// Book page: title, a start link, and the chapter list in numeric order.
pub fn book_page(book: &str, chapters: &[(u32, String)]) -> String {
    let list: Vec<String> = chapters
        .iter()
        .map(|(number, stem)| format!("- [[{}|{}]]", stem, number))
        .collect();
    format!(
        "# {}\n\n[[{}-1|Start Reading →]]\n\n{}\n\nlinks: [[The Bible]]",
        book,
        book,
        list.join("\n")
    )
}

/// Execute the `archive` command: reflow a chapter export into grouped
/// archive folders that scripture references point at.
pub fn execute(
    source: &Path,
    destination: &Path,
    archive_root: &str,
    table: &ScriptureTable,
) -> Result<ArchiveSummary> {
    let root = archive_root.trim_matches('/');
    let mut summary = ArchiveSummary::default();

    let mut books: Vec<PathBuf> = fs::read_dir(source)
        .with_context(|| format!("failed to read archive source {}", source.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    books.sort();

    reset_destination(destination)?;

    for book_dir in &books {
        let Some(book) = book_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let group = match table.group_for(book) {
            Some(group) => group,
            None => {
                tracing::warn!("{} is not in the scripture table, archiving under its own name", book);
                book
            }
        };

        let chapters = chapter_files(book_dir)?;
        let out_dir = destination.join(group);
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;

        for (number, stem) in &chapters {
            let path = book_dir.join(format!("{}.md", stem));
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let page = chapter_page(&content, root, group, book, *number);
            write_page(&out_dir.join(format!("{}.md", stem)), &page)?;
            summary.chapters += 1;
        }

        let index_path = out_dir.join(format!("{}.md", book));
        write_page(&index_path, &book_page(book, &chapters))?;
        summary.books += 1;
        tracing::debug!("archived {} ({} chapters) under {}", book, chapters.len(), group);
    }

    tracing::info!(
        "archived {} books, {} chapters into {}",
        summary.books,
        summary.chapters,
        destination.display()
    );
    Ok(summary)
}

/// `(chapter number, file stem)` of every chapter file in a book folder,
/// sorted numerically.
fn chapter_files(book_dir: &Path) -> Result<Vec<(u32, String)>> {
    let mut chapters = Vec::new();
    for entry in fs::read_dir(book_dir)
        .with_context(|| format!("failed to read {}", book_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(number) = chapter_number(stem) {
            chapters.push((number, stem.to_string()));
        }
    }
    chapters.sort();
    Ok(chapters)
}

fn write_page(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn chapter_number_from_filename() {
        assert_eq!(chapter_number("Genesis-12"), Some(12));
        assert_eq!(chapter_number("1 John-3.md"), Some(3));
        assert_eq!(chapter_number("Genesis"), None);
    }

    #[test]
    fn verse_headings_get_their_own_lines() {
        let out = reflow_verses("###### 1 In the beginning ###### 2 The earth");
        assert_eq!(out, "\n\n###### 1\n\nIn the beginning \n\n###### 2\n\nThe earth");
    }

    #[test]
    fn book_page_lists_chapters() {
        let page = book_page("Ruth", &[(1, "Ruth-1".into()), (2, "Ruth-2".into())]);
        assert_eq!(
            page,
            "# Ruth\n\n[[Ruth-1|Start Reading →]]\n\n- [[Ruth-1|1]]\n- [[Ruth-2|2]]\n\nlinks: [[The Bible]]"
        );
    }

    #[test]
    fn reflows_export_into_grouped_archive() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let genesis = source.path().join("Genesis");
        fs::create_dir(&genesis).unwrap();
        fs::write(genesis.join("Genesis.md"), "placeholder").unwrap();
        fs::write(genesis.join("Genesis-2.md"), "###### 1 Thus the heavens").unwrap();
        fs::write(genesis.join("Genesis-10.md"), "###### 1 These are").unwrap();
        fs::write(genesis.join("Genesis-1.md"), "###### 1 In the beginning").unwrap();

        let summary = execute(source.path(), dest.path(), "archive", ScriptureTable::standard()).unwrap();
        assert_eq!(summary, ArchiveSummary { books: 1, chapters: 3 });

        let chapter = fs::read_to_string(dest.path().join("pentateuch/Genesis-1.md")).unwrap();
        assert!(chapter.starts_with("# [[archive/pentateuch/Genesis|Genesis 1]]\n"));
        assert!(chapter.contains("\n\n###### 1\n\nIn the beginning"));

        let book = fs::read_to_string(dest.path().join("pentateuch/Genesis.md")).unwrap();
        assert!(book.contains("- [[Genesis-1|1]]\n- [[Genesis-2|2]]\n- [[Genesis-10|10]]"));
    }

    #[test]
    fn unknown_book_uses_its_own_folder() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let tobit = source.path().join("Tobit");
        fs::create_dir(&tobit).unwrap();
        fs::write(tobit.join("Tobit-1.md"), "text").unwrap();

        execute(source.path(), dest.path(), "archive", ScriptureTable::standard()).unwrap();
        assert!(dest.path().join("Tobit/Tobit-1.md").exists());
        assert!(dest.path().join("Tobit/Tobit.md").exists());
    }
}
