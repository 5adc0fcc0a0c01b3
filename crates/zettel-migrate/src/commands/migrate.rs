use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use zettel_core::{migrate, Emitter, MigrationReport, ScriptureTable};

use crate::config::MigrateSettings;
use crate::emitter::{reset_destination, DryRunEmitter, FsEmitter};
use crate::loader::load_notes;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Directory holding the exported notes
    #[arg(long, env = "ZK_SOURCE")]
    pub source: Option<PathBuf>,

    /// Output vault directory; cleared at the start of every run
    #[arg(long, env = "ZK_DEST")]
    pub destination: Option<PathBuf>,

    /// Folder prefix used for scripture archive references
    #[arg(long)]
    pub archive_root: Option<String>,

    /// Plan the migration without touching the destination
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print a unified diff of every rewritten body
    #[arg(long)]
    pub diff: bool,

    /// Abort when two notes resolve to the same destination
    #[arg(long)]
    pub strict: bool,

    /// Write the run report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Execute the `migrate` command: load, index, rewrite and emit the corpus.
pub fn execute(settings: &MigrateSettings) -> Result<MigrationReport> {
    let notes = load_notes(&settings.source, &settings.exclude)?;

    let mut emitter: Box<dyn Emitter> = if settings.dry_run {
        Box::new(DryRunEmitter::new(settings.diff))
    } else {
        reset_destination(&settings.destination)?;
        Box::new(FsEmitter::new(&settings.destination))
    };

    let report = migrate(
        notes,
        ScriptureTable::standard(),
        &settings.options,
        emitter.as_mut(),
    )
    .context("migration aborted")?;

    if let Some(path) = &settings.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    Ok(report)
}

/// Human-readable run summary.
pub fn format_summary(report: &MigrationReport, dry_run: bool) -> String {
    let mut output = String::new();
    let verb = if dry_run { "Would migrate" } else { "Migrated" };
    output.push_str(&format!(
        "{} {} notes ({} links rewritten, {} scripture references)\n",
        verb.green().bold(),
        report.notes_migrated,
        report.links_rewritten,
        report.scripture_references,
    ));

    if !report.duplicates.is_empty() {
        output.push_str(&format!("\n{}\n", "Duplicate destinations (last writer wins):".yellow().bold()));
        for dup in &report.duplicates {
            output.push_str(&format!("- {}: {} overwritten by {}\n", dup.path, dup.first, dup.second));
        }
    }

    if !report.dangling_links.is_empty() {
        output.push_str(&format!("\n{}\n", "Dangling links:".yellow().bold()));
        for link in &report.dangling_links {
            output.push_str(&format!("- {} -> [[{}]]\n", link.source, link.target));
        }
    }

    output
}
