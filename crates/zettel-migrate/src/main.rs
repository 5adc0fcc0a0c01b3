mod commands;
mod config;
mod emitter;
mod loader;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zettel_core::ScriptureTable;

use commands::archive::ArchiveArgs;
use commands::migrate::MigrateArgs;
use config::{FileConfig, MigrateSettings};

#[derive(Debug, Parser)]
#[command(
    name = "zk-migrate",
    version,
    about = "Migrate a zettelkasten export into a categorized vault"
)]
struct Cli {
    /// Config file; defaults to ./zk-migrate.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify, relink and annotate every note, then write the vault.
    Migrate(MigrateArgs),
    /// Reflow a per-chapter scripture export into the archive layout.
    Archive(ArchiveArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = FileConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Migrate(args) => {
            let settings = MigrateSettings::resolve(&file, &args)?;
            let report = commands::migrate::execute(&settings)?;
            print!("{}", commands::migrate::format_summary(&report, settings.dry_run));
        }
        Command::Archive(args) => {
            let root = file.archive_root(args.archive_root.as_deref());
            let summary = commands::archive::execute(
                &args.source,
                &args.destination,
                &root,
                ScriptureTable::standard(),
            )?;
            println!(
                "Archived {} books ({} chapters) into {}",
                summary.books,
                summary.chapters,
                args.destination.display()
            );
        }
    }

    Ok(())
}
