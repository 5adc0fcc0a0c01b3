use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use zettel_core::{DateOptions, MigrateOptions};

use crate::commands::migrate::MigrateArgs;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "zk-migrate.toml";

pub const DEFAULT_ARCHIVE_ROOT: &str = "archive";

/// Contents of `zk-migrate.toml`. Every field is optional; CLI flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub archive_root: Option<String>,
    pub skip_date_literals: Option<Vec<String>>,
    /// Glob patterns matched against source filenames.
    pub exclude: Vec<String>,
}

impl FileConfig {
    /// Load an explicit config file, or the default one if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        tracing::debug!("loading config from {}", path.display());
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn archive_root(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.archive_root.clone())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_ROOT.to_string())
    }
}

/// Fully merged settings for one `migrate` run.
#[derive(Debug, Clone)]
pub struct MigrateSettings {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub exclude: Vec<String>,
    pub options: MigrateOptions,
    pub dry_run: bool,
    pub diff: bool,
    pub report: Option<PathBuf>,
}

impl MigrateSettings {
    pub fn resolve(file: &FileConfig, args: &MigrateArgs) -> Result<Self> {
        let Some(source) = args.source.clone().or_else(|| file.source.clone()) else {
            bail!("no source directory: pass --source, set ZK_SOURCE, or add `source` to the config");
        };
        let Some(destination) = args.destination.clone().or_else(|| file.destination.clone())
        else {
            bail!("no destination directory: pass --destination, set ZK_DEST, or add `destination` to the config");
        };
        let source_abs = absolute(&source)?;
        let destination_abs = absolute(&destination)?;
        if source_abs.starts_with(&destination_abs) {
            bail!(
                "destination {} is cleared on every run and must not be or contain the source {}",
                destination.display(),
                source.display()
            );
        }
        if args.diff && !args.dry_run {
            bail!("--diff only applies together with --dry-run");
        }

        let dates = match &file.skip_date_literals {
            Some(literals) => DateOptions {
                skip_literals: literals.clone(),
            },
            None => DateOptions::default(),
        };

        Ok(Self {
            source,
            destination,
            exclude: file.exclude.clone(),
            options: MigrateOptions {
                archive_root: file.archive_root(args.archive_root.as_deref()),
                dates,
                strict: args.strict,
            },
            dry_run: args.dry_run,
            diff: args.diff,
            report: args.report.clone(),
        })
    }
}

/// Canonical form of `path`, or its lexical absolute form when it does not
/// exist yet.
fn absolute(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(canonical) => Ok(canonical),
        Err(_) => std::path::absolute(path)
            .with_context(|| format!("failed to resolve {}", path.display())),
    }
}
