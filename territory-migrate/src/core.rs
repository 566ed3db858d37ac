//! File-level migration driver shared by the library API and the CLI.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::document::TargetDocument;
use crate::key::KeyError;
use crate::legacy::LegacyDocument;
use crate::report::MigrationReport;
use crate::transform::{migrate, Migration};

pub const DEFAULT_INPUT: &str = "src/coordinates.json";
pub const DEFAULT_OUTPUT: &str = "new_coordinates.json";

#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in {} at line {line}, column {column}: {source}", .path.display())]
    Json {
        path: PathBuf,
        line: usize,
        column: usize,
        source: serde_json::Error,
    },
    #[error("schema error: missing key `{0}`")]
    MissingKey(String),
    #[error("schema error: `{path}` must be an {expected}")]
    WrongType { path: String, expected: &'static str },
    #[error("schema error: invalid square key `{key}`: {source}")]
    InvalidKey { key: String, source: KeyError },
    #[error("schema error: no entry in `colors` for territory {0}")]
    MissingColor(u32),
    #[error("schema error: territory {number} has no entry in `markers.num` (length {len})")]
    TerritoryOutOfRange { number: u32, len: usize },
    #[error("schema error: no marker list `markers.{0}` for square letter {0}")]
    MissingMarkerPool(char),
    #[error("strict mode: {0}")]
    StrictViolation(String),
    #[error("failed to serialize output: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Options for a migration run.
#[derive(Clone, Debug)]
pub struct MigrationOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Build the document but do not write the output file.
    pub dry_run: bool,
    /// Treat exhausted marker pools and duplicate squares as errors.
    pub strict: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            dry_run: false,
            strict: false,
        }
    }
}

/// Outcome of a file migration.
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub document: TargetDocument,
    pub report: MigrationReport,
    /// Where the document was written; `None` on a dry run.
    pub written: Option<PathBuf>,
}

/// Migration API used by the CLI.
pub struct TerritoryMigrator;

impl TerritoryMigrator {
    /// Migrate a legacy document held in memory.
    pub fn migrate_str(input: &str) -> Result<Migration, MigrateError> {
        let value: Value = serde_json::from_str(input).map_err(|e| MigrateError::Json {
            path: PathBuf::from("<input>"),
            line: e.line(),
            column: e.column(),
            source: e,
        })?;
        Self::migrate_value(value)
    }

    pub fn migrate_value(value: Value) -> Result<Migration, MigrateError> {
        let legacy = LegacyDocument::from_value(value)?;
        migrate(&legacy)
    }

    /// Read, migrate and (unless `dry_run`) atomically write one file.
    pub fn migrate_file(options: &MigrationOptions) -> Result<MigrationOutcome, MigrateError> {
        tracing::info!("Migrating {}", options.input.display());
        let value = read_legacy(&options.input)?;
        let Migration { document, report } = Self::migrate_value(value)?;

        if options.strict {
            check_strict(&report)?;
        }

        let written = if options.dry_run {
            None
        } else {
            let rendered = to_pretty_json(&document)?;
            write_atomic(&options.output, rendered.as_bytes())?;
            Some(options.output.clone())
        };

        tracing::info!(
            "Migrated {} territories and {} squares{}",
            report.territories,
            report.squares,
            match &written {
                Some(path) => format!(" into {}", path.display()),
                None => String::new(),
            }
        );

        Ok(MigrationOutcome {
            document,
            report,
            written,
        })
    }
}

/// Pretty-print the target document with two-space indentation and a
/// trailing newline.
pub fn to_pretty_json(document: &TargetDocument) -> Result<String, MigrateError> {
    let mut rendered = serde_json::to_string_pretty(document).map_err(MigrateError::Serialize)?;
    rendered.push('\n');
    Ok(rendered)
}

fn read_legacy(path: &Path) -> Result<Value, MigrateError> {
    let text = std::fs::read_to_string(path).map_err(|source| MigrateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| MigrateError::Json {
        path: path.to_path_buf(),
        line: e.line(),
        column: e.column(),
        source: e,
    })
}

fn check_strict(report: &MigrationReport) -> Result<(), MigrateError> {
    if !report.duplicates.is_empty() {
        return Err(MigrateError::StrictViolation(format!(
            "duplicate square keys: {}",
            report.duplicates.join(", ")
        )));
    }
    let exhausted = report.exhausted_letters();
    if !exhausted.is_empty() {
        let letters: Vec<String> = exhausted.iter().map(|l| l.to_string()).collect();
        return Err(MigrateError::StrictViolation(format!(
            "marker pools exhausted for letters: {}",
            letters.join(", ")
        )));
    }
    Ok(())
}

/// Write `bytes` to a temporary file next to `path`, then rename it into
/// place. `path` is left untouched if anything fails.
///
/// A replaced file keeps its permissions; a new file gets the same mode a
/// plain create would (0o666 less the umask).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), MigrateError> {
    let write_err = |source: std::io::Error| MigrateError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Passed to open(2), so the umask still applies.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
