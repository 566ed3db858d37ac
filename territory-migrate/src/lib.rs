//! territory-migrate - legacy territory coordinate document migration
//!
//! Converts the flat legacy document (`territorios`, `colors`, `markers`)
//! into the per-territory schema, where each `terr<N>` record carries its
//! color, its territory marker and one `Square<L>` entry per square.
//!
//! # Quick Start
//!
//! ```no_run
//! use territory_migrate::{MigrationOptions, TerritoryMigrator};
//!
//! let options = MigrationOptions::default();
//! let outcome = TerritoryMigrator::migrate_file(&options).unwrap();
//!
//! println!(
//!     "{} territories, {} squares",
//!     outcome.report.territories, outcome.report.squares
//! );
//! ```
//!
//! Square markers are assigned by position: the n-th square of letter `L`
//! in legacy document order receives `markers.L[n]`, or `null` once that
//! pool runs out.

pub mod core;
pub mod document;
pub mod key;
pub mod legacy;
pub mod markers;
pub mod report;
pub mod transform;

// Re-export main types
pub use crate::core::{
    to_pretty_json, write_atomic, MigrateError, MigrationOptions, MigrationOutcome,
    TerritoryMigrator, DEFAULT_INPUT, DEFAULT_OUTPUT,
};
pub use document::{SquareEntry, TargetDocument, TerritoryRecord};
pub use key::{decompose, KeyError, SquareKey};
pub use legacy::LegacyDocument;
pub use markers::{LetterUsage, MarkerAllocator};
pub use report::MigrationReport;
pub use transform::{migrate, Migration};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        MigrateError, Migration, MigrationOptions, MigrationOutcome, MigrationReport,
        TargetDocument, TerritoryMigrator,
    };
}
