//! Builds the target document from a legacy one in a single ordered pass.

use crate::core::MigrateError;
use crate::document::{SquareEntry, TargetDocument, TerritoryRecord};
use crate::key::decompose;
use crate::legacy::LegacyDocument;
use crate::markers::MarkerAllocator;
use crate::report::MigrationReport;

/// Result of migrating one legacy document.
#[derive(Debug, Clone)]
pub struct Migration {
    pub document: TargetDocument,
    pub report: MigrationReport,
}

/// Migrate `legacy` into the per-territory schema.
///
/// Squares are processed in legacy document order; that order decides which
/// marker each square receives.
pub fn migrate(legacy: &LegacyDocument) -> Result<Migration, MigrateError> {
    let mut document = TargetDocument::new();
    let mut allocator = MarkerAllocator::new();
    let mut duplicates = Vec::new();

    for (raw_key, edges) in legacy.squares() {
        let key = decompose(raw_key).map_err(|source| MigrateError::InvalidKey {
            key: raw_key.to_string(),
            source,
        })?;

        let record = document.get_or_try_insert_with(key.territory, || {
            materialize_territory(legacy, key.territory)
        })?;

        let pool = legacy.marker_pool(key.letter)?;
        let square_marker = allocator
            .allocate(key.letter, pool)
            .map_err(|source| MigrateError::InvalidKey {
                key: raw_key.to_string(),
                source,
            })?;
        if square_marker.is_none() {
            tracing::debug!("{}: markers.{} exhausted, square gets no marker", raw_key, key.letter);
        }

        let entry = SquareEntry {
            edges: edges.clone(),
            square_marker,
        };
        if record.insert_square(key.letter, entry).is_some() {
            tracing::warn!(
                "{} overwrote an earlier {} in {}",
                raw_key,
                key.square_key(),
                key.territory_key()
            );
            duplicates.push(raw_key.to_string());
        }
    }

    let letters = allocator.usage();
    for usage in letters.iter().filter(|u| u.is_exhausted()) {
        tracing::warn!(
            "markers.{} ran out: {} square(s) left without a marker",
            usage.letter,
            usage.null_markers
        );
    }

    let report = MigrationReport {
        territories: document.len(),
        squares: legacy.square_count() - duplicates.len(),
        duplicates,
        letters,
    };

    Ok(Migration { document, report })
}

fn materialize_territory(legacy: &LegacyDocument, number: u32) -> Result<TerritoryRecord, MigrateError> {
    let color = legacy
        .color(number)
        .ok_or(MigrateError::MissingColor(number))?;

    let markers = legacy.territory_markers();
    let terr_marker = (number as usize)
        .checked_sub(1)
        .and_then(|i| markers.get(i))
        .ok_or(MigrateError::TerritoryOutOfRange {
            number,
            len: markers.len(),
        })?;

    Ok(TerritoryRecord::new(color.clone(), terr_marker.clone()))
}
