//! Inventory Normalizer and Requirement Extractor
//!
//! Both sides produce a `Multiset` over the same canonical `PieceKey`, so the
//! rest of the engine never looks at raw records.

use tracing::debug;

use super::multiset::{ColorCode, MultisetBuilder, PieceKey};
use super::{Collector, SetSpec};
use crate::catalogue::records::{CollectionPiece, SetFull, SetPiece, UserFull};
use crate::engine::Multiset;
use crate::error::CatalogueError;

/// Fold a collection into a canonical inventory.
///
/// Repeated (piece, colour) variants accumulate. Fails on the first colour
/// that is not a numeric code.
pub fn normalize_inventory(collection: &[CollectionPiece]) -> Result<Multiset, CatalogueError> {
    let mut builder = MultisetBuilder::new();
    for piece in collection {
        for variant in &piece.variants {
            let color = ColorCode::parse(&variant.color)?;
            builder.add(PieceKey::new(piece.piece_id.clone(), color), variant.count);
        }
    }
    Ok(builder.build())
}

/// Fold a set's piece list into a requirement multiset.
///
/// Returns the set's display name alongside the multiset.
pub fn extract_requirements(pieces: &[SetPiece], name: &str) -> (Multiset, String) {
    let mut builder = MultisetBuilder::new();
    for item in pieces {
        let key = PieceKey::new(item.part.design_id.clone(), ColorCode::from_code(item.part.material));
        builder.add(key, item.quantity);
    }
    (builder.build(), name.to_string())
}

impl Collector {
    /// Build a collector from a full user record
    pub fn from_record(record: &UserFull) -> Result<Self, CatalogueError> {
        let inventory = normalize_inventory(&record.collection)?;
        let collector = Self {
            id: record.id.clone(),
            username: record.username.clone(),
            location: record.location.clone(),
            brick_count: record.brick_count,
            inventory,
        };
        if !collector.brick_count_consistent() {
            debug!(
                "Collector {} reports {} bricks but holds {}",
                collector.username,
                collector.brick_count,
                collector.recomputed_total()
            );
        }
        Ok(collector)
    }
}

impl SetSpec {
    /// Build a set specification from a full set record
    pub fn from_record(record: &SetFull) -> Self {
        let (requirements, name) = extract_requirements(&record.pieces, &record.name);
        Self {
            id: record.id.clone(),
            name,
            set_number: record.set_number.clone(),
            total_pieces: record.total_pieces,
            requirements,
        }
    }
}
