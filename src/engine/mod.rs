//! Matching Engine
//!
//! Pure, synchronous building blocks: canonical multisets, sufficiency
//! checks, build/gap analysis and the bounded collaboration search.
//! Nothing in here performs I/O.

pub mod multiset;
pub mod normalize;
pub mod sufficiency;
pub mod build;
pub mod gap;
pub mod collaboration;

pub use multiset::{ColorCode, Multiset, MultisetBuilder, PieceKey};
pub use normalize::{extract_requirements, normalize_inventory};
pub use sufficiency::{contribution, is_sufficient, shortfall};
pub use build::{analyze_builds, BuildReport, SetEntry};
pub use gap::{analyze_gap, GapReport, GapRow};
pub use collaboration::{
    search_collaborations, CandidateOutcome, CandidatePool, CollaborationPlan, CollaborationReport,
    CollaborationStatus, ContributedPiece, Contributor, SearchLimits,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalogue::records::{ColorRecord, SetSummary};

/// A collector and their canonical inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collector {
    pub id: String,
    pub username: String,
    pub location: String,
    /// Brick count as reported by the data source
    pub brick_count: i64,
    pub inventory: Multiset,
}

impl Collector {
    /// Total pieces actually held in the inventory
    pub fn recomputed_total(&self) -> u64 {
        self.inventory.total()
    }

    pub fn brick_count_consistent(&self) -> bool {
        u64::try_from(self.brick_count).is_ok_and(|count| count == self.recomputed_total())
    }
}

/// A set and its requirement multiset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSpec {
    pub id: String,
    pub name: String,
    pub set_number: String,
    pub total_pieces: i64,
    pub requirements: Multiset,
}

impl SetSpec {
    pub fn summary(&self) -> SetSummary {
        SetSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            set_number: self.set_number.clone(),
            total_pieces: self.total_pieces,
        }
    }
}

/// Colour code to display name lookup.
///
/// Missing entries resolve to `None`, never to an error.
#[derive(Debug, Clone, Default)]
pub struct ColorPalette {
    names: HashMap<ColorCode, String>,
}

impl ColorPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[ColorRecord]) -> Self {
        let names = records
            .iter()
            .map(|c| (ColorCode::from_code(c.code), c.name.clone()))
            .collect();
        Self { names }
    }

    pub fn name_of(&self, color: &ColorCode) -> Option<String> {
        self.names.get(color).cloned()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup_degrades_to_none() {
        let palette = ColorPalette::from_records(&[ColorRecord {
            name: "Bright Red".to_string(),
            code: 21,
        }]);
        assert_eq!(palette.name_of(&ColorCode::from_code(21)).as_deref(), Some("Bright Red"));
        assert_eq!(palette.name_of(&ColorCode::from_code(22)), None);
    }

    #[test]
    fn test_brick_count_consistency() {
        let inventory: Multiset = vec![(PieceKey::new("A", ColorCode::from_code(1)), 4)].into_iter().collect();
        let mut collector = Collector {
            id: "u-1".to_string(),
            username: "a".to_string(),
            location: "x".to_string(),
            brick_count: 4,
            inventory,
        };
        assert!(collector.brick_count_consistent());
        collector.brick_count = -1;
        assert!(!collector.brick_count_consistent());
    }
}
