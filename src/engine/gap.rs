//! Gap Analyzer
//!
//! Per-key comparison of one collector's inventory against one set.

use serde::{Deserialize, Serialize};

use super::multiset::ColorCode;
use super::sufficiency::shortfall;
use super::{ColorPalette, Collector, Multiset, SetSpec};
use crate::catalogue::records::SetSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRow {
    pub piece_id: String,
    pub color_id: ColorCode,
    pub color_name: Option<String>,
    pub needed: u64,
    pub user_has: u64,
    pub missing: u64,
}

impl GapRow {
    pub fn is_satisfied(&self) -> bool {
        self.user_has >= self.needed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    pub set_info: SetSummary,
    pub username: String,
    pub requirements: Vec<GapRow>,
    pub can_build: bool,
    pub missing_piece_types: usize,
    pub total_missing_pieces: u64,
    /// The deficit itself, consumed by collaboration search
    pub shortfall: Multiset,
}

/// Compare `collector` against `set`.
///
/// Rows are ordered insufficient-first, then by piece id; the sort is stable
/// so rows sharing a piece id stay in numeric colour order.
pub fn analyze_gap(collector: &Collector, set: &SetSpec, palette: &ColorPalette) -> GapReport {
    let mut rows: Vec<GapRow> = set
        .requirements
        .iter()
        .map(|(key, needed)| {
            let user_has = collector.inventory.get(key);
            GapRow {
                piece_id: key.piece_id.clone(),
                color_id: key.color.clone(),
                color_name: palette.name_of(&key.color),
                needed,
                user_has,
                missing: needed.saturating_sub(user_has),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.is_satisfied()
            .cmp(&b.is_satisfied())
            .then_with(|| a.piece_id.cmp(&b.piece_id))
    });

    let missing = shortfall(&collector.inventory, &set.requirements);
    GapReport {
        set_info: set.summary(),
        username: collector.username.clone(),
        requirements: rows,
        can_build: missing.is_empty(),
        missing_piece_types: missing.len(),
        total_missing_pieces: missing.total(),
        shortfall: missing,
    }
}
