//! Build Analyzer
//!
//! Partitions a set catalogue into buildable and unbuildable sets for one
//! collector.

use serde::{Deserialize, Serialize};

use super::sufficiency::is_sufficient;
use super::{Collector, SetSpec};

/// One set in a build report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntry {
    pub id: String,
    pub name: String,
    pub set_number: String,
    pub total_pieces: i64,
}

impl From<&SetSpec> for SetEntry {
    fn from(set: &SetSpec) -> Self {
        Self {
            id: set.id.clone(),
            name: set.name.clone(),
            set_number: set.set_number.clone(),
            total_pieces: set.total_pieces,
        }
    }
}

/// Buildability of a whole catalogue for one collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub username: String,
    pub total_pieces: u64,
    pub unique_combinations: usize,
    pub total_sets: usize,
    pub buildable_sets: Vec<SetEntry>,
    pub buildable_count: usize,
    pub unbuildable_sets: Vec<SetEntry>,
    pub unbuildable_count: usize,
}

impl BuildReport {
    pub fn nothing_buildable(&self) -> bool {
        self.buildable_sets.is_empty()
    }
}

/// Classify every set and sort each side by ascending piece count.
///
/// The sort is stable, so sets with equal piece counts keep catalogue order.
pub fn analyze_builds(collector: &Collector, sets: &[SetSpec]) -> BuildReport {
    let (mut buildable, mut unbuildable): (Vec<SetEntry>, Vec<SetEntry>) = (Vec::new(), Vec::new());
    for set in sets {
        if is_sufficient(&collector.inventory, &set.requirements) {
            buildable.push(set.into());
        } else {
            unbuildable.push(set.into());
        }
    }
    buildable.sort_by_key(|s| s.total_pieces);
    unbuildable.sort_by_key(|s| s.total_pieces);

    BuildReport {
        username: collector.username.clone(),
        total_pieces: collector.inventory.total(),
        unique_combinations: collector.inventory.len(),
        total_sets: sets.len(),
        buildable_count: buildable.len(),
        buildable_sets: buildable,
        unbuildable_count: unbuildable.len(),
        unbuildable_sets: unbuildable,
    }
}
