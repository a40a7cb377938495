//! Sufficiency Checker
//!
//! Key-by-key dominance between an inventory and a requirement multiset.

use super::Multiset;

/// True when `inventory` holds at least the required quantity of every key.
///
/// Keys only present in the inventory are ignored. Stops at the first
/// insufficient key.
pub fn is_sufficient(inventory: &Multiset, requirement: &Multiset) -> bool {
    requirement.iter().all(|(key, needed)| inventory.get(key) >= needed)
}

/// Per-key deficit: `required - min(owned, required)`, zero entries omitted.
pub fn shortfall(inventory: &Multiset, requirement: &Multiset) -> Multiset {
    requirement
        .iter()
        .map(|(key, needed)| (key.clone(), needed.saturating_sub(inventory.get(key))))
        .collect()
}

/// What `inventory` can supply toward `needed`: `min(owned, needed)` per key.
pub fn contribution(inventory: &Multiset, needed: &Multiset) -> Multiset {
    needed
        .iter()
        .map(|(key, qty)| (key.clone(), inventory.get(key).min(qty)))
        .collect()
}
