//! Canonical piece identities and quantity multisets

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CatalogueError;

/// Canonical colour identifier.
///
/// Inventory records carry colours as strings while set requirements carry
/// numeric material ids. Both are folded into the decimal rendering of the
/// numeric code so that `"021"`, `" 21"` and `21` compare equal.
/// Ordering is numeric: `9` sorts before `10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorCode(String);

impl ColorCode {
    pub fn from_code(code: u32) -> Self {
        Self(code.to_string())
    }

    /// Parse a textual colour identifier. Anything other than a
    /// non-negative integer is rejected.
    pub fn parse(raw: &str) -> Result<Self, CatalogueError> {
        raw.trim()
            .parse::<u32>()
            .map(Self::from_code)
            .map_err(|_| CatalogueError::InvalidColor { raw: raw.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for ColorCode {
    fn cmp(&self, other: &Self) -> Ordering {
        // canonical decimal has no leading zeros, so shorter means smaller
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ColorCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// (piece-type, colour) identity used for all matching
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceKey {
    pub piece_id: String,
    pub color: ColorCode,
}

impl PieceKey {
    pub fn new(piece_id: impl Into<String>, color: ColorCode) -> Self {
        Self {
            piece_id: piece_id.into(),
            color,
        }
    }
}

impl fmt::Display for PieceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.piece_id, self.color)
    }
}

/// Mapping from `PieceKey` to a strictly positive quantity.
///
/// Absent keys count as zero. Built once through [`MultisetBuilder`] or
/// `FromIterator` and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<(PieceKey, u64)>", from = "Vec<(PieceKey, u64)>")]
pub struct Multiset {
    entries: BTreeMap<PieceKey, u64>,
}

impl Multiset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PieceKey) -> u64 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys (all of which have positive quantity)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities
    pub fn total(&self) -> u64 {
        self.entries.values().sum()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&PieceKey, u64)> {
        self.entries.iter().map(|(k, &q)| (k, q))
    }

    pub fn keys(&self) -> impl Iterator<Item = &PieceKey> {
        self.entries.keys()
    }
}

impl FromIterator<(PieceKey, u64)> for Multiset {
    fn from_iter<I: IntoIterator<Item = (PieceKey, u64)>>(iter: I) -> Self {
        let mut builder = MultisetBuilder::new();
        for (key, qty) in iter {
            builder.add(key, i64::try_from(qty).unwrap_or(i64::MAX));
        }
        builder.build()
    }
}

impl From<Multiset> for Vec<(PieceKey, u64)> {
    fn from(set: Multiset) -> Self {
        set.entries.into_iter().collect()
    }
}

impl From<Vec<(PieceKey, u64)>> for Multiset {
    fn from(entries: Vec<(PieceKey, u64)>) -> Self {
        entries.into_iter().collect()
    }
}

/// Single-owner accumulator for a `Multiset`.
///
/// Quantities accumulate as signed values so that negative records are
/// passed through arithmetically; keys whose total ends up `<= 0` are
/// dropped by [`MultisetBuilder::build`].
#[derive(Debug, Default)]
pub struct MultisetBuilder {
    totals: BTreeMap<PieceKey, i64>,
}

impl MultisetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: PieceKey, qty: i64) -> &mut Self {
        let slot = self.totals.entry(key).or_insert(0);
        *slot = slot.saturating_add(qty);
        self
    }

    pub fn build(self) -> Multiset {
        let entries = self
            .totals
            .into_iter()
            .filter_map(|(key, qty)| u64::try_from(qty).ok().filter(|&q| q > 0).map(|q| (key, q)))
            .collect();
        Multiset { entries }
    }
}
