//! Collaboration Search
//!
//! Looks for other collectors who can close a shortfall, first alone
//! (tier 1) and then in pairs (tier 2). The pair tier is a bounded
//! heuristic: it only runs when tier 1 found few complete plans and it only
//! considers the first `roster_cap` roster entries.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::sufficiency::{contribution, is_sufficient, shortfall};
use super::{ColorPalette, Collector, Multiset, SetSpec};
use crate::catalogue::records::{SetSummary, UserSummary};
use crate::engine::multiset::ColorCode;
use crate::error::{CandidateFetchError, ConfigError};

/// Roster entries considered for pair search
pub const DEFAULT_ROSTER_CAP: usize = 20;
/// Plans returned after ranking
pub const DEFAULT_PLAN_CAP: usize = 10;
/// Pair search runs only when fewer single-collaborator plans than this exist
pub const PAIR_SEARCH_THRESHOLD: usize = 3;

/// Bounds of one collaboration search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub roster_cap: usize,
    pub plan_cap: usize,
    pub pair_search_threshold: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            roster_cap: DEFAULT_ROSTER_CAP,
            plan_cap: DEFAULT_PLAN_CAP,
            pair_search_threshold: PAIR_SEARCH_THRESHOLD,
        }
    }
}

impl SearchLimits {
    /// A zero `plan_cap` would hide every plan found and read as "none found"
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plan_cap == 0 {
            return Err(ConfigError::InvalidValue {
                key: "plan_cap".to_string(),
                value: self.plan_cap.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Resolution result for one roster entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// The requesting collector; never a candidate
    Original(UserSummary),
    Resolved(Collector),
    Failed(CandidateFetchError),
}

impl CandidateOutcome {
    pub fn collector_id(&self) -> &str {
        match self {
            Self::Original(summary) => &summary.id,
            Self::Resolved(collector) => &collector.id,
            Self::Failed(err) => &err.collector_id,
        }
    }

    fn resolved(&self) -> Option<&Collector> {
        match self {
            Self::Resolved(collector) => Some(collector),
            _ => None,
        }
    }
}

/// Candidate outcomes in raw roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    outcomes: Vec<CandidateOutcome>,
}

impl CandidatePool {
    pub fn new(outcomes: Vec<CandidateOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[CandidateOutcome] {
        &self.outcomes
    }

    pub fn resolved(&self) -> impl Iterator<Item = &Collector> {
        self.outcomes.iter().filter_map(CandidateOutcome::resolved)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CandidateFetchError> {
        self.outcomes.iter().filter_map(|o| match o {
            CandidateOutcome::Failed(err) => Some(err),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributedPiece {
    pub piece_id: String,
    pub color_id: ColorCode,
    pub color_name: Option<String>,
    pub quantity: u64,
}

/// One collaborator's share of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub username: String,
    pub user_id: String,
    pub location: String,
    pub total_pieces: i64,
    pub pieces_contributed: u64,
    pub missing_pieces_filled: Vec<ContributedPiece>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationPlan {
    pub collaborators: Vec<Contributor>,
    /// Original collector plus collaborators
    pub total_users: usize,
    pub missing_pieces_filled: u64,
    /// Completion percentage in `[0, 100]`
    pub success_rate: f64,
}

impl CollaborationPlan {
    pub fn is_complete(&self) -> bool {
        self.success_rate >= 100.0
    }

    pub fn collaborator_ids(&self) -> Vec<&str> {
        self.collaborators.iter().map(|c| c.user_id.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    /// The original collector can already build the set
    NotNeeded,
    Found,
    NoneFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationReport {
    pub original_username: String,
    pub set_info: SetSummary,
    pub status: CollaborationStatus,
    pub total_missing_pieces: u64,
    pub missing_piece_types: usize,
    pub original_user_pieces_provided: Vec<ContributedPiece>,
    pub original_user_total_contribution: u64,
    pub collaboration_options: Vec<CollaborationPlan>,
    pub no_collaboration_found: bool,
    pub excluded_candidates: Vec<CandidateFetchError>,
    pub pair_search_ran: bool,
}

impl CollaborationReport {
    /// Result for a collector who can build `set` alone
    pub fn not_needed(original: &Collector, set: &SetSpec, palette: &ColorPalette) -> Self {
        let provided = contribution(&original.inventory, &set.requirements);
        Self {
            original_username: original.username.clone(),
            set_info: set.summary(),
            status: CollaborationStatus::NotNeeded,
            total_missing_pieces: 0,
            missing_piece_types: 0,
            original_user_pieces_provided: pieces(&provided, palette),
            original_user_total_contribution: provided.total(),
            collaboration_options: Vec::new(),
            no_collaboration_found: false,
            excluded_candidates: Vec::new(),
            pair_search_ran: false,
        }
    }
}

fn pieces(given: &Multiset, palette: &ColorPalette) -> Vec<ContributedPiece> {
    given
        .iter()
        .map(|(key, quantity)| ContributedPiece {
            piece_id: key.piece_id.clone(),
            color_id: key.color.clone(),
            color_name: palette.name_of(&key.color),
            quantity,
        })
        .collect()
}

fn contributor(collector: &Collector, given: &Multiset, palette: &ColorPalette) -> Contributor {
    Contributor {
        username: collector.username.clone(),
        user_id: collector.id.clone(),
        location: collector.location.clone(),
        total_pieces: collector.brick_count,
        pieces_contributed: given.total(),
        missing_pieces_filled: pieces(given, palette),
    }
}

fn plan(collaborators: Vec<Contributor>, missing_total: u64) -> CollaborationPlan {
    let filled: u64 = collaborators.iter().map(|c| c.pieces_contributed).sum();
    let success_rate = if missing_total == 0 {
        100.0
    } else {
        filled as f64 / missing_total as f64 * 100.0
    };
    CollaborationPlan {
        total_users: collaborators.len() + 1,
        collaborators,
        missing_pieces_filled: filled,
        success_rate,
    }
}

/// Search `pool` for collectors who close `original`'s shortfall on `set`.
pub fn search_collaborations(
    original: &Collector,
    set: &SetSpec,
    pool: &CandidatePool,
    limits: &SearchLimits,
    palette: &ColorPalette,
) -> CollaborationReport {
    let gap = shortfall(&original.inventory, &set.requirements);
    if gap.is_empty() {
        return CollaborationReport::not_needed(original, set, palette);
    }
    let missing_total = gap.total();
    let provided = contribution(&original.inventory, &set.requirements);
    let is_candidate = |c: &&Collector| c.id != original.id;

    let mut plans = Vec::new();
    let mut solo: HashSet<&str> = HashSet::new();
    for candidate in pool.resolved().filter(is_candidate) {
        if is_sufficient(&candidate.inventory, &gap) {
            let given = contribution(&candidate.inventory, &gap);
            plans.push(plan(vec![contributor(candidate, &given, palette)], missing_total));
            solo.insert(candidate.id.as_str());
        }
    }
    debug!("Tier 1 found {} single-collaborator plans for set {}", plans.len(), set.id);

    // Cap applies to raw roster order; exclusions are skipped afterwards.
    let pair_search_ran = plans.len() < limits.pair_search_threshold;
    if pair_search_ran {
        let eligible: Vec<&Collector> = pool
            .outcomes()
            .iter()
            .take(limits.roster_cap)
            .filter_map(CandidateOutcome::resolved)
            .filter(is_candidate)
            .filter(|c| !solo.contains(c.id.as_str()))
            .collect();
        let before = plans.len();
        for (i, first) in eligible.iter().enumerate() {
            let first_given = contribution(&first.inventory, &gap);
            let remaining = shortfall(&first_given, &gap);
            for second in &eligible[i + 1..] {
                if !is_sufficient(&second.inventory, &remaining) {
                    continue;
                }
                let second_given = contribution(&second.inventory, &remaining);
                plans.push(plan(
                    vec![
                        contributor(first, &first_given, palette),
                        contributor(second, &second_given, palette),
                    ],
                    missing_total,
                ));
            }
        }
        debug!(
            "Tier 2 checked {} eligible collectors, found {} pair plans",
            eligible.len(),
            plans.len() - before
        );
    }

    plans.sort_by(|a, b| {
        b.success_rate
            .total_cmp(&a.success_rate)
            .then_with(|| a.total_users.cmp(&b.total_users))
    });
    plans.truncate(limits.plan_cap);

    let status = if plans.is_empty() {
        CollaborationStatus::NoneFound
    } else {
        CollaborationStatus::Found
    };
    CollaborationReport {
        original_username: original.username.clone(),
        set_info: set.summary(),
        status,
        total_missing_pieces: missing_total,
        missing_piece_types: gap.len(),
        original_user_pieces_provided: pieces(&provided, palette),
        original_user_total_contribution: provided.total(),
        no_collaboration_found: plans.is_empty(),
        collaboration_options: plans,
        excluded_candidates: pool.failures().cloned().collect(),
        pair_search_ran,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PieceKey;
    use crate::error::CatalogueError;
    use proptest::prelude::*;

    const RED: u32 = 21;
    const BLUE: u32 = 23;

    fn inv(entries: &[(&str, u32, u64)]) -> Multiset {
        entries
            .iter()
            .map(|&(p, c, q)| (PieceKey::new(p, ColorCode::from_code(c)), q))
            .collect()
    }

    fn collector(id: &str, inventory: Multiset) -> Collector {
        Collector {
            id: id.to_string(),
            username: format!("user-{id}"),
            location: "Billund".to_string(),
            brick_count: inventory.total() as i64,
            inventory,
        }
    }

    fn set_spec(requirements: Multiset) -> SetSpec {
        SetSpec {
            id: "s-1".to_string(),
            name: "Tower".to_string(),
            set_number: "100-1".to_string(),
            total_pieces: requirements.total() as i64,
            requirements,
        }
    }

    fn resolved(c: Collector) -> CandidateOutcome {
        CandidateOutcome::Resolved(c)
    }

    fn search(original: &Collector, set: &SetSpec, pool: Vec<CandidateOutcome>, limits: SearchLimits) -> CollaborationReport {
        search_collaborations(original, set, &CandidatePool::new(pool), &limits, &ColorPalette::new())
    }

    #[test]
    fn test_no_collaboration_needed() {
        let original = collector("me", inv(&[("P1", RED, 10)]));
        let set = set_spec(inv(&[("P1", RED, 10)]));
        let report = search(&original, &set, vec![], SearchLimits::default());
        assert_eq!(report.status, CollaborationStatus::NotNeeded);
        assert!(!report.no_collaboration_found);
        assert!(report.collaboration_options.is_empty());
        assert_eq!(report.original_user_total_contribution, 10);
    }

    #[test]
    fn test_single_collaborator_completes() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 2)]));
        let a = collector("a", inv(&[("P1", RED, 2)]));
        let b = collector("b", inv(&[("P1", RED, 1)]));
        let report = search(&original, &set, vec![resolved(a), resolved(b)], SearchLimits::default());

        assert_eq!(report.status, CollaborationStatus::Found);
        assert_eq!(report.collaboration_options.len(), 1);
        let best = &report.collaboration_options[0];
        assert_eq!(best.total_users, 2);
        assert!(best.is_complete());
        assert_eq!(best.collaborator_ids(), vec!["a"]);
        assert_eq!(best.collaborators[0].pieces_contributed, 2);
    }

    #[test]
    fn test_pair_combines_partial_contributors() {
        let original = collector("me", inv(&[("P2", BLUE, 1)]));
        let set = set_spec(inv(&[("P1", RED, 2), ("P2", BLUE, 1)]));
        let b = collector("b", inv(&[("P1", RED, 1)]));
        let c = collector("c", inv(&[("P1", RED, 5)]));
        let report = search(&original, &set, vec![resolved(b), resolved(c)], SearchLimits::default());

        // c alone covers, so the only plan is the single one
        assert_eq!(report.collaboration_options.len(), 1);
        assert_eq!(report.collaboration_options[0].collaborator_ids(), vec!["c"]);
        assert!(report.pair_search_ran);

        let d = collector("d", inv(&[("P1", RED, 1), ("P9", 1, 4)]));
        let b = collector("b", inv(&[("P1", RED, 1)]));
        let report = search(&original, &set, vec![resolved(b), resolved(d)], SearchLimits::default());
        assert_eq!(report.collaboration_options.len(), 1);
        let pair = &report.collaboration_options[0];
        assert_eq!(pair.total_users, 3);
        assert_eq!(pair.collaborator_ids(), vec!["b", "d"]);
        assert_eq!(pair.missing_pieces_filled, 2);
        assert!(pair.is_complete());
    }

    #[test]
    fn test_pair_contributions_never_exceed_shortfall() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 3), ("P2", BLUE, 2)]));
        let a = collector("a", inv(&[("P1", RED, 3), ("P2", BLUE, 1)]));
        let b = collector("b", inv(&[("P1", RED, 3), ("P2", BLUE, 1)]));
        let report = search(&original, &set, vec![resolved(a), resolved(b)], SearchLimits::default());
        let pair = &report.collaboration_options[0];
        assert_eq!(pair.collaborators[0].pieces_contributed, 4);
        assert_eq!(pair.collaborators[1].pieces_contributed, 1);
        assert_eq!(pair.missing_pieces_filled, 5);
    }

    #[test]
    fn test_single_plans_rank_before_pairs() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 2)]));
        let pool = vec![
            resolved(collector("p", inv(&[("P1", RED, 1)]))),
            resolved(collector("q", inv(&[("P1", RED, 1)]))),
            resolved(collector("solo", inv(&[("P1", RED, 2)]))),
        ];
        let report = search(&original, &set, pool, SearchLimits::default());
        let sizes: Vec<_> = report.collaboration_options.iter().map(|p| p.total_users).collect();
        assert_eq!(sizes, vec![2, 3]);
        assert_eq!(report.collaboration_options[1].collaborator_ids(), vec!["p", "q"]);
    }

    #[test]
    fn test_solo_solvers_excluded_from_pairs() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 2)]));
        let pool = vec![
            resolved(collector("solo", inv(&[("P1", RED, 2)]))),
            resolved(collector("half", inv(&[("P1", RED, 1)]))),
        ];
        let report = search(&original, &set, pool, SearchLimits::default());
        assert_eq!(report.collaboration_options.len(), 1);
        assert_eq!(report.collaboration_options[0].total_users, 2);
    }

    #[test]
    fn test_pair_search_skipped_when_enough_singles() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 2)]));
        let pool = (0..3)
            .map(|i| resolved(collector(&format!("s{i}"), inv(&[("P1", RED, 2)]))))
            .chain([
                resolved(collector("h1", inv(&[("P1", RED, 1)]))),
                resolved(collector("h2", inv(&[("P1", RED, 1)]))),
            ])
            .collect();
        let report = search(&original, &set, pool, SearchLimits::default());
        assert!(!report.pair_search_ran);
        assert_eq!(report.collaboration_options.len(), 3);
        assert!(report.collaboration_options.iter().all(|p| p.total_users == 2));
    }

    #[test]
    fn test_roster_cap_applies_before_exclusion() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 2)]));
        let pool = vec![
            CandidateOutcome::Original(UserSummary {
                id: "me".to_string(),
                username: "user-me".to_string(),
                location: "Billund".to_string(),
                brick_count: 0,
            }),
            resolved(collector("h1", inv(&[("P1", RED, 1)]))),
            resolved(collector("h2", inv(&[("P1", RED, 1)]))),
        ];
        let limits = SearchLimits {
            roster_cap: 2,
            ..SearchLimits::default()
        };
        let report = search(&original, &set, pool, limits);
        // Only "me" and "h1" fall inside the cap, so no pair can form.
        assert!(report.pair_search_ran);
        assert!(report.no_collaboration_found);
        assert_eq!(report.status, CollaborationStatus::NoneFound);
    }

    #[test]
    fn test_failed_candidates_are_reported_not_fatal() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 1)]));
        let failure = CandidateFetchError::new("x", "user-x", CatalogueError::not_found("user", "x"));
        let pool = vec![
            CandidateOutcome::Failed(failure.clone()),
            resolved(collector("a", inv(&[("P1", RED, 1)]))),
        ];
        let report = search(&original, &set, pool, SearchLimits::default());
        assert_eq!(report.excluded_candidates, vec![failure]);
        assert_eq!(report.collaboration_options.len(), 1);
    }

    #[test]
    fn test_original_never_collaborates_with_itself() {
        let original = collector("me", inv(&[("P1", RED, 1)]));
        let set = set_spec(inv(&[("P1", RED, 2)]));
        let pool = vec![resolved(original.clone())];
        let report = search(&original, &set, pool, SearchLimits::default());
        assert!(report.no_collaboration_found);
    }

    #[test]
    fn test_plan_cap_truncates() {
        let original = collector("me", Multiset::new());
        let set = set_spec(inv(&[("P1", RED, 1)]));
        let pool = (0..5)
            .map(|i| resolved(collector(&format!("s{i}"), inv(&[("P1", RED, 1)]))))
            .collect();
        let limits = SearchLimits {
            plan_cap: 2,
            ..SearchLimits::default()
        };
        let report = search(&original, &set, pool, limits);
        let ids: Vec<_> = report
            .collaboration_options
            .iter()
            .flat_map(|p| p.collaborator_ids())
            .collect();
        assert_eq!(ids, vec!["s0", "s1"]);
    }

    fn arb_inventory() -> impl Strategy<Value = Multiset> {
        prop::collection::vec((0u32..3, 0u64..4), 0..4).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(c, q)| (PieceKey::new("P", ColorCode::from_code(c)), q))
                .collect::<Multiset>()
        })
    }

    proptest! {
        #[test]
        fn prop_redundant_candidate_changes_nothing(
            need in arb_inventory(),
            inventories in prop::collection::vec(arb_inventory(), 0..6),
        ) {
            let original = collector("me", Multiset::new());
            let set = set_spec(need);
            let pool: Vec<_> = inventories
                .into_iter()
                .enumerate()
                .map(|(i, inventory)| resolved(collector(&format!("c{i}"), inventory)))
                .collect();
            let before = search(&original, &set, pool.clone(), SearchLimits::default());

            let mut extended = pool;
            extended.push(resolved(collector("redundant", inv(&[("Z", 99, 50)]))));
            let after = search(&original, &set, extended, SearchLimits::default());

            prop_assert_eq!(before.collaboration_options, after.collaboration_options);
        }

        #[test]
        fn prop_every_plan_is_complete(
            need in arb_inventory(),
            inventories in prop::collection::vec(arb_inventory(), 0..6),
        ) {
            let original = collector("me", Multiset::new());
            let set = set_spec(need);
            let pool: Vec<_> = inventories
                .into_iter()
                .enumerate()
                .map(|(i, inventory)| resolved(collector(&format!("c{i}"), inventory)))
                .collect();
            let report = search(&original, &set, pool, SearchLimits::default());
            for option in &report.collaboration_options {
                prop_assert!(option.is_complete());
                prop_assert_eq!(option.missing_pieces_filled, report.total_missing_pieces);
            }
            prop_assert!(report.collaboration_options.windows(2).all(|w| w[0].total_users <= w[1].total_users));
        }
    }
}
