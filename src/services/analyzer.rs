//! Analysis Service
//!
//! Resolves records through a `CatalogueSource`, then hands canonical data
//! to the pure engine. Independent fetches run concurrently, bounded by
//! `fetch_concurrency`; output order never depends on completion order.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalogue::{CatalogueSource, UserSummary};
use crate::config::CatalogueConfig;
use crate::engine::{
    analyze_builds, analyze_gap, search_collaborations, shortfall, BuildReport, CandidateOutcome, CandidatePool,
    CollaborationReport, ColorPalette, Collector, GapReport, SearchLimits, SetSpec,
};
use crate::error::{AnalysisError, CandidateFetchError, ConfigError, Result};

pub struct Analyzer {
    source: Arc<dyn CatalogueSource>,
    config: CatalogueConfig,
}

impl Analyzer {
    pub fn new(source: Arc<dyn CatalogueSource>) -> Self {
        Self {
            source,
            config: CatalogueConfig::default(),
        }
    }

    /// Replace the default configuration; rejects values that would stall
    /// fetching or hide search results
    pub fn with_config(mut self, config: CatalogueConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &CatalogueConfig {
        &self.config
    }

    /// Which sets can `username` build alone?
    pub async fn analyze_buildability(&self, username: &str) -> Result<BuildReport> {
        info!("Analyzing buildable sets for {}", username);
        let collector = self.resolve_collector(username).await?;
        let catalog = self
            .source
            .fetch_set_catalog()
            .await
            .map_err(|e| AnalysisError::resolution(username, e))?;

        let source = &self.source;
        let sets: Vec<SetSpec> = stream::iter(catalog)
            .map(|summary| async move {
                let detail = source
                    .fetch_set_detail(&summary.id)
                    .await
                    .map_err(|e| AnalysisError::resolution(username, e))?;
                let mut set = SetSpec::from_record(&detail);
                // Catalogue listing is authoritative for size and number
                set.total_pieces = summary.total_pieces;
                set.set_number = summary.set_number;
                Ok::<_, AnalysisError>(set)
            })
            .buffered(self.config.fetch_concurrency)
            .try_collect()
            .await?;

        let report = analyze_builds(&collector, &sets);
        info!(
            "{} can build {} of {} sets",
            username, report.buildable_count, report.total_sets
        );
        Ok(report)
    }

    /// Per-piece comparison of `username`'s inventory against one set
    pub async fn analyze_set_gap(&self, set_id: &str, username: &str) -> Result<GapReport> {
        info!("Analyzing set {} for {}", set_id, username);
        let (collector, set) = tokio::try_join!(self.resolve_collector(username), self.resolve_set(set_id))?;
        let palette = self.palette().await;
        Ok(analyze_gap(&collector, &set, &palette))
    }

    /// Who could help `username` finish `set_id`?
    ///
    /// `limits` overrides the configured search bounds.
    pub async fn find_collaboration_plans(
        &self,
        username: &str,
        set_id: &str,
        limits: Option<SearchLimits>,
    ) -> Result<CollaborationReport> {
        let limits = limits.unwrap_or(self.config.collaboration);
        limits
            .validate()
            .map_err(|e| AnalysisError::InvalidLimits(e.to_string()))?;
        info!("Searching collaborators for {} on set {}", username, set_id);
        let (collector, set) = tokio::try_join!(self.resolve_collector(username), self.resolve_set(set_id))?;
        let palette = self.palette().await;

        if shortfall(&collector.inventory, &set.requirements).is_empty() {
            info!("{} can build set {} alone", username, set_id);
            return Ok(CollaborationReport::not_needed(&collector, &set, &palette));
        }

        let roster = self
            .source
            .fetch_collector_roster()
            .await
            .map_err(|e| AnalysisError::resolution(username, e))?;
        let pool = self.resolve_candidates(&collector, roster).await;

        let report = search_collaborations(&collector, &set, &pool, &limits, &palette);
        info!(
            "Found {} collaboration options for {} on set {} ({} candidates excluded)",
            report.collaboration_options.len(),
            username,
            set_id,
            report.excluded_candidates.len()
        );
        Ok(report)
    }

    /// Accept a set name where an id is expected.
    ///
    /// Only an unknown name falls back to treating `set` as an id; any other
    /// lookup failure is returned.
    pub async fn resolve_set_id(&self, set: &str) -> Result<String> {
        match self.source.fetch_set_by_name(set).await {
            Ok(summary) => Ok(summary.id),
            Err(e) if e.is_not_found() => {
                debug!("No set named {}, treating it as an id", set);
                Ok(set.to_string())
            }
            Err(e) => Err(AnalysisError::resolution(set, e)),
        }
    }

    async fn resolve_collector(&self, username: &str) -> Result<Collector> {
        let record = self
            .source
            .fetch_collector_by_identity(username)
            .await
            .map_err(|e| AnalysisError::resolution(username, e))?;
        Collector::from_record(&record).map_err(|e| AnalysisError::resolution(username, e))
    }

    async fn resolve_set(&self, set_id: &str) -> Result<SetSpec> {
        let record = self
            .source
            .fetch_set_detail(set_id)
            .await
            .map_err(|e| AnalysisError::resolution(set_id, e))?;
        Ok(SetSpec::from_record(&record))
    }

    /// Colour names are optional enrichment; failures degrade to an empty palette
    async fn palette(&self) -> ColorPalette {
        match self.source.fetch_color_catalog().await {
            Ok(colours) => ColorPalette::from_records(&colours),
            Err(e) => {
                warn!("Colour catalogue unavailable, continuing without names: {}", e);
                ColorPalette::new()
            }
        }
    }

    /// Fetch every roster member except `original`, isolating failures
    async fn resolve_candidates(&self, original: &Collector, roster: Vec<UserSummary>) -> CandidatePool {
        let source = &self.source;
        let outcomes: Vec<CandidateOutcome> = stream::iter(roster)
            .map(|summary| async move {
                if summary.id == original.id {
                    return CandidateOutcome::Original(summary);
                }
                let resolved = source
                    .fetch_collector_by_id(&summary.id)
                    .await
                    .and_then(|record| Collector::from_record(&record));
                match resolved {
                    Ok(collector) => CandidateOutcome::Resolved(collector),
                    Err(e) => {
                        warn!("Skipping candidate {}: {}", summary.username, e);
                        CandidateOutcome::Failed(CandidateFetchError::new(summary.id, summary.username, e))
                    }
                }
            })
            .buffered(self.config.fetch_concurrency)
            .collect()
            .await;
        debug!("Resolved {} roster entries", outcomes.len());
        CandidatePool::new(outcomes)
    }
}
