//! Catalogue Data Source
//!
//! The engine's only view of the outside world: collectors, sets and
//! colours, fetched on demand through [`CatalogueSource`].

pub mod records;
mod client;
mod memory;

pub use client::CatalogueClient;
pub use memory::InMemoryCatalogue;
pub use records::{ColorRecord, SetFull, SetSummary, UserFull, UserSummary};

use async_trait::async_trait;

use crate::error::CatalogueError;

/// Read-only access to the catalogue.
///
/// Every call is idempotent. Implementations report unknown identities as
/// `CatalogueError::NotFound`.
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// All collectors, in provider order
    async fn fetch_collector_roster(&self) -> Result<Vec<UserSummary>, CatalogueError>;

    /// Summary lookup by username
    async fn fetch_collector_summary(&self, username: &str) -> Result<UserSummary, CatalogueError>;

    /// Full collector record by id
    async fn fetch_collector_by_id(&self, id: &str) -> Result<UserFull, CatalogueError>;

    /// Full collector record by username (summary lookup, then by id)
    async fn fetch_collector_by_identity(&self, username: &str) -> Result<UserFull, CatalogueError> {
        let summary = self.fetch_collector_summary(username).await?;
        self.fetch_collector_by_id(&summary.id).await
    }

    /// All sets, in provider order
    async fn fetch_set_catalog(&self) -> Result<Vec<SetSummary>, CatalogueError>;

    /// Full set record by id
    async fn fetch_set_detail(&self, set_id: &str) -> Result<SetFull, CatalogueError>;

    /// Set summary by display name
    async fn fetch_set_by_name(&self, name: &str) -> Result<SetSummary, CatalogueError>;

    /// All known colours
    async fn fetch_color_catalog(&self) -> Result<Vec<ColorRecord>, CatalogueError>;
}
