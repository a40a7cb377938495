//! In-memory catalogue
//!
//! Fixture-backed `CatalogueSource` with optional failure injection.

use async_trait::async_trait;
use std::collections::HashSet;

use super::records::{ColorRecord, SetFull, SetSummary, UserFull, UserSummary};
use super::CatalogueSource;
use crate::error::CatalogueError;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogue {
    users: Vec<UserFull>,
    sets: Vec<SetFull>,
    colours: Vec<ColorRecord>,
    failing_collectors: HashSet<String>,
    failing_sets: HashSet<String>,
    colours_unavailable: bool,
}

impl InMemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserFull) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_set(mut self, set: SetFull) -> Self {
        self.sets.push(set);
        self
    }

    pub fn with_colour(mut self, name: impl Into<String>, code: u32) -> Self {
        self.colours.push(ColorRecord {
            name: name.into(),
            code,
        });
        self
    }

    /// Make full-record lookups for collector `id` fail with a transport error
    pub fn with_failing_collector(mut self, id: impl Into<String>) -> Self {
        self.failing_collectors.insert(id.into());
        self
    }

    /// Make detail lookups for set `id` fail with a transport error
    pub fn with_failing_set(mut self, id: impl Into<String>) -> Self {
        self.failing_sets.insert(id.into());
        self
    }

    pub fn with_colours_unavailable(mut self) -> Self {
        self.colours_unavailable = true;
        self
    }

    fn unavailable(path: String) -> CatalogueError {
        CatalogueError::Transport {
            url: path,
            message: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl CatalogueSource for InMemoryCatalogue {
    async fn fetch_collector_roster(&self) -> Result<Vec<UserSummary>, CatalogueError> {
        Ok(self.users.iter().map(UserFull::summary).collect())
    }

    async fn fetch_collector_summary(&self, username: &str) -> Result<UserSummary, CatalogueError> {
        self.users
            .iter()
            .find(|u| u.username == username)
            .map(UserFull::summary)
            .ok_or_else(|| CatalogueError::not_found("user", username))
    }

    async fn fetch_collector_by_id(&self, id: &str) -> Result<UserFull, CatalogueError> {
        if self.failing_collectors.contains(id) {
            return Err(Self::unavailable(format!("/api/user/by-id/{id}")));
        }
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| CatalogueError::not_found("user", id))
    }

    async fn fetch_set_catalog(&self) -> Result<Vec<SetSummary>, CatalogueError> {
        Ok(self.sets.iter().map(SetFull::summary).collect())
    }

    async fn fetch_set_detail(&self, set_id: &str) -> Result<SetFull, CatalogueError> {
        if self.failing_sets.contains(set_id) {
            return Err(Self::unavailable(format!("/api/set/by-id/{set_id}")));
        }
        self.sets
            .iter()
            .find(|s| s.id == set_id)
            .cloned()
            .ok_or_else(|| CatalogueError::not_found("set", set_id))
    }

    async fn fetch_set_by_name(&self, name: &str) -> Result<SetSummary, CatalogueError> {
        self.sets
            .iter()
            .find(|s| s.name == name)
            .map(SetFull::summary)
            .ok_or_else(|| CatalogueError::not_found("set", name))
    }

    async fn fetch_color_catalog(&self) -> Result<Vec<ColorRecord>, CatalogueError> {
        if self.colours_unavailable {
            return Err(Self::unavailable("/api/colours".to_string()));
        }
        Ok(self.colours.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, username: &str) -> UserFull {
        UserFull {
            id: id.to_string(),
            username: username.to_string(),
            location: "Odense".to_string(),
            brick_count: 0,
            collection: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_identity_resolution_goes_through_summary() {
        let catalogue = InMemoryCatalogue::new().with_user(user("u-1", "brickfan"));
        let full = catalogue.fetch_collector_by_identity("brickfan").await.unwrap();
        assert_eq!(full.id, "u-1");

        let err = catalogue.fetch_collector_by_identity("nobody").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let catalogue = InMemoryCatalogue::new()
            .with_user(user("u-1", "brickfan"))
            .with_failing_collector("u-1")
            .with_colours_unavailable();
        assert!(matches!(
            catalogue.fetch_collector_by_id("u-1").await,
            Err(CatalogueError::Transport { .. })
        ));
        assert!(catalogue.fetch_color_catalog().await.is_err());
        assert_eq!(catalogue.fetch_collector_roster().await.unwrap().len(), 1);
    }
}
