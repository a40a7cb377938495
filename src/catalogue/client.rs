//! HTTP catalogue client
//!
//! Talks to the JSON catalogue API with reqwest.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::records::{self, ColorRecord, ColorsResponse, SetFull, SetSummary, SetsResponse, UserFull, UserSummary, UsersResponse};
use super::CatalogueSource;
use crate::config::CatalogueConfig;
use crate::error::CatalogueError;

pub struct CatalogueClient {
    client: Client,
    api_base: String,
}

impl CatalogueClient {
    pub fn new(config: &CatalogueConfig) -> Result<Self, CatalogueError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CatalogueError::Transport {
                url: config.api_base.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// GET `path` and decode the body; 404 becomes `NotFound(resource, identifier)`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &'static str,
        identifier: &str,
    ) -> Result<T, CatalogueError> {
        let url = format!("{}{}", self.api_base, path);
        debug!("GET {}", url);

        let transport = |message: String| CatalogueError::Transport {
            url: url.clone(),
            message,
        };

        let response = self.client.get(&url).send().await.map_err(|e| transport(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogueError::not_found(resource, identifier));
        }
        if !status.is_success() {
            return Err(transport(format!("unexpected status {status}")));
        }

        let body = response.bytes().await.map_err(|e| transport(e.to_string()))?;
        records::decode(resource, &body)
    }
}

/// Escape a path segment
fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait]
impl CatalogueSource for CatalogueClient {
    async fn fetch_collector_roster(&self) -> Result<Vec<UserSummary>, CatalogueError> {
        let response: UsersResponse = self.get_json("/api/users", "user list", "users").await?;
        Ok(response.users)
    }

    async fn fetch_collector_summary(&self, username: &str) -> Result<UserSummary, CatalogueError> {
        let path = format!("/api/user/by-username/{}", segment(username));
        self.get_json(&path, "user", username).await
    }

    async fn fetch_collector_by_id(&self, id: &str) -> Result<UserFull, CatalogueError> {
        let path = format!("/api/user/by-id/{}", segment(id));
        self.get_json(&path, "user", id).await
    }

    async fn fetch_set_catalog(&self) -> Result<Vec<SetSummary>, CatalogueError> {
        let response: SetsResponse = self.get_json("/api/sets", "set list", "sets").await?;
        Ok(response.sets)
    }

    async fn fetch_set_detail(&self, set_id: &str) -> Result<SetFull, CatalogueError> {
        let path = format!("/api/set/by-id/{}", segment(set_id));
        self.get_json(&path, "set", set_id).await
    }

    async fn fetch_set_by_name(&self, name: &str) -> Result<SetSummary, CatalogueError> {
        let path = format!("/api/set/by-name/{}", segment(name));
        self.get_json(&path, "set", name).await
    }

    async fn fetch_color_catalog(&self) -> Result<Vec<ColorRecord>, CatalogueError> {
        let response: ColorsResponse = self.get_json("/api/colours", "colour list", "colours").await?;
        Ok(response.colours)
    }
}
