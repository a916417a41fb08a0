//! Upstream profile statistics, cached for a fixed window

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::cache::TtlCache;
use crate::config::StatsConfig;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(StatusCode),
}

/// Where profile statistics come from
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self) -> Result<Value, StatsError>;
}

/// GitHub user profile (`GET /users/<name>`)
pub struct GithubProfile {
    http: reqwest::Client,
    url: String,
}

impl GithubProfile {
    pub fn new(config: &StatsConfig) -> Result<Self, StatsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("portfolio-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        let url = format!(
            "{}/users/{}",
            config.api_base.trim_end_matches('/'),
            config.github_user
        );
        Ok(Self { http, url })
    }
}

#[async_trait]
impl ProfileSource for GithubProfile {
    async fn fetch(&self) -> Result<Value, StatsError> {
        tracing::info!("Sending request to {}", self.url);
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status(status));
        }
        Ok(response.json::<Value>().await?)
    }
}

/// Profile statistics behind a TTL cache
pub struct StatsService {
    source: Box<dyn ProfileSource>,
    cache: TtlCache<Value>,
}

impl StatsService {
    pub fn new(source: Box<dyn ProfileSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    /// GitHub-backed service from configuration
    pub fn from_config(config: &StatsConfig) -> Result<Self, StatsError> {
        Ok(Self::new(
            Box::new(GithubProfile::new(config)?),
            Duration::from_secs(config.ttl_secs),
        ))
    }

    /// Cached statistics, fetched again once the cache has expired.
    /// A failed fetch leaves the cache untouched.
    pub async fn get(&self) -> Result<Value, StatsError> {
        if let Some(data) = self.cache.get().await {
            tracing::debug!("Serving profile stats from cache");
            return Ok(data);
        }

        let data = self.source.fetch().await?;
        self.cache.insert(data.clone()).await;
        Ok(data)
    }
}
