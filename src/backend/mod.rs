pub mod mock;
pub mod rest;

use crate::config::{ApiConfig, BackendMode};
use crate::engine::posts::PostQuery;
use crate::engine::stats::DashboardStats;
use crate::model::{PlatformFilter, Post, ScraperStatus, StartRequest};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Static messages shown in the UI when a backend call fails. The full error
/// goes to the log file.
pub const POSTS_UNAVAILABLE: &str = "Failed to load posts. Make sure the backend is running.";
pub const STATS_UNAVAILABLE: &str =
    "Failed to load dashboard stats. Make sure the backend is running.";
pub const START_FAILED: &str = "Failed to start scraper. Make sure the backend is running.";
pub const STOP_FAILED: &str = "Failed to stop scraper. Make sure the backend is running.";

#[async_trait]
pub trait ScraperBackend: Send + Sync {
    async fn start(&self, request: &StartRequest) -> Result<()>;
    async fn stop(&self) -> Result<()>;
    async fn status(&self) -> Result<ScraperStatus>;
    async fn dashboard_stats(&self, filter: PlatformFilter) -> Result<DashboardStats>;
    async fn posts(&self, query: &PostQuery) -> Result<Vec<Post>>;
    fn name(&self) -> &'static str;
}

/// Build the backend selected by `api.mode`.
pub fn from_config(api: &ApiConfig) -> Result<Arc<dyn ScraperBackend>> {
    let backend: Arc<dyn ScraperBackend> = match api.mode {
        BackendMode::Mock => Arc::new(mock::MockBackend::new(api.mock_latency())),
        BackendMode::Rest => Arc::new(rest::RestBackend::new(&api.base_url, api.request_timeout())?),
    };
    tracing::info!(backend = backend.name(), "backend selected");
    Ok(backend)
}
