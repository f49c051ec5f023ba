use super::ScraperBackend;
use crate::engine::posts::PostQuery;
use crate::engine::stats::DashboardStats;
use crate::model::{PlatformFilter, Post, ScraperStatus, StartRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin client for the scraper HTTP API. Every call is a single attempt;
/// callers decide what to show on failure.
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B: serde::Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<()> {
        let url = self.url(path);
        let mut req = self.client.post(&url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("POST {} failed ({}): {}", path, status, body);
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed ({}): {}", path, status, body);
        }
        resp.json()
            .await
            .with_context(|| format!("failed to parse {} response", path))
    }
}

/// Query string for the stats endpoint; `All` sends no parameter.
pub fn stats_params(filter: PlatformFilter) -> Vec<(&'static str, String)> {
    filter
        .platform()
        .map(|p| vec![("platform", p.tag().to_string())])
        .unwrap_or_default()
}

/// Query string for a posts listing. Absent filters are omitted.
pub fn posts_params(query: &PostQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(term) = query.search_term() {
        params.push(("search", term.to_string()));
    }
    if let Some(min) = query.min_likes {
        params.push(("minLikes", min.to_string()));
    }
    params
}

#[async_trait]
impl ScraperBackend for RestBackend {
    async fn start(&self, request: &StartRequest) -> Result<()> {
        self.post_json("scraper/start", Some(request)).await
    }

    async fn stop(&self) -> Result<()> {
        self.post_json::<()>("scraper/stop", None).await
    }

    async fn status(&self) -> Result<ScraperStatus> {
        self.get_json("scraper/status", &[]).await
    }

    async fn dashboard_stats(&self, filter: PlatformFilter) -> Result<DashboardStats> {
        self.get_json("dashboard/stats", &stats_params(filter)).await
    }

    async fn posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let path = format!("posts/{}", query.view.path());
        self.get_json(&path, &posts_params(query)).await
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::posts::PostView;

    #[test]
    fn test_url_joins_without_double_slash() {
        let backend = RestBackend::new("http://localhost:8080/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8080/api");
        assert_eq!(backend.url("scraper/start"), "http://localhost:8080/api/scraper/start");
        assert_eq!(backend.url("/posts/all"), "http://localhost:8080/api/posts/all");
    }

    #[test]
    fn test_stats_params() {
        assert!(stats_params(PlatformFilter::All).is_empty());
        assert_eq!(
            stats_params(PlatformFilter::Instagram),
            vec![("platform", "instagram".to_string())]
        );
    }

    #[test]
    fn test_posts_params_omit_empty_filters() {
        let q = PostQuery::default();
        assert!(posts_params(&q).is_empty());

        let q = PostQuery {
            view: PostView::TwitterSearch,
            search: " @webdev ".to_string(),
            min_likes: Some(250),
        };
        assert_eq!(
            posts_params(&q),
            vec![("search", "webdev".to_string()), ("minLikes", "250".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_errors() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let backend = RestBackend::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
        let err = backend.stop().await.unwrap_err();
        assert!(format!("{:#}", err).contains("POST scraper/stop failed"));
        assert!(backend.posts(&PostQuery::default()).await.is_err());
    }
}
