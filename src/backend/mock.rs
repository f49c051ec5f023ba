//! In-process backend that serves generated data after an artificial delay.

use super::ScraperBackend;
use crate::engine::posts::PostQuery;
use crate::engine::stats::DashboardStats;
use crate::model::{Platform, PlatformFilter, Post, ScraperStatus, Source, StartRequest};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

pub const MOCK_POST_COUNT: usize = 48;

const HANDLES: [&str; 8] = [
    "@techguru",
    "@datascience",
    "@webdev",
    "@airesearch",
    "@cloudops",
    "@devops_ninja",
    "@ml_engineer",
    "@fullstack",
];

const DISPLAY_NAMES: [&str; 8] = [
    "Tech Guru",
    "Data Science Daily",
    "Web Dev",
    "AI Research",
    "Cloud Ops",
    "DevOps Ninja",
    "ML Engineer",
    "Full Stack",
];

const CAPTIONS: [&str; 8] = [
    "Exploring new frameworks for 2025 \u{1f680}",
    "Machine learning pipelines are getting faster",
    "Just deployed a new microservice architecture",
    "The future of AI is here and it's incredible",
    "Cloud-native development best practices",
    "Kubernetes tips every developer should know",
    "Neural networks explained in simple terms",
    "Building scalable APIs with Spring Boot",
];

const SEARCH_KEYWORDS: [&str; 4] = ["rust", "ai", "cloud", "devops"];

/// Feed assignment cycles through these four so every view has posts.
const FEEDS: [(Platform, Source); 4] = [
    (Platform::Instagram, Source::Explore),
    (Platform::Instagram, Source::Search),
    (Platform::Twitter, Source::Home),
    (Platform::Twitter, Source::Search),
];

/// Generate `count` posts spaced one hour apart going back from `now`.
pub fn generate_posts<R: Rng>(count: usize, now: DateTime<Utc>, rng: &mut R) -> Vec<Post> {
    (0..count)
        .map(|i| {
            let (platform, source) = FEEDS[i % FEEDS.len()];
            let is_twitter = platform == Platform::Twitter;
            let keyword = (source == Source::Search)
                .then(|| SEARCH_KEYWORDS[(i / FEEDS.len()) % SEARCH_KEYWORDS.len()].to_string());
            Post {
                id: format!("post-{}", i + 1),
                platform,
                source,
                keyword,
                username: HANDLES[i % HANDLES.len()].to_string(),
                display_name: is_twitter.then(|| DISPLAY_NAMES[i % DISPLAY_NAMES.len()].to_string()),
                text: CAPTIONS[i % CAPTIONS.len()].to_string(),
                likes: rng.gen_range(100..5_100),
                comments: rng.gen_range(10..310),
                reposts: is_twitter.then(|| rng.gen_range(0..800)),
                replies: is_twitter.then(|| rng.gen_range(0..200)),
                views: is_twitter.then(|| rng.gen_range(1_000..250_000)),
                link: (i % 3 == 0).then(|| format!("https://example.com/post/{}", i + 1)),
                scraped_at: now - ChronoDuration::hours(i as i64),
            }
        })
        .collect()
}

pub struct MockBackend {
    posts: Vec<Post>,
    latency: Duration,
    status: Mutex<ScraperStatus>,
}

impl MockBackend {
    pub fn new(latency: Duration) -> Self {
        Self::with_rng(latency, &mut StdRng::from_entropy())
    }

    /// Deterministic post set, for tests.
    pub fn seeded(seed: u64, latency: Duration) -> Self {
        Self::with_rng(latency, &mut StdRng::seed_from_u64(seed))
    }

    fn with_rng(latency: Duration, rng: &mut StdRng) -> Self {
        Self {
            posts: generate_posts(MOCK_POST_COUNT, Utc::now(), rng),
            latency,
            status: Mutex::new(ScraperStatus::default()),
        }
    }

    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn update_status(&self, f: impl FnOnce(&mut ScraperStatus)) {
        if let Ok(mut status) = self.status.lock() {
            f(&mut status);
        }
    }
}

#[async_trait]
impl ScraperBackend for MockBackend {
    async fn start(&self, request: &StartRequest) -> Result<()> {
        self.delay().await;
        self.update_status(|s| {
            *s = ScraperStatus {
                is_running: true,
                started_at: Some(Utc::now()),
                duration: request.duration,
                ..ScraperStatus::default()
            };
        });
        tracing::debug!(duration = request.duration, keywords = request.keywords.len(), "mock scraper started");
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.delay().await;
        self.update_status(|s| s.is_running = false);
        tracing::debug!("mock scraper stopped");
        Ok(())
    }

    async fn status(&self) -> Result<ScraperStatus> {
        self.delay().await;
        let status = self
            .status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default();
        Ok(status)
    }

    async fn dashboard_stats(&self, filter: PlatformFilter) -> Result<DashboardStats> {
        self.delay().await;
        Ok(DashboardStats::from_posts(&self.posts, filter))
    }

    async fn posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        self.delay().await;
        Ok(query.apply(&self.posts))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::posts::PostView;

    #[test]
    fn test_generated_posts_shape() {
        let now = Utc::now();
        let posts = generate_posts(MOCK_POST_COUNT, now, &mut StdRng::seed_from_u64(7));
        assert_eq!(posts.len(), 48);
        assert_eq!(posts[0].id, "post-1");
        assert_eq!(posts[0].scraped_at, now);
        assert_eq!(posts[1].scraped_at, now - ChronoDuration::hours(1));
        for (i, p) in posts.iter().enumerate() {
            assert!((100..5_100).contains(&p.likes));
            assert!((10..310).contains(&p.comments));
            assert_eq!(p.link.is_some(), i % 3 == 0);
            assert_eq!(p.keyword.is_some(), p.source == Source::Search);
            assert_eq!(p.views.is_some(), p.platform == Platform::Twitter);
        }
    }

    #[test]
    fn test_seeded_backends_agree() {
        let a = MockBackend::seeded(42, Duration::ZERO);
        let b = MockBackend::seeded(42, Duration::ZERO);
        let likes_a: Vec<u64> = a.all_posts().iter().map(|p| p.likes).collect();
        let likes_b: Vec<u64> = b.all_posts().iter().map(|p| p.likes).collect();
        assert_eq!(likes_a, likes_b);
    }

    #[tokio::test]
    async fn test_every_view_has_posts() {
        let backend = MockBackend::seeded(1, Duration::ZERO);
        for view in PostView::ALL {
            let q = PostQuery { view, ..Default::default() };
            let posts = backend.posts(&q).await.unwrap();
            assert!(!posts.is_empty(), "{} is empty", view.label());
        }
    }

    #[tokio::test]
    async fn test_status_follows_start_stop() {
        let backend = MockBackend::seeded(1, Duration::ZERO);
        assert!(!backend.status().await.unwrap().is_running);

        let req = StartRequest {
            duration: 120,
            run_insta_explore: true,
            run_twitter_home: false,
            keywords: Vec::new(),
        };
        backend.start(&req).await.unwrap();
        let status = backend.status().await.unwrap();
        assert!(status.is_running);
        assert_eq!(status.duration, 120);
        assert!(status.started_at.is_some());

        backend.stop().await.unwrap();
        assert!(!backend.status().await.unwrap().is_running);
    }

    #[tokio::test]
    async fn test_stats_cover_generated_set() {
        let backend = MockBackend::seeded(3, Duration::ZERO);
        let stats = backend.dashboard_stats(PlatformFilter::All).await.unwrap();
        assert_eq!(stats.total_posts, 48);
        assert_eq!(stats.unique_users, 8);
        assert_eq!(stats.total_links, 16);

        let ig = backend.dashboard_stats(PlatformFilter::Instagram).await.unwrap();
        assert_eq!(ig.total_posts, 24);
    }
}
