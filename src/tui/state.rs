use crate::engine::posts::{Paginator, PostQuery};
use crate::engine::stats::DashboardStats;
use crate::model::{Keyword, PlatformFilter, Post, ScrapeDuration, ScraperStatus, SessionStats};
use std::collections::VecDeque;
use std::time::Instant;

const MAX_LOGS: usize = 200;

/// Snapshot published by the engine task and rendered by the TUI.
#[derive(Debug, Clone)]
pub struct AppState {
    pub backend: String,
    pub start_time: Instant,

    pub is_running: bool,
    pub duration: ScrapeDuration,
    pub run_insta_explore: bool,
    pub run_twitter_home: bool,
    pub keywords: Vec<Keyword>,
    pub session: SessionStats,
    pub progress_percent: f64,
    /// A start/stop request is in flight.
    pub control_busy: bool,
    pub control_error: Option<String>,
    /// Last answer from the backend's status endpoint.
    pub backend_status: Option<ScraperStatus>,

    pub dashboard_filter: PlatformFilter,
    pub dashboard: Option<DashboardStats>,
    pub recent_posts: Vec<Post>,
    pub dashboard_error: Option<String>,

    pub posts_query: PostQuery,
    pub posts: Vec<Post>,
    pub paginator: Paginator,
    pub posts_loading: bool,
    pub posts_error: Option<String>,

    pub logs: VecDeque<LogEntry>,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

impl AppState {
    pub fn new(backend: &str, page_size: usize) -> Self {
        Self {
            backend: backend.to_string(),
            start_time: Instant::now(),
            is_running: false,
            duration: ScrapeDuration::default(),
            run_insta_explore: false,
            run_twitter_home: false,
            keywords: Vec::new(),
            session: SessionStats::default(),
            progress_percent: 0.0,
            control_busy: false,
            control_error: None,
            backend_status: None,
            dashboard_filter: PlatformFilter::All,
            dashboard: None,
            recent_posts: Vec::new(),
            dashboard_error: None,
            posts_query: PostQuery::default(),
            posts: Vec::new(),
            paginator: Paginator::new(page_size),
            posts_loading: false,
            posts_error: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    /// Posts on the current page.
    pub fn page_posts(&self) -> &[Post] {
        self.paginator.slice(&self.posts)
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.posts.len())
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}
