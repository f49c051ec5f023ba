//! Engine task: owns the session controller and the backend, applies
//! `TuiCommand`s and publishes `AppState` snapshots.

use crate::backend::{self, ScraperBackend};
use crate::config::Config;
use crate::engine::posts::PostQuery;
use crate::engine::session::{SessionController, TickOutcome};
use crate::engine::stats;
use crate::model::{Keyword, ScrapeDuration};
use crate::tui::state::AppState;
use crate::tui::TuiCommand;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// One tick advances a running session by one second.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct App {
    session: SessionController,
    backend: Arc<dyn ScraperBackend>,
    state_tx: watch::Sender<AppState>,
    rng: StdRng,
    max_posts_per_tick: u64,
    recent_posts: usize,
}

impl App {
    pub fn new(
        config: &Config,
        backend: Arc<dyn ScraperBackend>,
        state_tx: watch::Sender<AppState>,
    ) -> Self {
        let session = SessionController::new(ScrapeDuration::from_minutes(
            config.session.default_minutes,
        ));
        let app = Self {
            session,
            backend,
            state_tx,
            rng: StdRng::from_entropy(),
            max_posts_per_tick: config.session.max_posts_per_tick,
            recent_posts: config.ui.recent_posts,
        };
        app.publish_session();
        app
    }

    /// Replace the tick RNG, for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Main loop. Returns when the TUI quits or the command channel closes.
    pub async fn run(mut self, mut cmd_rx: mpsc::Receiver<TuiCommand>) {
        self.refresh_status().await;
        self.refresh_dashboard().await;
        self.refresh_posts().await;

        // Missed ticks (e.g. while awaiting a slow backend) are replayed so
        // elapsed time keeps pace with the wall clock.
        let mut interval = tokio::time::interval_at(
            tokio::time::Instant::now() + TICK_INTERVAL,
            TICK_INTERVAL,
        );
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => {
                        let was_running = self.session.is_running();
                        if !self.handle(cmd).await {
                            break;
                        }
                        // A new session gets its first tick one period after it started.
                        if !was_running && self.session.is_running() {
                            interval.reset();
                        }
                    }
                    None => break,
                },
                _ = interval.tick() => self.on_tick(),
            }
        }
        tracing::debug!("engine loop finished");
    }

    /// Apply one command. Returns false on quit.
    pub async fn handle(&mut self, cmd: TuiCommand) -> bool {
        tracing::debug!(?cmd, "command");
        match cmd {
            TuiCommand::Quit => return false,
            TuiCommand::Start => self.start().await,
            TuiCommand::Stop => self.stop().await,
            TuiCommand::SetDuration(d) => {
                let result = self.session.set_duration(d);
                self.settings_result(result.map(|_| format!("duration set to {}", d)));
            }
            TuiCommand::ToggleInstaExplore => {
                let next = !self.session.run_insta_explore();
                let result = self.session.set_run_insta_explore(next);
                self.settings_result(result.map(|_| {
                    format!("Instagram Explore {}", if next { "enabled" } else { "disabled" })
                }));
            }
            TuiCommand::ToggleTwitterHome => {
                let next = !self.session.run_twitter_home();
                let result = self.session.set_run_twitter_home(next);
                self.settings_result(result.map(|_| {
                    format!("Twitter Home {}", if next { "enabled" } else { "disabled" })
                }));
            }
            TuiCommand::AddKeyword(k) => self.add_keyword(k),
            TuiCommand::RemoveKeyword(k) => {
                let result = self.session.remove_keyword(k.platform, &k.value);
                self.settings_result(result.map(|removed| {
                    if removed {
                        format!("removed keyword {} [{}]", k.value, k.platform)
                    } else {
                        format!("keyword {} [{}] not present", k.value, k.platform)
                    }
                }));
            }
            TuiCommand::CyclePlatformFilter => {
                self.state_tx
                    .send_modify(|s| s.dashboard_filter = s.dashboard_filter.next());
                self.refresh_dashboard().await;
            }
            TuiCommand::RefreshDashboard => self.refresh_dashboard().await,
            TuiCommand::SetPostView(view) => {
                self.state_tx.send_modify(|s| {
                    s.posts_query.view = view;
                    s.paginator.reset();
                });
                self.refresh_posts().await;
            }
            TuiCommand::SetSearch(search) => {
                self.state_tx.send_modify(|s| {
                    s.posts_query.search = search;
                    s.paginator.reset();
                });
                self.refresh_posts().await;
            }
            TuiCommand::SetMinLikes(min) => {
                self.state_tx.send_modify(|s| {
                    s.posts_query.min_likes = min;
                    s.paginator.reset();
                });
                self.refresh_posts().await;
            }
            TuiCommand::NextPage => self.state_tx.send_modify(|s| {
                let total = s.posts.len();
                s.paginator.next(total);
            }),
            TuiCommand::PrevPage => self.state_tx.send_modify(|s| s.paginator.prev()),
            TuiCommand::RefreshPosts => self.refresh_posts().await,
        }
        true
    }

    /// One timer tick: advance the running session by a pseudo-random
    /// number of posts.
    pub fn on_tick(&mut self) {
        if !self.session.is_running() {
            return;
        }
        let increment = self.rng.gen_range(0..=self.max_posts_per_tick);
        let outcome = self.session.tick(increment);
        self.publish_session();
        if outcome == TickOutcome::Completed {
            let stats = self.session.stats().clone();
            tracing::info!(
                posts = stats.posts_scraped,
                elapsed = stats.elapsed_secs,
                "session completed"
            );
            self.log(
                "INFO",
                format!(
                    "session completed: {} posts in {}",
                    stats.posts_scraped,
                    crate::engine::session::format_elapsed(stats.elapsed_secs)
                ),
            );
        }
    }

    async fn start(&mut self) {
        let request = match self.session.start_request() {
            Ok(r) => r,
            Err(e) => {
                self.reject(e.to_string());
                return;
            }
        };

        self.state_tx.send_modify(|s| {
            s.control_busy = true;
            s.control_error = None;
        });

        let result = self.backend.start(&request).await;
        self.state_tx.send_modify(|s| s.control_busy = false);

        match result {
            Ok(()) => match self.session.start(Utc::now()) {
                Ok(()) => {
                    tracing::info!(
                        duration = request.duration,
                        keywords = request.keywords.len(),
                        tasks = self.session.stats().active_tasks,
                        "scraper started"
                    );
                    self.log(
                        "INFO",
                        format!(
                            "scraper started for {} ({} tasks)",
                            self.session.duration(),
                            self.session.stats().active_tasks
                        ),
                    );
                }
                Err(e) => self.reject(e.to_string()),
            },
            Err(e) => {
                tracing::error!("failed to start scraper: {:#}", e);
                self.log("ERROR", format!("start failed: {:#}", e));
                self.state_tx
                    .send_modify(|s| s.control_error = Some(backend::START_FAILED.to_string()));
            }
        }
        self.publish_session();
    }

    async fn stop(&mut self) {
        if !self.session.is_running() {
            self.reject("scraper is not running".to_string());
            return;
        }
        self.state_tx.send_modify(|s| {
            s.control_busy = true;
            s.control_error = None;
        });
        let result = self.backend.stop().await;
        self.state_tx.send_modify(|s| s.control_busy = false);

        // The local timer is cleared either way; a backend that missed the
        // stop is only reported.
        if let Err(e) = result {
            tracing::warn!("backend stop failed: {:#}", e);
            self.log("WARN", format!("stop failed on backend: {:#}", e));
            self.state_tx
                .send_modify(|s| s.control_error = Some(backend::STOP_FAILED.to_string()));
        }
        self.session.stop();
        let stats = self.session.stats();
        tracing::info!(posts = stats.posts_scraped, elapsed = stats.elapsed_secs, "scraper stopped");
        self.log("INFO", format!("scraper stopped after {} posts", stats.posts_scraped));
        self.publish_session();
    }

    fn add_keyword(&mut self, keyword: Keyword) {
        let platform = keyword.platform;
        match self.session.add_keyword(keyword.clone()) {
            Ok(true) => {
                self.clear_control_error();
                self.log(
                    "INFO",
                    format!("added keyword {} [{}]", keyword.value.trim(), platform),
                );
            }
            Ok(false) => {
                tracing::debug!(value = %keyword.value, %platform, "duplicate keyword ignored");
            }
            Err(e) => self.reject(e.to_string()),
        }
        self.publish_session();
    }

    fn settings_result(&mut self, result: Result<String, crate::engine::session::SessionError>) {
        match result {
            Ok(msg) => {
                self.clear_control_error();
                self.log("INFO", msg);
            }
            Err(e) => self.reject(e.to_string()),
        }
        self.publish_session();
    }

    /// Ask the backend whether a scraper run is already in progress.
    pub async fn refresh_status(&mut self) {
        match self.backend.status().await {
            Ok(status) => {
                tracing::info!(
                    running = status.is_running,
                    posts = status.posts_scraped,
                    elapsed = status.time_elapsed,
                    "backend status"
                );
                if status.is_running {
                    self.log(
                        "INFO",
                        format!(
                            "backend reports a running scraper: {} posts in {}",
                            status.posts_scraped,
                            crate::engine::session::format_elapsed(status.time_elapsed)
                        ),
                    );
                }
                self.state_tx.send_modify(|s| s.backend_status = Some(status));
            }
            Err(e) => {
                tracing::warn!("failed to fetch scraper status: {:#}", e);
                self.log("WARN", format!("status check failed: {:#}", e));
                self.state_tx.send_modify(|s| s.backend_status = None);
            }
        }
    }

    pub async fn refresh_dashboard(&mut self) {
        let filter = self.state_tx.borrow().dashboard_filter;
        let stats = self.backend.dashboard_stats(filter).await;
        let posts = self.backend.posts(&PostQuery::default()).await;

        match (stats, posts) {
            (Ok(stats), Ok(posts)) => {
                let recent = stats::recent(&posts, filter, self.recent_posts);
                self.state_tx.send_modify(|s| {
                    s.dashboard = Some(stats);
                    s.recent_posts = recent;
                    s.dashboard_error = None;
                });
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(filter = filter.label(), "failed to load dashboard: {:#}", e);
                self.log("ERROR", format!("dashboard load failed: {:#}", e));
                self.state_tx.send_modify(|s| {
                    s.dashboard = None;
                    s.recent_posts.clear();
                    s.dashboard_error = Some(backend::STATS_UNAVAILABLE.to_string());
                });
            }
        }
    }

    pub async fn refresh_posts(&mut self) {
        let query = self.state_tx.borrow().posts_query.clone();
        self.state_tx.send_modify(|s| {
            s.posts_loading = true;
            s.posts_error = None;
        });

        let result = self.backend.posts(&query).await;
        match result {
            Ok(posts) => {
                tracing::debug!(view = query.view.label(), count = posts.len(), "posts loaded");
                self.state_tx.send_modify(|s| {
                    s.paginator.clamp(posts.len());
                    s.posts = posts;
                    s.posts_loading = false;
                });
            }
            Err(e) => {
                tracing::error!(view = query.view.label(), "failed to load posts: {:#}", e);
                self.log("ERROR", format!("posts load failed: {:#}", e));
                self.state_tx.send_modify(|s| {
                    s.posts.clear();
                    s.paginator.reset();
                    s.posts_loading = false;
                    s.posts_error = Some(backend::POSTS_UNAVAILABLE.to_string());
                });
            }
        }
    }

    fn publish_session(&self) {
        let session = &self.session;
        self.state_tx.send_modify(|s| {
            s.is_running = session.is_running();
            s.duration = session.duration();
            s.run_insta_explore = session.run_insta_explore();
            s.run_twitter_home = session.run_twitter_home();
            s.keywords = session.keywords().to_vec();
            s.session = session.stats().clone();
            s.progress_percent = session.progress_percent();
        });
    }

    fn reject(&self, message: String) {
        tracing::warn!(%message, "command rejected");
        self.log("WARN", message.clone());
        self.state_tx.send_modify(|s| s.control_error = Some(message));
    }

    fn clear_control_error(&self) {
        self.state_tx.send_modify(|s| s.control_error = None);
    }

    fn log(&self, level: &str, message: String) {
        self.state_tx.send_modify(|s| s.push_log(level, message));
    }
}
