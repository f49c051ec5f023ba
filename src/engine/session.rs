//! Scraper session state machine.
//!
//! Two states: `Idle` and `Running`. Settings (duration, feed toggles,
//! keywords) can only change while idle. While running, each tick advances
//! the elapsed counter by one second and adds a caller-supplied increment to
//! the scraped-post counter. A session that reaches its configured duration
//! completes and drops back to `Idle` on its own.

use super::keywords::KeywordSet;
use crate::model::{Keyword, Platform, ScrapeDuration, SessionStats, StartRequest};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("scraper is already running")]
    AlreadyRunning,
    #[error("settings are locked while the scraper is running")]
    Locked,
    #[error("keyword cannot be empty")]
    EmptyKeyword,
    #[error("duration must be greater than zero")]
    ZeroDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session running; nothing changed.
    Idle,
    Running,
    /// This tick reached the configured duration; the session is now idle.
    Completed,
}

#[derive(Debug, Clone)]
pub struct SessionController {
    state: SessionState,
    duration: ScrapeDuration,
    run_insta_explore: bool,
    run_twitter_home: bool,
    keywords: KeywordSet,
    stats: SessionStats,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(ScrapeDuration::default())
    }
}

impl SessionController {
    pub fn new(duration: ScrapeDuration) -> Self {
        Self {
            state: SessionState::Idle,
            duration,
            run_insta_explore: false,
            run_twitter_home: false,
            keywords: KeywordSet::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn duration(&self) -> ScrapeDuration {
        self.duration
    }

    pub fn run_insta_explore(&self) -> bool {
        self.run_insta_explore
    }

    pub fn run_twitter_home(&self) -> bool {
        self.run_twitter_home
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_running() {
            return Err(SessionError::Locked);
        }
        Ok(())
    }

    pub fn set_duration(&mut self, duration: ScrapeDuration) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.duration = duration;
        Ok(())
    }

    pub fn set_run_insta_explore(&mut self, enabled: bool) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.run_insta_explore = enabled;
        Ok(())
    }

    pub fn set_run_twitter_home(&mut self, enabled: bool) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.run_twitter_home = enabled;
        Ok(())
    }

    /// Adds a keyword, trimming its value. `Ok(false)` means it was a duplicate.
    pub fn add_keyword(&mut self, keyword: Keyword) -> Result<bool, SessionError> {
        self.ensure_idle()?;
        let value = keyword.value.trim();
        if value.is_empty() {
            return Err(SessionError::EmptyKeyword);
        }
        Ok(self.keywords.insert(Keyword::new(keyword.platform, value)))
    }

    pub fn remove_keyword(&mut self, platform: Platform, value: &str) -> Result<bool, SessionError> {
        self.ensure_idle()?;
        Ok(self.keywords.remove(platform, value))
    }

    /// Number of scraping tasks the current settings would run: one per
    /// enabled feed plus one search task per platform with keywords.
    pub fn planned_tasks(&self) -> u32 {
        u32::from(self.run_insta_explore)
            + u32::from(self.run_twitter_home)
            + self.keywords.platforms().len() as u32
    }

    /// Body for `POST /scraper/start`, validated against the current state.
    pub fn start_request(&self) -> Result<StartRequest, SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        let duration = self.duration.total_seconds();
        if duration == 0 {
            return Err(SessionError::ZeroDuration);
        }
        Ok(StartRequest {
            duration,
            run_insta_explore: self.run_insta_explore,
            run_twitter_home: self.run_twitter_home,
            keywords: self.keywords.to_vec(),
        })
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        if self.duration.total_seconds() == 0 {
            return Err(SessionError::ZeroDuration);
        }
        self.stats = SessionStats {
            started_at: Some(now),
            posts_scraped: 0,
            posts_per_minute: 0,
            elapsed_secs: 0,
            active_tasks: self.planned_tasks(),
        };
        self.state = SessionState::Running;
        Ok(())
    }

    /// Returns false when there was nothing to stop. Stats of the finished
    /// session stay visible until the next start.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = SessionState::Idle;
        self.stats.active_tasks = 0;
        true
    }

    pub fn tick(&mut self, increment: u64) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        self.stats.elapsed_secs += 1;
        self.stats.posts_scraped = self.stats.posts_scraped.saturating_add(increment);
        self.stats.posts_per_minute =
            posts_per_minute(self.stats.posts_scraped, self.stats.elapsed_secs);

        let total = self.duration.total_seconds();
        if total > 0 && self.stats.elapsed_secs >= total {
            self.stop();
            return TickOutcome::Completed;
        }
        TickOutcome::Running
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.stats.elapsed_secs, self.duration.total_seconds())
    }
}

/// `min(elapsed / total, 1) * 100`; zero when no duration is set.
pub fn progress_percent(elapsed_secs: u64, total_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    (elapsed_secs as f64 / total_secs as f64).min(1.0) * 100.0
}

/// Rounded posts per minute over the elapsed time.
pub fn posts_per_minute(posts: u64, elapsed_secs: u64) -> u64 {
    if elapsed_secs == 0 {
        return 0;
    }
    (posts.saturating_mul(60) + elapsed_secs / 2) / elapsed_secs
}

/// `"{m}m {s}s"`, minutes unbounded.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(duration_secs: u64) -> SessionController {
        let mut s = SessionController::new(ScrapeDuration::from_total_seconds(duration_secs));
        s.start(Utc::now()).unwrap();
        s
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = SessionController::default();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.duration().total_seconds(), 600);
        assert_eq!(s.stats(), &SessionStats::default());
    }

    #[test]
    fn test_start_resets_stats_and_counts_tasks() {
        let mut s = SessionController::default();
        s.set_run_insta_explore(true).unwrap();
        s.add_keyword(Keyword::new(Platform::Twitter, "rust")).unwrap();
        s.add_keyword(Keyword::new(Platform::Twitter, "tokio")).unwrap();

        let now = Utc::now();
        s.start(now).unwrap();
        assert!(s.is_running());
        assert_eq!(s.stats().started_at, Some(now));
        assert_eq!(s.stats().posts_scraped, 0);
        // explore feed + one twitter search task
        assert_eq!(s.stats().active_tasks, 2);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut s = running(60);
        assert_eq!(s.start(Utc::now()), Err(SessionError::AlreadyRunning));
        assert_eq!(s.start_request(), Err(SessionError::AlreadyRunning));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut s = SessionController::new(ScrapeDuration::from_total_seconds(0));
        assert_eq!(s.start_request(), Err(SessionError::ZeroDuration));
        assert_eq!(s.start(Utc::now()), Err(SessionError::ZeroDuration));
        assert!(!s.is_running());
    }

    #[test]
    fn test_settings_locked_while_running() {
        let mut s = running(60);
        assert_eq!(s.set_duration(ScrapeDuration::from_minutes(5)), Err(SessionError::Locked));
        assert_eq!(s.set_run_twitter_home(true), Err(SessionError::Locked));
        assert_eq!(
            s.add_keyword(Keyword::new(Platform::Twitter, "x")),
            Err(SessionError::Locked)
        );
        assert_eq!(s.remove_keyword(Platform::Twitter, "x"), Err(SessionError::Locked));
    }

    #[test]
    fn test_add_keyword_trims_and_dedups() {
        let mut s = SessionController::default();
        assert_eq!(s.add_keyword(Keyword::new(Platform::Instagram, "  cats ")), Ok(true));
        assert_eq!(s.add_keyword(Keyword::new(Platform::Instagram, "cats")), Ok(false));
        assert_eq!(s.keywords().len(), 1);
        assert_eq!(
            s.add_keyword(Keyword::new(Platform::Instagram, "   ")),
            Err(SessionError::EmptyKeyword)
        );
    }

    #[test]
    fn test_start_request_carries_settings() {
        let mut s = SessionController::new(ScrapeDuration { hours: 0, minutes: 2, seconds: 5 });
        s.set_run_twitter_home(true).unwrap();
        s.add_keyword(Keyword::new(Platform::Instagram, "food")).unwrap();
        let req = s.start_request().unwrap();
        assert_eq!(req.duration, 125);
        assert!(req.run_twitter_home);
        assert!(!req.run_insta_explore);
        assert_eq!(req.keywords, vec![Keyword::new(Platform::Instagram, "food")]);
    }

    #[test]
    fn test_tick_advances_counters() {
        let mut s = running(600);
        assert_eq!(s.tick(3), TickOutcome::Running);
        assert_eq!(s.tick(0), TickOutcome::Running);
        assert_eq!(s.tick(5), TickOutcome::Running);
        assert_eq!(s.stats().elapsed_secs, 3);
        assert_eq!(s.stats().posts_scraped, 8);
        // 8 posts in 3s -> 160/min
        assert_eq!(s.stats().posts_per_minute, 160);
    }

    #[test]
    fn test_counters_monotonic_while_running() {
        let mut s = running(10_000);
        let mut last = s.stats().clone();
        for i in 0..500u64 {
            s.tick(i % 7);
            let now = s.stats();
            assert!(now.elapsed_secs > last.elapsed_secs);
            assert!(now.posts_scraped >= last.posts_scraped);
            last = now.clone();
        }
    }

    #[test]
    fn test_stop_then_tick_is_noop() {
        let mut s = running(600);
        s.tick(2);
        assert!(s.stop());
        assert!(!s.is_running());
        assert_eq!(s.tick(10), TickOutcome::Idle);
        assert_eq!(s.stats().elapsed_secs, 1);
        assert_eq!(s.stats().posts_scraped, 2);
        assert_eq!(s.stats().active_tasks, 0);
        // second stop has nothing to do
        assert!(!s.stop());
    }

    #[test]
    fn test_session_completes_at_duration() {
        let mut s = running(3);
        assert_eq!(s.tick(1), TickOutcome::Running);
        assert_eq!(s.tick(1), TickOutcome::Running);
        assert_eq!(s.tick(1), TickOutcome::Completed);
        assert!(!s.is_running());
        assert_eq!(s.progress_percent(), 100.0);
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut s = running(600);
        s.tick(4);
        s.stop();
        s.start(Utc::now()).unwrap();
        assert_eq!(s.stats().elapsed_secs, 0);
        assert_eq!(s.stats().posts_scraped, 0);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 600), 0.0);
        assert_eq!(progress_percent(300, 600), 50.0);
        assert_eq!(progress_percent(600, 600), 100.0);
        assert_eq!(progress_percent(900, 600), 100.0);
        assert_eq!(progress_percent(5, 0), 0.0);
    }

    #[test]
    fn test_progress_never_exceeds_100() {
        for total in [1u64, 7, 60, 3600] {
            for elapsed in [0u64, 1, 59, 60, 3599, 3600, 10_000] {
                let p = progress_percent(elapsed, total);
                assert!((0.0..=100.0).contains(&p), "{elapsed}/{total} -> {p}");
            }
        }
    }

    #[test]
    fn test_posts_per_minute_rounding() {
        assert_eq!(posts_per_minute(0, 0), 0);
        assert_eq!(posts_per_minute(10, 60), 10);
        assert_eq!(posts_per_minute(1, 40), 2); // 1.5 rounds up
        assert_eq!(posts_per_minute(1, 200), 0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0m 0s");
        assert_eq!(format_elapsed(59), "0m 59s");
        assert_eq!(format_elapsed(61), "1m 1s");
        assert_eq!(format_elapsed(3725), "62m 5s");
    }
}
