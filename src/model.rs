use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared record types. Everything here is plain data exchanged between the
/// session engine, the backends and the TUI.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    #[serde(alias = "instagram", alias = "Instagram")]
    Instagram,
    #[serde(alias = "twitter", alias = "Twitter")]
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Instagram, Platform::Twitter];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
        }
    }

    /// Lowercase tag used in query strings and URL paths.
    pub fn tag(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
        }
    }

    /// Short keyword prefix accepted by the keyword input (`ig:` / `tw:`).
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.trim().to_ascii_lowercase().as_str() {
            "ig" | "insta" | "instagram" => Some(Platform::Instagram),
            "tw" | "x" | "twitter" => Some(Platform::Twitter),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which feed a post was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[serde(alias = "Explore")]
    Explore,
    #[serde(alias = "Search")]
    Search,
    #[serde(alias = "Home")]
    Home,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::Explore => "Explore",
            Source::Search => "Search",
            Source::Home => "Home",
        }
    }
}

/// Platform selector used by the dashboard page and the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Twitter,
    Instagram,
}

impl PlatformFilter {
    pub fn label(self) -> &'static str {
        match self {
            PlatformFilter::All => "All Platforms",
            PlatformFilter::Twitter => "Twitter",
            PlatformFilter::Instagram => "Instagram",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PlatformFilter::All => PlatformFilter::Twitter,
            PlatformFilter::Twitter => PlatformFilter::Instagram,
            PlatformFilter::Instagram => PlatformFilter::All,
        }
    }

    pub fn platform(self) -> Option<Platform> {
        match self {
            PlatformFilter::All => None,
            PlatformFilter::Twitter => Some(Platform::Twitter),
            PlatformFilter::Instagram => Some(Platform::Instagram),
        }
    }

    pub fn matches(self, platform: Platform) -> bool {
        self.platform().is_none_or(|p| p == platform)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    pub platform: Platform,
    pub value: String,
}

impl Keyword {
    pub fn new(platform: Platform, value: impl Into<String>) -> Self {
        Self {
            platform,
            value: value.into(),
        }
    }

    /// Parse keyword input. `tw:rust` / `ig:rust` select the platform;
    /// anything without a recognised prefix goes to `default`.
    pub fn parse(input: &str, default: Platform) -> Self {
        if let Some((prefix, rest)) = input.split_once(':') {
            if let Some(platform) = Platform::from_prefix(prefix) {
                return Self::new(platform, rest.trim());
            }
        }
        Self::new(default, input.trim())
    }
}

/// A scraped post. Never mutated after it is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub platform: Platform,
    pub source: Source,
    #[serde(default)]
    pub keyword: Option<String>,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub text: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub reposts: Option<u64>,
    #[serde(default)]
    pub replies: Option<u64>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub link: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

/// How long a session runs before it completes on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeDuration {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Default for ScrapeDuration {
    fn default() -> Self {
        Self::from_minutes(10)
    }
}

impl ScrapeDuration {
    pub fn from_minutes(minutes: u32) -> Self {
        Self::from_total_seconds(u64::from(minutes) * 60)
    }

    pub fn from_total_seconds(total: u64) -> Self {
        let hours = (total / 3600).min(u64::from(u32::MAX)) as u32;
        Self {
            hours,
            minutes: ((total % 3600) / 60) as u32,
            seconds: (total % 60) as u32,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Parse `H:M:S`, `M:S` or a bare number of minutes. Components are
    /// normalised, so `0:90:00` becomes 1h 30m.
    pub fn parse(input: &str) -> Option<Self> {
        let parts: Vec<&str> = input.trim().split(':').collect();
        let nums: Option<Vec<u64>> = parts.iter().map(|p| p.trim().parse::<u64>().ok()).collect();
        let total = match nums?.as_slice() {
            [m] => m.checked_mul(60)?,
            [m, s] => m.checked_mul(60)?.checked_add(*s)?,
            [h, m, s] => h
                .checked_mul(3600)?
                .checked_add(m.checked_mul(60)?)?
                .checked_add(*s)?,
            _ => return None,
        };
        Some(Self::from_total_seconds(total))
    }
}

impl fmt::Display for ScrapeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {:02}m {:02}s", self.hours, self.minutes, self.seconds)
    }
}

/// Live counters for the current (or last) session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub started_at: Option<DateTime<Utc>>,
    pub posts_scraped: u64,
    pub posts_per_minute: u64,
    pub elapsed_secs: u64,
    pub active_tasks: u32,
}

/// Body of `POST /scraper/start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    /// Total session length in seconds.
    pub duration: u64,
    pub run_insta_explore: bool,
    pub run_twitter_home: bool,
    pub keywords: Vec<Keyword>,
}

/// Response of `GET /scraper/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperStatus {
    pub is_running: bool,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub posts_scraped: u64,
    #[serde(default)]
    pub posts_per_minute: u64,
    #[serde(default)]
    pub time_elapsed: u64,
}
