//! Post listing: view selection, filtering, column layout and pagination.

use crate::model::{Platform, Post, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostView {
    #[default]
    All,
    InstagramExplore,
    InstagramSearch,
    TwitterHome,
    TwitterSearch,
}

impl PostView {
    pub const ALL: [PostView; 5] = [
        PostView::All,
        PostView::InstagramExplore,
        PostView::InstagramSearch,
        PostView::TwitterHome,
        PostView::TwitterSearch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PostView::All => "All",
            PostView::InstagramExplore => "Instagram Explore",
            PostView::InstagramSearch => "Instagram Search",
            PostView::TwitterHome => "Twitter Home",
            PostView::TwitterSearch => "Twitter Search",
        }
    }

    /// Path segment under `/posts/`.
    pub fn path(self) -> &'static str {
        match self {
            PostView::All => "all",
            PostView::InstagramExplore => "instagram/explore",
            PostView::InstagramSearch => "instagram/search",
            PostView::TwitterHome => "twitter/home",
            PostView::TwitterSearch => "twitter/search",
        }
    }

    pub fn scope(self) -> Option<(Platform, Source)> {
        match self {
            PostView::All => None,
            PostView::InstagramExplore => Some((Platform::Instagram, Source::Explore)),
            PostView::InstagramSearch => Some((Platform::Instagram, Source::Search)),
            PostView::TwitterHome => Some((Platform::Twitter, Source::Home)),
            PostView::TwitterSearch => Some((Platform::Twitter, Source::Search)),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            PostView::All => ALL_COLUMNS,
            PostView::InstagramExplore => INSTA_EXPLORE_COLUMNS,
            PostView::InstagramSearch => INSTA_SEARCH_COLUMNS,
            PostView::TwitterHome => TWITTER_HOME_COLUMNS,
            PostView::TwitterSearch => TWITTER_SEARCH_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Platform,
    Source,
    Keyword,
    User,
    Content,
    Username,
    Caption,
    Name,
    Handle,
    Tweet,
    Likes,
    Reposts,
    Replies,
    Views,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub label: &'static str,
    pub align_right: bool,
}

const fn col(key: ColumnKey, label: &'static str) -> Column {
    Column { key, label, align_right: false }
}

const fn num(key: ColumnKey, label: &'static str) -> Column {
    Column { key, label, align_right: true }
}

const ALL_COLUMNS: &[Column] = &[
    col(ColumnKey::Platform, "Platform"),
    col(ColumnKey::Source, "Source"),
    col(ColumnKey::Keyword, "Keyword"),
    col(ColumnKey::User, "User"),
    col(ColumnKey::Content, "Content"),
    num(ColumnKey::Likes, "Likes"),
    col(ColumnKey::Date, "Date"),
    col(ColumnKey::Time, "Time"),
];

const INSTA_EXPLORE_COLUMNS: &[Column] = &[
    col(ColumnKey::Username, "Username"),
    col(ColumnKey::Caption, "Caption"),
    num(ColumnKey::Likes, "Likes"),
    col(ColumnKey::Date, "Date"),
    col(ColumnKey::Time, "Time"),
];

const INSTA_SEARCH_COLUMNS: &[Column] = &[
    col(ColumnKey::Keyword, "Keyword"),
    col(ColumnKey::Username, "Username"),
    col(ColumnKey::Caption, "Caption"),
    num(ColumnKey::Likes, "Likes"),
    col(ColumnKey::Date, "Date"),
    col(ColumnKey::Time, "Time"),
];

const TWITTER_HOME_COLUMNS: &[Column] = &[
    col(ColumnKey::Name, "Name"),
    col(ColumnKey::Handle, "Handle"),
    col(ColumnKey::Tweet, "Tweet"),
    num(ColumnKey::Likes, "Likes"),
    num(ColumnKey::Reposts, "Reposts"),
    num(ColumnKey::Replies, "Replies"),
    num(ColumnKey::Views, "Views"),
    col(ColumnKey::Date, "Date"),
    col(ColumnKey::Time, "Time"),
];

const TWITTER_SEARCH_COLUMNS: &[Column] = &[
    col(ColumnKey::Keyword, "Keyword"),
    col(ColumnKey::Name, "Name"),
    col(ColumnKey::Handle, "Handle"),
    col(ColumnKey::Tweet, "Tweet"),
    num(ColumnKey::Likes, "Likes"),
    num(ColumnKey::Reposts, "Reposts"),
    num(ColumnKey::Replies, "Replies"),
    num(ColumnKey::Views, "Views"),
    col(ColumnKey::Date, "Date"),
    col(ColumnKey::Time, "Time"),
];

pub const MISSING: &str = "\u{2014}";

/// Display text for one table cell.
pub fn cell_value(post: &Post, key: ColumnKey) -> String {
    match key {
        ColumnKey::Platform => post.platform.label().to_string(),
        ColumnKey::Source => post.source.label().to_string(),
        ColumnKey::Keyword => post.keyword.clone().unwrap_or_else(|| MISSING.to_string()),
        ColumnKey::User | ColumnKey::Username | ColumnKey::Handle => post.username.clone(),
        ColumnKey::Name => post
            .display_name
            .clone()
            .unwrap_or_else(|| MISSING.to_string()),
        ColumnKey::Content | ColumnKey::Caption | ColumnKey::Tweet => post.text.clone(),
        ColumnKey::Likes => format_count(post.likes),
        ColumnKey::Reposts => optional_count(post.reposts),
        ColumnKey::Replies => optional_count(post.replies),
        ColumnKey::Views => optional_count(post.views),
        ColumnKey::Date => post.scraped_at.format("%Y-%m-%d").to_string(),
        ColumnKey::Time => post.scraped_at.format("%H:%M").to_string(),
    }
}

fn optional_count(v: Option<u64>) -> String {
    v.map(format_count).unwrap_or_else(|| MISSING.to_string())
}

/// Thousands-separated count: 12345 -> "12,345".
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Filters applied to the post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub view: PostView,
    pub search: String,
    pub min_likes: Option<u64>,
}

impl PostQuery {
    /// Search text with surrounding whitespace and a leading `@` removed.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        let term = term.strip_prefix('@').unwrap_or(term);
        (!term.is_empty()).then_some(term)
    }

    pub fn matches(&self, post: &Post) -> bool {
        if let Some((platform, source)) = self.view.scope() {
            if post.platform != platform || post.source != source {
                return false;
            }
        }
        if let Some(min) = self.min_likes {
            if post.likes < min {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            let term = term.to_lowercase();
            let handle = post.username.to_lowercase();
            let name = post
                .display_name
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default();
            if !handle.contains(&term) && !name.contains(&term) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        posts.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

/// 1-based page cursor over a list of `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn next(&mut self, total: usize) {
        let last = self.total_pages(total).max(1);
        self.page = (self.page + 1).min(last);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Pull the page back into range after the item count shrank.
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.clamp(1, self.total_pages(total).max(1));
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(platform: Platform, source: Source, user: &str, name: Option<&str>, likes: u64) -> Post {
        Post {
            id: "p".to_string(),
            platform,
            source,
            keyword: None,
            username: user.to_string(),
            display_name: name.map(str::to_string),
            text: "hello".to_string(),
            likes,
            comments: 3,
            reposts: None,
            replies: Some(4),
            views: Some(12_000),
            link: None,
            scraped_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_view_filters_platform_and_source() {
        let posts = vec![
            post(Platform::Twitter, Source::Home, "@a", None, 10),
            post(Platform::Twitter, Source::Search, "@b", None, 10),
            post(Platform::Instagram, Source::Explore, "@c", None, 10),
        ];
        let q = PostQuery { view: PostView::TwitterHome, ..Default::default() };
        assert_eq!(q.apply(&posts).len(), 1);
        let q = PostQuery::default();
        assert_eq!(q.apply(&posts).len(), 3);
    }

    #[test]
    fn test_search_matches_handle_or_name_case_insensitive() {
        let p = post(Platform::Twitter, Source::Home, "@DevOps_Ninja", Some("Ops Person"), 10);
        let mut q = PostQuery { search: "devops".to_string(), ..Default::default() };
        assert!(q.matches(&p));
        q.search = "@devops".to_string();
        assert!(q.matches(&p));
        q.search = "person".to_string();
        assert!(q.matches(&p));
        q.search = "nobody".to_string();
        assert!(!q.matches(&p));
        q.search = "   ".to_string();
        assert!(q.matches(&p));
    }

    #[test]
    fn test_min_likes_inclusive() {
        let p = post(Platform::Instagram, Source::Explore, "@a", None, 500);
        let mut q = PostQuery { min_likes: Some(500), ..Default::default() };
        assert!(q.matches(&p));
        q.min_likes = Some(501);
        assert!(!q.matches(&p));
    }

    #[test]
    fn test_columns_per_view() {
        let labels = |v: PostView| v.columns().iter().map(|c| c.label).collect::<Vec<_>>();
        assert_eq!(
            labels(PostView::All),
            vec!["Platform", "Source", "Keyword", "User", "Content", "Likes", "Date", "Time"]
        );
        assert_eq!(labels(PostView::TwitterSearch).len(), 10);
        assert_eq!(labels(PostView::TwitterSearch)[0], "Keyword");
        assert!(PostView::TwitterHome.columns().iter().any(|c| c.label == "Views" && c.align_right));
    }

    #[test]
    fn test_cell_values() {
        let p = post(Platform::Twitter, Source::Home, "@webdev", None, 1234);
        assert_eq!(cell_value(&p, ColumnKey::Likes), "1,234");
        assert_eq!(cell_value(&p, ColumnKey::Views), "12,000");
        assert_eq!(cell_value(&p, ColumnKey::Reposts), MISSING);
        assert_eq!(cell_value(&p, ColumnKey::Name), MISSING);
        assert_eq!(cell_value(&p, ColumnKey::Keyword), MISSING);
        assert_eq!(cell_value(&p, ColumnKey::Date), "2025-03-14");
        assert_eq!(cell_value(&p, ColumnKey::Time), "09:05");
        assert_eq!(cell_value(&p, ColumnKey::Platform), "Twitter");
    }

    #[test]
    fn test_view_cycle_wraps() {
        let mut v = PostView::All;
        for _ in 0..PostView::ALL.len() {
            v = v.next();
        }
        assert_eq!(v, PostView::All);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_paginator_bounds() {
        let mut p = Paginator::new(10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(48), 5);
        p.prev();
        assert_eq!(p.page(), 1);
        for _ in 0..10 {
            p.next(48);
        }
        assert_eq!(p.page(), 5);
        let items: Vec<u32> = (0..48).collect();
        assert_eq!(p.slice(&items), &[40, 41, 42, 43, 44, 45, 46, 47]);
    }

    #[test]
    fn test_paginator_next_on_empty_stays_on_first() {
        let mut p = Paginator::new(10);
        p.next(0);
        assert_eq!(p.page(), 1);
        let empty: Vec<u32> = Vec::new();
        assert!(p.slice(&empty).is_empty());
    }

    #[test]
    fn test_paginator_clamp_and_reset() {
        let mut p = Paginator::new(10);
        for _ in 0..4 {
            p.next(48);
        }
        p.clamp(15);
        assert_eq!(p.page(), 2);
        p.reset();
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let p = Paginator::new(0);
        assert_eq!(p.page_size(), 1);
    }
}
