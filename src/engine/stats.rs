//! Aggregate dashboard statistics over a set of posts.

use crate::model::{PlatformFilter, Post};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Upper bounds (exclusive) and labels for the likes histogram.
const LIKE_BUCKETS: [(u64, &str); 6] = [
    (500, "0-500"),
    (1_000, "500-1k"),
    (2_000, "1k-2k"),
    (3_000, "2k-3k"),
    (5_000, "3k-5k"),
    (u64::MAX, "5k+"),
];

const TOP_USERS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_posts: u64,
    pub unique_users: u64,
    pub total_links: u64,
    pub average_likes: u64,
    #[serde(default)]
    pub posts_over_time: Vec<SeriesPoint>,
    #[serde(default)]
    pub likes_distribution: Vec<LikesBucket>,
    #[serde(default)]
    pub top_users: Vec<UserCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: String,
    pub posts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikesBucket {
    pub range: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCount {
    pub name: String,
    pub posts: u64,
}

impl DashboardStats {
    pub fn from_posts(posts: &[Post], filter: PlatformFilter) -> Self {
        let selected: Vec<&Post> = posts.iter().filter(|p| filter.matches(p.platform)).collect();

        let total_posts = selected.len() as u64;
        let unique_users = selected
            .iter()
            .map(|p| p.username.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;
        let total_links = selected.iter().filter(|p| p.link.is_some()).count() as u64;
        let like_sum: u64 = selected.iter().map(|p| p.likes).sum();
        let average_likes = if total_posts == 0 {
            0
        } else {
            (like_sum + total_posts / 2) / total_posts
        };

        let mut per_day = [0u64; 7];
        for p in &selected {
            per_day[p.scraped_at.weekday().num_days_from_monday() as usize] += 1;
        }
        let posts_over_time = WEEKDAYS
            .iter()
            .zip(per_day)
            .map(|(day, posts)| SeriesPoint {
                date: day.to_string(),
                posts,
            })
            .collect();

        let mut buckets = [0u64; LIKE_BUCKETS.len()];
        for p in &selected {
            let idx = LIKE_BUCKETS
                .iter()
                .position(|(upper, _)| p.likes < *upper)
                .unwrap_or(LIKE_BUCKETS.len() - 1);
            buckets[idx] += 1;
        }
        let likes_distribution = LIKE_BUCKETS
            .iter()
            .zip(buckets)
            .map(|((_, label), count)| LikesBucket {
                range: label.to_string(),
                count,
            })
            .collect();

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for p in &selected {
            *counts.entry(p.username.as_str()).or_default() += 1;
        }
        let mut top_users: Vec<UserCount> = counts
            .into_iter()
            .map(|(name, posts)| UserCount {
                name: name.to_string(),
                posts,
            })
            .collect();
        top_users.sort_by(|a, b| b.posts.cmp(&a.posts).then_with(|| a.name.cmp(&b.name)));
        top_users.truncate(TOP_USERS);

        Self {
            total_posts,
            unique_users,
            total_links,
            average_likes,
            posts_over_time,
            likes_distribution,
            top_users,
        }
    }
}

/// The `n` most recently scraped posts matching `filter`, newest first.
pub fn recent(posts: &[Post], filter: PlatformFilter, n: usize) -> Vec<Post> {
    let mut selected: Vec<&Post> = posts.iter().filter(|p| filter.matches(p.platform)).collect();
    selected.sort_by(|a, b| b.scraped_at.cmp(&a.scraped_at));
    selected.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Platform, Source};
    use chrono::{TimeZone, Utc};

    fn post(id: u32, platform: Platform, user: &str, likes: u64, link: bool, day: u32) -> Post {
        Post {
            id: format!("post-{id}"),
            platform,
            source: Source::Home,
            keyword: None,
            username: user.to_string(),
            display_name: None,
            text: "text".to_string(),
            likes,
            comments: 0,
            reposts: None,
            replies: None,
            views: None,
            link: link.then(|| format!("https://example.com/post/{id}")),
            // 2025-01-06 is a Monday
            scraped_at: Utc.with_ymd_and_hms(2025, 1, 6 + day, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post(1, Platform::Twitter, "@webdev", 100, true, 0),
            post(2, Platform::Twitter, "@webdev", 900, false, 0),
            post(3, Platform::Instagram, "@cloudops", 2500, true, 2),
            post(4, Platform::Instagram, "@airesearch", 7000, false, 6),
        ]
    }

    #[test]
    fn test_empty_posts() {
        let stats = DashboardStats::from_posts(&[], PlatformFilter::All);
        assert_eq!(stats.total_posts, 0);
        assert_eq!(stats.average_likes, 0);
        assert_eq!(stats.posts_over_time.len(), 7);
        assert!(stats.posts_over_time.iter().all(|p| p.posts == 0));
        assert!(stats.top_users.is_empty());
    }

    #[test]
    fn test_aggregates_all_platforms() {
        let stats = DashboardStats::from_posts(&sample(), PlatformFilter::All);
        assert_eq!(stats.total_posts, 4);
        assert_eq!(stats.unique_users, 3);
        assert_eq!(stats.total_links, 2);
        // (100 + 900 + 2500 + 7000) / 4 = 2625
        assert_eq!(stats.average_likes, 2625);
    }

    #[test]
    fn test_platform_filter() {
        let stats = DashboardStats::from_posts(&sample(), PlatformFilter::Twitter);
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.unique_users, 1);
        assert_eq!(stats.average_likes, 500);
    }

    #[test]
    fn test_posts_over_time_by_weekday() {
        let stats = DashboardStats::from_posts(&sample(), PlatformFilter::All);
        let series: Vec<(&str, u64)> = stats
            .posts_over_time
            .iter()
            .map(|p| (p.date.as_str(), p.posts))
            .collect();
        assert_eq!(
            series,
            vec![("Mon", 2), ("Tue", 0), ("Wed", 1), ("Thu", 0), ("Fri", 0), ("Sat", 0), ("Sun", 1)]
        );
    }

    #[test]
    fn test_likes_distribution_buckets() {
        let stats = DashboardStats::from_posts(&sample(), PlatformFilter::All);
        let counts: Vec<u64> = stats.likes_distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 1, 0, 1]);
        assert_eq!(stats.likes_distribution[5].range, "5k+");
    }

    #[test]
    fn test_top_users_order() {
        let stats = DashboardStats::from_posts(&sample(), PlatformFilter::All);
        let names: Vec<&str> = stats.top_users.iter().map(|u| u.name.as_str()).collect();
        // ties broken alphabetically
        assert_eq!(names, vec!["@webdev", "@airesearch", "@cloudops"]);
        assert_eq!(stats.top_users[0].posts, 2);
    }

    #[test]
    fn test_recent_newest_first() {
        let posts = sample();
        let recent = recent(&posts, PlatformFilter::All, 2);
        let ids: Vec<&str> = recent.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["post-4", "post-3"]);
    }

    #[test]
    fn test_stats_response_parses() {
        let json = r#"{
            "totalPosts": 1247, "uniqueUsers": 312, "totalLinks": 438, "averageLikes": 1823,
            "postsOverTime": [{"date": "Mon", "posts": 45}],
            "likesDistribution": [{"range": "0-500", "count": 120}],
            "topUsers": [{"name": "@techguru", "posts": 89}]
        }"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_posts, 1247);
        assert_eq!(stats.top_users[0].name, "@techguru");
    }
}
