use crate::domain::model::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Related posts are picked from this many most recent posts.
pub const RELATED_WINDOW: usize = 30;

pub const DEFAULT_RELATED_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Search box, category select and sort select of the home feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub search: String,
    /// `None` or `"all"` matches every category.
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl FeedQuery {
    pub fn matches(&self, post: &Post) -> bool {
        let term = self.search.trim().to_lowercase();
        let text_match = term.is_empty()
            || post.title.to_lowercase().contains(&term)
            || post.description.to_lowercase().contains(&term);

        let category_match = match self.category.as_deref() {
            None | Some("all") => true,
            Some(wanted) => post.category.as_deref() == Some(wanted),
        };

        text_match && category_match
    }

    pub fn apply<'a>(&self, posts: &'a BTreeMap<String, Post>) -> Vec<(&'a str, &'a Post)> {
        let mut filtered: Vec<(&str, &Post)> = posts
            .iter()
            .filter(|(_, post)| self.matches(post))
            .map(|(id, post)| (id.as_str(), post))
            .collect();
        sort_posts(&mut filtered, self.sort);
        filtered
    }
}

pub fn sort_posts(posts: &mut [(&str, &Post)], order: SortOrder) {
    posts.sort_by(|(_, a), (_, b)| {
        let (a, b) = (a.timestamp.unwrap_or(0), b.timestamp.unwrap_or(0));
        match order {
            SortOrder::Newest => b.cmp(&a),
            SortOrder::Oldest => a.cmp(&b),
        }
    });
}

/// Distinct non-empty categories, sorted.
pub fn categories(posts: &BTreeMap<String, Post>) -> Vec<String> {
    posts
        .values()
        .filter_map(|post| post.category.as_deref())
        .filter(|category| !category.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Newest posts sharing `category`, excluding `current_id`.
pub fn related_posts<'a>(
    posts: &'a BTreeMap<String, Post>,
    category: Option<&str>,
    current_id: &str,
    limit: usize,
) -> Vec<&'a str> {
    let Some(category) = category.filter(|c| !c.trim().is_empty()) else {
        return Vec::new();
    };

    let mut recent: Vec<(&str, &Post)> = posts.iter().map(|(id, p)| (id.as_str(), p)).collect();
    sort_posts(&mut recent, SortOrder::Newest);

    recent
        .into_iter()
        .take(RELATED_WINDOW)
        .filter(|(id, post)| *id != current_id && post.category.as_deref() == Some(category))
        .take(limit)
        .map(|(id, _)| id)
        .collect()
}

/// "October 15, 2026" (UTC).
pub fn long_date(timestamp: Option<i64>) -> String {
    format_millis(timestamp, "%B %-d, %Y")
}

/// "Oct 15, 2026" (UTC).
pub fn short_date(timestamp: Option<i64>) -> String {
    format_millis(timestamp, "%b %-d, %Y")
}

fn format_millis(timestamp: Option<i64>, pattern: &str) -> String {
    timestamp
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| "No date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, category: &str, timestamp: i64) -> Post {
        Post {
            title: title.to_string(),
            category: Some(category.to_string()),
            description: format!("about {}", title.to_lowercase()),
            timestamp: Some(timestamp),
            ..Post::default()
        }
    }

    fn sample() -> BTreeMap<String, Post> {
        let mut posts = BTreeMap::new();
        posts.insert("a".to_string(), post("Music Awards", "Entertainment", 100));
        posts.insert("b".to_string(), post("Election Night", "Politics", 300));
        posts.insert("c".to_string(), post("Movie Review", "Entertainment", 200));
        posts.insert("d".to_string(), post("Derby Recap", "Sports", 400));
        posts
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let posts = sample();
        let ids: Vec<&str> = FeedQuery::default()
            .apply(&posts)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_and_description() {
        let posts = sample();
        let query = FeedQuery {
            search: "  MOVIE ".to_string(),
            ..FeedQuery::default()
        };
        let ids: Vec<&str> = query.apply(&posts).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c"]);

        let query = FeedQuery {
            search: "about derby".to_string(),
            ..FeedQuery::default()
        };
        assert_eq!(query.apply(&posts).len(), 1);
    }

    #[test]
    fn test_category_filter_and_oldest_sort() {
        let posts = sample();
        let query = FeedQuery {
            search: String::new(),
            category: Some("Entertainment".to_string()),
            sort: SortOrder::Oldest,
        };
        let ids: Vec<&str> = query.apply(&posts).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let all = FeedQuery {
            category: Some("all".to_string()),
            ..FeedQuery::default()
        };
        assert_eq!(all.apply(&posts).len(), 4);
    }

    #[test]
    fn test_categories_are_distinct_and_sorted() {
        let mut posts = sample();
        posts.insert("e".to_string(), Post::default());
        assert_eq!(
            categories(&posts),
            vec!["Entertainment", "Politics", "Sports"]
        );
    }

    #[test]
    fn test_related_posts_exclude_current() {
        let posts = sample();
        assert_eq!(
            related_posts(&posts, Some("Entertainment"), "a", DEFAULT_RELATED_LIMIT),
            vec!["c"]
        );
        assert!(related_posts(&posts, None, "a", 3).is_empty());
        assert!(related_posts(&posts, Some("Sports"), "d", 3).is_empty());
    }

    #[test]
    fn test_related_posts_limit() {
        let mut posts = BTreeMap::new();
        for i in 0..6 {
            posts.insert(format!("p{}", i), post("x", "News", i));
        }
        assert_eq!(
            related_posts(&posts, Some("News"), "p5", 3),
            vec!["p4", "p3", "p2"]
        );
    }

    #[test]
    fn test_date_labels() {
        // 2026-10-15T00:00:00Z
        let ts = Some(1_792_022_400_000);
        assert_eq!(long_date(ts), "October 15, 2026");
        assert_eq!(short_date(ts), "Oct 15, 2026");
        assert_eq!(long_date(None), "No date");
    }
}
