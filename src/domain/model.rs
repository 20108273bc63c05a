use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One `blogPosts/<id>` record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default, deserialize_with = "lenient_millis")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient_millis")]
    pub last_modified: Option<i64>,
}

impl Post {
    /// Body text; a missing body renders as empty.
    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.trim().is_empty() => category,
            _ => "General",
        }
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.img.as_deref().filter(|img| !img.trim().is_empty())
    }
}

/// A dump of the document store: `{"blogPosts": {...}, "postViews": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "blogPosts", default, deserialize_with = "map_skipping_null")]
    pub posts: BTreeMap<String, Post>,
    #[serde(rename = "postViews", default, deserialize_with = "map_skipping_null")]
    pub views: BTreeMap<String, u64>,
}

impl Snapshot {
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.get(id)
    }
}

/// Where the snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapshotSource {
    /// JSON export, read through `Storage`.
    File { path: String },
    /// The store's REST root; `blogPosts.json` and `postViews.json` are
    /// fetched below it.
    Http {
        endpoint: String,
        #[serde(default)]
        timeout_seconds: Option<u64>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedPost {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image: Option<String>,
    pub timestamp: Option<i64>,
    pub date_label: String,
    pub short_date: String,
    pub views: u64,
    pub html: String,
    pub ad_slots: usize,
    pub related: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    /// Feed order, newest first.
    pub posts: Vec<RenderedPost>,
    pub categories: Vec<String>,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts numbers, numeric strings (leading digits, like `parseInt`) and
/// server placeholders the store has not resolved yet.
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            let end = trimmed
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
                .map(|(i, _)| i)
                .unwrap_or(trimmed.len());
            trimmed[..end].parse().ok()
        }
        _ => None,
    })
}

fn map_skipping_null<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<BTreeMap<String, Option<T>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}
