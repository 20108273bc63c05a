use crate::ads::{AdDistributor, AdPolicy};
use crate::domain::feed::{self, FeedQuery};
use crate::domain::model::{Post, RenderResult, RenderedPost, Snapshot};
use crate::domain::views::ViewLedger;
use crate::markup::{MarkupOptions, MarkupTransformer};
use crate::utils::error::{GistError, Result};

/// Turns stored posts into article fragments: markup, then ad slots.
#[derive(Debug, Clone)]
pub struct PostRenderer {
    transformer: MarkupTransformer,
    distributor: AdDistributor,
    related_limit: usize,
}

impl Default for PostRenderer {
    fn default() -> Self {
        Self::new(
            MarkupOptions::default(),
            AdPolicy::default(),
            feed::DEFAULT_RELATED_LIMIT,
        )
    }
}

impl PostRenderer {
    pub fn new(markup: MarkupOptions, ads: AdPolicy, related_limit: usize) -> Self {
        Self {
            transformer: MarkupTransformer::new(markup),
            distributor: AdDistributor::new(ads),
            related_limit,
        }
    }

    /// Article body HTML and the number of ad slots in it.
    pub fn render_body(&self, content: &str) -> (String, usize) {
        let html = self.transformer.transform(content);
        let distribution = self.distributor.distribute(&html);
        (distribution.html, distribution.placeholders)
    }

    pub fn render_post(&self, id: &str, post: &Post, snapshot: &Snapshot, views: &ViewLedger) -> RenderedPost {
        let (html, ad_slots) = self.render_body(post.content_text());
        let related = feed::related_posts(
            &snapshot.posts,
            post.category.as_deref(),
            id,
            self.related_limit,
        )
        .into_iter()
        .map(str::to_string)
        .collect();

        RenderedPost {
            id: id.to_string(),
            title: post.title.clone(),
            category: post.category_label().to_string(),
            description: post.description.clone(),
            image: post.cover_image().map(str::to_string),
            timestamp: post.timestamp,
            date_label: feed::long_date(post.timestamp),
            short_date: feed::short_date(post.timestamp),
            views: views.views(id),
            html,
            ad_slots,
            related,
        }
    }

    /// Renders one post by id, as the article page does.
    pub fn render_one(&self, snapshot: &Snapshot, id: &str) -> Result<RenderedPost> {
        let post = snapshot.post(id).ok_or_else(|| GistError::PostNotFound {
            id: id.to_string(),
        })?;
        let views = ViewLedger::from_counts(snapshot.views.clone());
        Ok(self.render_post(id, post, snapshot, &views))
    }

    /// Renders every post in feed order (newest first).
    pub fn render_all(&self, snapshot: &Snapshot) -> RenderResult {
        let views = ViewLedger::from_counts(snapshot.views.clone());
        let posts = FeedQuery::default()
            .apply(&snapshot.posts)
            .into_iter()
            .map(|(id, post)| self.render_post(id, post, snapshot, &views))
            .collect();

        RenderResult {
            posts,
            categories: feed::categories(&snapshot.posts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.posts.insert(
            "old".to_string(),
            Post {
                title: "Old".to_string(),
                category: Some("News".to_string()),
                content: Some("*first*".to_string()),
                timestamp: Some(1_000),
                ..Post::default()
            },
        );
        snapshot.posts.insert(
            "new".to_string(),
            Post {
                title: "New".to_string(),
                category: Some("News".to_string()),
                content: None,
                timestamp: Some(2_000),
                ..Post::default()
            },
        );
        snapshot.views.insert("old".to_string(), 12);
        snapshot
    }

    #[test]
    fn test_render_all_in_feed_order() {
        let result = PostRenderer::default().render_all(&snapshot());
        let ids: Vec<&str> = result.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(result.categories, vec!["News"]);

        let old = &result.posts[1];
        assert_eq!(old.html, "<strong>first</strong>");
        assert_eq!(old.views, 12);
        assert_eq!(old.related, vec!["new"]);

        let new = &result.posts[0];
        assert_eq!(new.html, "");
        assert_eq!(new.views, 0);
    }

    #[test]
    fn test_render_one_not_found() {
        let err = PostRenderer::default()
            .render_one(&snapshot(), "missing")
            .unwrap_err();
        assert!(matches!(err, GistError::PostNotFound { id } if id == "missing"));
    }

    #[test]
    fn test_long_body_gets_ad_slots() {
        let body = (1..=20).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let (html, slots) = PostRenderer::default().render_body(&body);
        assert_eq!(slots, 3);
        assert!(html.contains("id=\"ad-spot-2\""));
    }
}
