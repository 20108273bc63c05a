use crate::core::render::PostRenderer;
use crate::core::{ConfigProvider, Pipeline, RenderResult, RenderedPost, Snapshot, Storage};
use crate::domain::model::SnapshotSource;
use crate::utils::error::{GistError, Result};
use reqwest::Client;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use zip::write::{FileOptions, ZipWriter};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MANIFEST_FILE: &str = "index.json";
pub const TABLE_FILE: &str = "posts.csv";

/// Reads a store snapshot, renders every post and writes the site files.
pub struct SitePipeline<S: Storage, C: ConfigProvider> {
    input: S,
    output: S,
    config: C,
    client: Client,
    renderer: PostRenderer,
}

#[derive(Debug, Serialize)]
struct FeedManifest<'a> {
    generated_at: String,
    categories: &'a [String],
    posts: Vec<FeedEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct FeedEntry<'a> {
    id: &'a str,
    file: String,
    title: &'a str,
    category: &'a str,
    description: &'a str,
    image: Option<&'a str>,
    timestamp: Option<i64>,
    date: &'a str,
    views: u64,
    ad_slots: usize,
    related: &'a [String],
}

impl<S: Storage, C: ConfigProvider> SitePipeline<S, C> {
    /// `input` resolves file sources, `output` receives the rendered site.
    pub fn new(input: S, output: S, config: C) -> Self {
        let renderer = PostRenderer::new(
            config.markup_options().clone(),
            config.ad_policy().clone(),
            config.related_limit(),
        );
        Self {
            input,
            output,
            config,
            client: Client::new(),
            renderer,
        }
    }

    pub fn renderer(&self) -> &PostRenderer {
        &self.renderer
    }

    /// Fetches the snapshot and renders a single post.
    pub async fn render_post(&self, id: &str) -> Result<RenderedPost> {
        let snapshot = self.extract().await?;
        self.renderer.render_one(&snapshot, id)
    }

    async fn fetch_node(&self, endpoint: &str, node: &str, timeout: Duration) -> Result<serde_json::Value> {
        let url = format!("{}/{}.json", endpoint.trim_end_matches('/'), node);
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).timeout(timeout).send().await?;
        let status = response.status();
        tracing::debug!("Store response status: {}", status);

        if !status.is_success() {
            return Err(GistError::FetchError {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    fn post_file(id: &str) -> String {
        let stem: String = id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("posts/{}.html", stem)
    }

    fn build_manifest(result: &RenderResult) -> Result<Vec<u8>> {
        let manifest = FeedManifest {
            generated_at: chrono::Utc::now().to_rfc3339(),
            categories: &result.categories,
            posts: result
                .posts
                .iter()
                .map(|post| FeedEntry {
                    id: &post.id,
                    file: Self::post_file(&post.id),
                    title: &post.title,
                    category: &post.category,
                    description: &post.description,
                    image: post.image.as_deref(),
                    timestamp: post.timestamp,
                    date: &post.short_date,
                    views: post.views,
                    ad_slots: post.ad_slots,
                    related: &post.related,
                })
                .collect(),
        };
        Ok(serde_json::to_vec_pretty(&manifest)?)
    }

    fn build_table(result: &RenderResult) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "title", "category", "date", "views", "image"])?;
        for post in &result.posts {
            writer.write_record([
                post.id.as_str(),
                post.title.as_str(),
                post.category.as_str(),
                post.short_date.as_str(),
                post.views.to_string().as_str(),
                post.image.as_deref().unwrap_or_default(),
            ])?;
        }
        writer
            .into_inner()
            .map_err(|e| GistError::IoError(e.into_error()))
    }

    fn build_bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in files {
            zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
            zip.write_all(data)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SitePipeline<S, C> {
    async fn extract(&self) -> Result<Snapshot> {
        let snapshot: Snapshot = match self.config.source() {
            SnapshotSource::File { path } => {
                tracing::debug!("Reading snapshot file: {}", path);
                let data = self.input.read_file(path).await?;
                serde_json::from_slice(&data)?
            }
            SnapshotSource::Http {
                endpoint,
                timeout_seconds,
            } => {
                let timeout = Duration::from_secs(timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
                let posts = self.fetch_node(endpoint, "blogPosts", timeout).await?;
                let views = self.fetch_node(endpoint, "postViews", timeout).await?;
                serde_json::from_value(serde_json::json!({
                    "blogPosts": posts,
                    "postViews": views,
                }))?
            }
        };

        if snapshot.posts.is_empty() {
            tracing::warn!("No gist available yet: the snapshot has no posts");
        }
        Ok(snapshot)
    }

    async fn transform(&self, snapshot: Snapshot) -> Result<RenderResult> {
        let result = self.renderer.render_all(&snapshot);
        for post in &result.posts {
            tracing::debug!(
                "Rendered {} ({} bytes, {} ad slots)",
                post.id,
                post.html.len(),
                post.ad_slots
            );
        }
        Ok(result)
    }

    async fn load(&self, result: RenderResult) -> Result<String> {
        let mut files: Vec<(String, Vec<u8>)> = result
            .posts
            .iter()
            .map(|post| (Self::post_file(&post.id), post.html.clone().into_bytes()))
            .collect();
        files.push((MANIFEST_FILE.to_string(), Self::build_manifest(&result)?));
        files.push((TABLE_FILE.to_string(), Self::build_table(&result)?));

        tracing::debug!("Writing {} files to storage", files.len());
        for (name, data) in &files {
            self.output.write_file(name, data).await?;
        }

        let output_path = self.config.output_path().trim_end_matches('/');
        match self.config.bundle_name() {
            Some(bundle) => {
                let zip_data = Self::build_bundle(&files)?;
                tracing::debug!("Writing bundle {} ({} bytes)", bundle, zip_data.len());
                self.output.write_file(bundle, &zip_data).await?;
                Ok(format!("{}/{}", output_path, bundle))
            }
            None => Ok(format!("{}/{}", output_path, MANIFEST_FILE)),
        }
    }
}
