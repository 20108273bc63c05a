use crate::ads::AdPolicy;
use crate::domain::model::{RenderResult, Snapshot, SnapshotSource};
use crate::markup::MarkupOptions;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> &SnapshotSource;
    fn output_path(&self) -> &str;
    fn markup_options(&self) -> &MarkupOptions;
    fn ad_policy(&self) -> &AdPolicy;
    fn related_limit(&self) -> usize;
    /// Zip bundle file name, when bundling is on.
    fn bundle_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Snapshot>;
    async fn transform(&self, snapshot: Snapshot) -> Result<RenderResult>;
    async fn load(&self, result: RenderResult) -> Result<String>;
}
