use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct RenderEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RenderEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting render process...");

        // Extract
        tracing::info!("Reading store snapshot...");
        let snapshot = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} posts and {} view counters",
            snapshot.posts.len(),
            snapshot.views.len()
        );

        // Transform
        tracing::info!("Rendering posts...");
        let result = self.pipeline.transform(snapshot).await?;
        let slots: usize = result.posts.iter().map(|p| p.ad_slots).sum();
        tracing::info!(
            "Rendered {} posts in {} categories ({} ad slots)",
            result.posts.len(),
            result.categories.len(),
            slots
        );

        // Load
        tracing::info!("Writing site files...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Output saved to: {} ({} ms)",
            output_path,
            started.elapsed().as_millis()
        );

        Ok(output_path)
    }
}
