pub mod ads;
pub mod config;
pub mod core;
pub mod domain;
pub mod markup;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, RenderSettings};

pub use ads::{distribute, AdDistributor, AdPolicy};
pub use core::{engine::RenderEngine, pipeline::SitePipeline, render::PostRenderer};
pub use markup::{transform, MarkupOptions, MarkupTransformer};
pub use utils::error::{GistError, Result};
