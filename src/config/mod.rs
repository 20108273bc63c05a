pub mod cli;
pub mod toml_config;

use crate::ads::AdPolicy;
use crate::core::ConfigProvider;
use crate::domain::feed::{DEFAULT_RELATED_LIMIT, RELATED_WINDOW};
use crate::domain::model::SnapshotSource;
#[cfg(feature = "cli")]
use crate::markup::ItalicStyle;
use crate::markup::MarkupOptions;
use crate::utils::error::{GistError, Result};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Everything a render run needs, however it was configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub source: SnapshotSource,
    pub output_path: String,
    pub markup: MarkupOptions,
    pub ads: AdPolicy,
    pub related_limit: usize,
    pub bundle: Option<String>,
}

impl RenderSettings {
    pub fn new(source: SnapshotSource, output_path: impl Into<String>) -> Self {
        Self {
            source,
            output_path: output_path.into(),
            markup: MarkupOptions::default(),
            ads: AdPolicy::default(),
            related_limit: DEFAULT_RELATED_LIMIT,
            bundle: None,
        }
    }
}

impl ConfigProvider for RenderSettings {
    fn source(&self) -> &SnapshotSource {
        &self.source
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn markup_options(&self) -> &MarkupOptions {
        &self.markup
    }

    fn ad_policy(&self) -> &AdPolicy {
        &self.ads
    }

    fn related_limit(&self) -> usize {
        self.related_limit
    }

    fn bundle_name(&self) -> Option<&str> {
        self.bundle.as_deref()
    }
}

impl Validate for RenderSettings {
    fn validate(&self) -> Result<()> {
        validate_render_config(self)
    }
}

/// 共用的設定檢查 (CLI 與 TOML 都走這裡)
pub(crate) fn validate_render_config<C: ConfigProvider>(config: &C) -> Result<()> {
    match config.source() {
        SnapshotSource::File { path } => validation::validate_path("source.path", path)?,
        SnapshotSource::Http {
            endpoint,
            timeout_seconds,
        } => {
            validation::validate_url("source.endpoint", endpoint)?;
            if let Some(timeout) = timeout_seconds {
                validation::validate_range("source.timeout_seconds", *timeout, 1, 600)?;
            }
        }
    }

    validation::validate_path("load.output_path", config.output_path())?;
    validation::validate_range("load.related_limit", config.related_limit(), 0, RELATED_WINDOW)?;

    let ads = config.ad_policy();
    if ads.enabled {
        validation::validate_positive_number("ads.min_segments", ads.min_segments, 1)?;
    }

    validation::validate_non_empty_string(
        "markup.fallback_image",
        &config.markup_options().fallback_image,
    )?;

    if let Some(bundle) = config.bundle_name() {
        validation::validate_non_empty_string("load.bundle.filename", bundle)?;
        if !bundle.ends_with(".zip") {
            return Err(GistError::InvalidConfigValueError {
                field: "load.bundle.filename".to_string(),
                value: bundle.to_string(),
                reason: "Bundle name must end with .zip".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "gist-render")]
#[command(about = "Render gist posts into HTML fragments with ad slots")]
pub struct CliConfig {
    /// JSON export of the store (relative to the current directory)
    #[arg(long, conflicts_with = "endpoint")]
    pub input: Option<String>,

    /// REST root of the store, e.g. https://<project>.firebaseio.com
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Render a single post and print its HTML
    #[arg(long)]
    pub post: Option<String>,

    /// Keep `#` delimiters inside rendered italics
    #[arg(long)]
    pub keep_italic_delimiters: bool,

    #[arg(long, help = "Do not insert ad placeholders")]
    pub no_ads: bool,

    /// Also write the site into a zip bundle
    #[arg(long)]
    pub zip: bool,

    /// Transform one post body read from standard input
    #[arg(long, conflicts_with_all = ["input", "endpoint", "post"])]
    pub stdin: bool,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn markup_options(&self) -> MarkupOptions {
        MarkupOptions {
            italic: if self.keep_italic_delimiters {
                ItalicStyle::Keep
            } else {
                ItalicStyle::Strip
            },
            ..MarkupOptions::default()
        }
    }

    pub fn ad_policy(&self) -> AdPolicy {
        AdPolicy {
            enabled: !self.no_ads,
            ..AdPolicy::default()
        }
    }

    /// Resolves the flags into validated render settings.
    pub fn settings(&self) -> Result<RenderSettings> {
        let source = match (&self.input, &self.endpoint) {
            (Some(path), None) => SnapshotSource::File { path: path.clone() },
            (None, Some(endpoint)) => SnapshotSource::Http {
                endpoint: endpoint.clone(),
                timeout_seconds: Some(self.timeout_seconds),
            },
            (Some(_), Some(_)) => {
                return Err(GistError::ConfigError {
                    message: "Use either --input or --endpoint, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(GistError::MissingConfigError {
                    field: "--input or --endpoint".to_string(),
                })
            }
        };

        let settings = RenderSettings {
            source,
            output_path: self.output_path.clone(),
            markup: self.markup_options(),
            ads: self.ad_policy(),
            related_limit: DEFAULT_RELATED_LIMIT,
            bundle: self.zip.then(|| "site.zip".to_string()),
        };
        settings.validate()?;
        Ok(settings)
    }
}
