use clap::Parser;
use gist_render::core::ConfigProvider;
use gist_render::domain::model::SnapshotSource;
use gist_render::markup::ItalicStyle;
use gist_render::utils::error::ErrorSeverity;
use gist_render::utils::{logger, validation::Validate};
use gist_render::{LocalStorage, RenderEngine, SitePipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-render")]
#[command(about = "Render gist posts with TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "gist-render.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the ads setting from config
    #[arg(long)]
    ads: Option<bool>,

    /// Dry run - show what would be rendered without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose || config.verbose_logging(), config.json_logging());

    tracing::info!("🚀 Starting TOML-based render");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(ads) = args.ads {
        config.ads.enabled = ads;
        tracing::info!("🔧 Ads overridden to: {}", ads);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let input = LocalStorage::new(".");
    let output = LocalStorage::new(config.output_path().to_string());
    let pipeline = SitePipeline::new(input, output, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return perform_dry_run(&pipeline).await;
    }

    let engine = RenderEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Render completed successfully!");
            println!("✅ Render completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Site: {}", config.site.name);
    if let Some(description) = &config.site.description {
        println!("  Description: {}", description);
    }
    match &config.source {
        SnapshotSource::File { path } => println!("  Source: file {}", path),
        SnapshotSource::Http { endpoint, .. } => println!("  Source: store {}", endpoint),
    }
    println!("  Output: {}", config.output_path());
    println!(
        "  Italics: {}",
        match config.markup.italic {
            ItalicStyle::Strip => "strip delimiters",
            ItalicStyle::Keep => "keep delimiters",
        }
    );
    println!("  Ads: {}", if config.ads.enabled { "on" } else { "off" });
    println!("  Related posts: {}", config.related_limit());

    if let Some(bundle) = config.bundle_name() {
        println!("  Bundle: {} (ZIP)", bundle);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(pipeline: &SitePipeline<LocalStorage, TomlConfig>) -> anyhow::Result<()> {
    use gist_render::core::Pipeline;

    println!("🔍 Dry Run Analysis:");
    println!();

    let snapshot = pipeline.extract().await?;
    let result = pipeline.transform(snapshot).await?;

    println!("📰 Posts ({}):", result.posts.len());
    for post in &result.posts {
        println!(
            "  {} [{}] {} - {} ad slots, {} views",
            post.short_date, post.category, post.title, post.ad_slots, post.views
        );
    }

    println!();
    println!("🏷️ Categories: {}", result.categories.join(", "));
    println!();
    println!("✅ Dry run analysis complete. Nothing was written.");

    Ok(())
}
