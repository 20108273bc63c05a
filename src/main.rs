use clap::Parser;
use gist_render::utils::error::{ErrorSeverity, GistError};
use gist_render::utils::logger;
use gist_render::{AdDistributor, CliConfig, LocalStorage, MarkupTransformer, RenderEngine, SitePipeline};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting gist-render CLI");
    tracing::debug!("CLI config: {:?}", config);

    if config.stdin {
        let mut raw = String::new();
        tokio::io::stdin().read_to_string(&mut raw).await?;

        let html = MarkupTransformer::new(config.markup_options()).transform(&raw);
        let distribution = AdDistributor::new(config.ad_policy()).distribute(&html);
        tracing::debug!("Inserted {} ad placeholders", distribution.placeholders);
        println!("{}", distribution.html);
        return Ok(());
    }

    // 驗證配置
    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 輸入以目前目錄為根，輸出寫到 output_path
    let input = LocalStorage::new(".");
    let output = LocalStorage::new(settings.output_path.clone());
    let pipeline = SitePipeline::new(input, output, settings);

    if let Some(id) = &config.post {
        match pipeline.render_post(id).await {
            Ok(post) => {
                tracing::info!("Rendered {} with {} ad slots", post.id, post.ad_slots);
                println!("{}", post.html);
            }
            Err(e) => exit_with(e),
        }
        return Ok(());
    }

    let engine = RenderEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Render completed successfully!");
            println!("✅ Render completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: GistError) {
    tracing::error!(
        "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
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
