use clap::Parser;
use shop_scraper::utils::error::{ErrorSeverity, ScrapeError};
use shop_scraper::utils::{logger, validation::Validate};
use shop_scraper::{CliConfig, ScrapeRunner};

fn exit_code(e: &ScrapeError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting shop-scraper");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    let runner = ScrapeRunner::from_config(&config);

    match runner.run().await {
        Ok(summary) => {
            tracing::info!("✅ Scraped {} products", summary.records);
            println!("✅ Scraped {} products", summary.records);
            println!("📁 CSV:  {}", summary.csv_path);
            println!("📁 JSON: {}", summary.json_path);
            if summary.uploaded {
                let endpoint = config.upload_endpoint.as_deref().unwrap_or_default();
                println!("☁️ Uploaded to {}", endpoint);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(exit_code(&e));
        }
    }

    Ok(())
}
