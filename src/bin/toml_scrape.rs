use anyhow::Context;
use clap::Parser;
use shop_scraper::config::toml_config::MonitoringConfig;
use shop_scraper::core::ConfigProvider;
use shop_scraper::utils::{logger, validation::Validate};
use shop_scraper::{ScrapeRunner, TomlConfig};

#[derive(Parser)]
#[command(name = "toml_scrape")]
#[command(about = "shop-scraper driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "scraper.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Skip the upload step even if the config enables it
    #[arg(long)]
    no_upload: bool,

    /// Validate the configuration and print the plan without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("📁 Loaded configuration from {}", args.config);

    // 套用命令列覆蓋設定
    if let Some(enabled) = args.monitor {
        let monitoring = config.monitoring.get_or_insert(MonitoringConfig {
            enabled,
            log_format: None,
        });
        monitoring.enabled = enabled;
        tracing::info!("🔧 Monitoring overridden to: {}", enabled);
    }
    if args.no_upload {
        config.upload = None;
        tracing::info!("🔧 Upload disabled from command line");
    }

    config.validate().context("invalid configuration")?;

    if args.dry_run {
        println!("🔍 Dry run");
        println!("   Start URL: {}", config.start_url());
        println!("   Backend:   {:?}", config.browser_settings().backend);
        println!("   Products:  {}", config.selector_rules().product);
        println!("   CSV:       {}", config.csv_path());
        println!("   JSON:      {}", config.json_path());
        println!(
            "   Upload:    {}",
            config.upload_endpoint().unwrap_or("(disabled)")
        );
        return Ok(());
    }

    let summary = ScrapeRunner::from_config(&config)
        .run()
        .await
        .context("scrape failed")?;

    println!("✅ Scraped {} products", summary.records);
    println!("📁 CSV:  {}", summary.csv_path);
    println!("📁 JSON: {}", summary.json_path);
    Ok(())
}
