use crate::core::ConfigProvider;
use crate::domain::model::{BrowserBackend, BrowserSettings, SelectorRules};
use crate::utils::error::Result;
use crate::utils::validation::{validate_css_selector, validate_path, validate_url, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "shop-scraper")]
#[command(about = "Scrape a product listing into CSV/JSON and push it to a store")]
pub struct CliConfig {
    /// Listing page to start from
    #[arg(long)]
    pub start_url: String,

    #[arg(long, value_enum, default_value_t = BrowserBackend::WebDriver)]
    pub backend: BrowserBackend,

    #[arg(long, default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    #[arg(long, default_value = ".product")]
    pub product_selector: String,

    #[arg(long, default_value = ".name")]
    pub name_selector: String,

    #[arg(long, default_value = ".price")]
    pub price_selector: String,

    #[arg(long, default_value = ".category")]
    pub category_selector: String,

    #[arg(long, default_value = ".details")]
    pub details_selector: String,

    /// Anchor inside a product element that leads to its detail page
    #[arg(long)]
    pub detail_link_selector: Option<String>,

    #[arg(long, default_value = "body")]
    pub detail_root_selector: String,

    #[arg(long, default_value = "data/csv/output.csv")]
    pub csv_path: String,

    #[arg(long, default_value = "data/json/output.json")]
    pub json_path: String,

    /// Store import endpoint; upload is skipped when absent
    #[arg(long)]
    pub upload_endpoint: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn start_url(&self) -> &str {
        &self.start_url
    }

    fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            backend: self.backend,
            webdriver_url: self.webdriver_url.clone(),
            headless: !self.headed,
        }
    }

    fn selector_rules(&self) -> SelectorRules {
        SelectorRules {
            product: self.product_selector.clone(),
            name: self.name_selector.clone(),
            price: self.price_selector.clone(),
            category: self.category_selector.clone(),
            details: self.details_selector.clone(),
            detail_link: self.detail_link_selector.clone(),
            detail_root: self.detail_root_selector.clone(),
        }
    }

    fn csv_path(&self) -> &str {
        &self.csv_path
    }

    fn json_path(&self) -> &str {
        &self.json_path
    }

    fn upload_endpoint(&self) -> Option<&str> {
        self.upload_endpoint.as_deref()
    }

    fn monitor_enabled(&self) -> bool {
        self.monitor
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("start_url", &self.start_url)?;
        if self.backend == BrowserBackend::WebDriver {
            validate_url("webdriver_url", &self.webdriver_url)?;
        }
        if let Some(endpoint) = &self.upload_endpoint {
            validate_url("upload_endpoint", endpoint)?;
        }

        validate_path("csv_path", &self.csv_path)?;
        validate_path("json_path", &self.json_path)?;

        let rules = self.selector_rules();
        validate_css_selector("product_selector", &rules.product)?;
        validate_css_selector("name_selector", &rules.name)?;
        validate_css_selector("price_selector", &rules.price)?;
        validate_css_selector("category_selector", &rules.category)?;
        validate_css_selector("details_selector", &rules.details)?;
        validate_css_selector("detail_root_selector", &rules.detail_root)?;
        if let Some(link) = &rules.detail_link {
            validate_css_selector("detail_link_selector", link)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_output_layout() {
        let config =
            CliConfig::try_parse_from(["shop-scraper", "--start-url", "https://shop.example.com"])
                .unwrap();

        assert_eq!(config.csv_path(), "data/csv/output.csv");
        assert_eq!(config.json_path(), "data/json/output.json");
        assert!(config.upload_endpoint().is_none());
        assert_eq!(config.browser_settings(), BrowserSettings::default());
        assert_eq!(config.selector_rules(), SelectorRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_static_backend_and_detail_link() {
        let config = CliConfig::try_parse_from([
            "shop-scraper",
            "--start-url",
            "https://shop.example.com/tools",
            "--backend",
            "static",
            "--detail-link-selector",
            "a.more",
            "--headed",
        ])
        .unwrap();

        let settings = config.browser_settings();
        assert_eq!(settings.backend, BrowserBackend::Static);
        assert!(!settings.headless);
        assert_eq!(config.selector_rules().detail_link.as_deref(), Some("a.more"));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let bad_url =
            CliConfig::try_parse_from(["shop-scraper", "--start-url", "shop.example.com"]).unwrap();
        assert!(bad_url.validate().is_err());

        let bad_selector = CliConfig::try_parse_from([
            "shop-scraper",
            "--start-url",
            "https://shop.example.com",
            "--price-selector",
            "span[",
        ])
        .unwrap();
        assert!(bad_selector.validate().is_err());
    }

    #[test]
    fn test_start_url_is_required() {
        assert!(CliConfig::try_parse_from(["shop-scraper"]).is_err());
    }
}
