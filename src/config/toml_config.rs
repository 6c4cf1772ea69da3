use crate::core::ConfigProvider;
use crate::domain::model::{BrowserBackend, BrowserSettings, SelectorRules};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{validate_css_selector, validate_path, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scrape: ScrapeSection,
    #[serde(default)]
    pub browser: BrowserSettings,
    pub selectors: SelectorRules,
    #[serde(default)]
    pub output: OutputConfig,
    pub upload: Option<UploadConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSection {
    pub name: Option<String>,
    pub start_url: String,
}

fn default_csv_path() -> String {
    "data/csv/output.csv".to_string()
}

fn default_json_path() -> String {
    "data/json/output.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    #[serde(default = "default_json_path")]
    pub json_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            json_path: default_json_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_upload_enabled")]
    pub enabled: bool,
    pub endpoint: Option<String>,
}

fn default_upload_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，先替換 ${VAR} 環境變數
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| ScrapeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // 未設定的變數保留原樣，交給後續驗證處理
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }
}

impl ConfigProvider for TomlConfig {
    fn start_url(&self) -> &str {
        &self.scrape.start_url
    }

    fn browser_settings(&self) -> BrowserSettings {
        self.browser.clone()
    }

    fn selector_rules(&self) -> SelectorRules {
        self.selectors.clone()
    }

    fn csv_path(&self) -> &str {
        &self.output.csv_path
    }

    fn json_path(&self) -> &str {
        &self.output.json_path
    }

    fn upload_endpoint(&self) -> Option<&str> {
        self.upload
            .as_ref()
            .filter(|upload| upload.enabled)
            .and_then(|upload| upload.endpoint.as_deref())
    }

    fn monitor_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("scrape.start_url", &self.scrape.start_url)?;
        if self.browser.backend == BrowserBackend::WebDriver {
            validate_url("browser.webdriver_url", &self.browser.webdriver_url)?;
        }

        if let Some(upload) = self.upload.as_ref().filter(|u| u.enabled) {
            let endpoint = crate::utils::validation::validate_required_field(
                "upload.endpoint",
                &upload.endpoint,
            )?;
            validate_url("upload.endpoint", endpoint)?;
        }

        validate_path("output.csv_path", &self.output.csv_path)?;
        validate_path("output.json_path", &self.output.json_path)?;

        let rules = &self.selectors;
        validate_css_selector("selectors.product", &rules.product)?;
        validate_css_selector("selectors.name", &rules.name)?;
        validate_css_selector("selectors.price", &rules.price)?;
        validate_css_selector("selectors.category", &rules.category)?;
        validate_css_selector("selectors.details", &rules.details)?;
        validate_css_selector("selectors.detail_root", &rules.detail_root)?;
        if let Some(link) = &rules.detail_link {
            validate_css_selector("selectors.detail_link", link)?;
        }

        Ok(())
    }
}
