// Adapters layer: concrete implementations for the external systems the
// scraper talks to (browsers, local files, the store's import API).

pub mod static_html;
pub mod storage;
pub mod uploader;
pub mod webdriver;

use crate::core::{BrowserContext, BrowserLauncher};
use crate::domain::model::{BrowserBackend, BrowserSettings};
use crate::utils::error::Result;
use async_trait::async_trait;

pub use static_html::StaticHtmlBrowser;
pub use storage::LocalStorage;
pub use uploader::HttpUploader;
pub use webdriver::WebDriverBrowser;

/// Starts the backend named in the settings.
#[derive(Debug, Clone)]
pub struct DefaultLauncher {
    settings: BrowserSettings,
}

impl DefaultLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl BrowserLauncher for DefaultLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserContext>> {
        match self.settings.backend {
            BrowserBackend::WebDriver => {
                let browser = WebDriverBrowser::connect(&self.settings).await?;
                tracing::info!("🧭 WebDriver session started at {}", self.settings.webdriver_url);
                Ok(Box::new(browser))
            }
            BrowserBackend::Static => {
                tracing::info!("🧭 Using static HTML backend");
                Ok(Box::new(StaticHtmlBrowser::new()))
            }
        }
    }
}
