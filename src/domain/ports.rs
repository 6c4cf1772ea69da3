use crate::domain::model::{BrowserSettings, ProductRecord, SelectorRules};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn start_url(&self) -> &str;
    fn browser_settings(&self) -> BrowserSettings;
    fn selector_rules(&self) -> SelectorRules;
    fn csv_path(&self) -> &str;
    fn json_path(&self) -> &str;
    fn upload_endpoint(&self) -> Option<&str>;
    fn monitor_enabled(&self) -> bool;
}

/// A browser automation context: one page at a time, owned by a single
/// scrape session.
#[async_trait]
pub trait BrowserContext: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// All elements of the current page matching `selector`, in document order.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>>;

    async fn current_url(&self) -> Result<Option<String>>;

    /// Releasing an already released context is not an error.
    async fn close(&self) -> Result<()>;
}

/// An element of the page the context had loaded when it was enumerated.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Text of the first descendant matching `selector`; `None` when nothing matches.
    async fn find_text(&self, selector: &str) -> Result<Option<String>>;

    /// Attribute of the first descendant matching `selector`.
    async fn find_attr(&self, selector: &str, attr: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserContext>>;
}

/// The site-specific rule that picks product elements off a listing page.
#[async_trait]
pub trait ProductSelector: Send + Sync {
    async fn select(&self, browser: &dyn BrowserContext) -> Result<Vec<Box<dyn ElementHandle>>>;
}

/// External system that ingests scraped records into a storefront catalog.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, records: &[ProductRecord]) -> Result<()>;
}
