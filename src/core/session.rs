use crate::core::export::{records_to_csv, records_to_json};
use crate::core::listing_walker::ListingWalker;
use crate::core::{BrowserContext, BrowserLauncher, ProductRecord, Result, Storage, Uploader};
use crate::utils::error::ScrapeError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Navigated,
    Extracted,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Navigated => "navigated",
            Self::Extracted => "extracted",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Single-use scrape: launch, navigate, walk the listing, then export and
/// upload what was collected. The session owns the browser until `close`.
pub struct ScrapeSession<S: Storage> {
    launcher: Box<dyn BrowserLauncher>,
    walker: ListingWalker,
    storage: S,
    uploader: Option<Box<dyn Uploader>>,
    browser: Option<Box<dyn BrowserContext>>,
    records: Option<Vec<ProductRecord>>,
    state: SessionState,
}

impl<S: Storage> ScrapeSession<S> {
    pub fn new(launcher: Box<dyn BrowserLauncher>, walker: ListingWalker, storage: S) -> Self {
        Self {
            launcher,
            walker,
            storage,
            uploader: None,
            browser: None,
            records: None,
            state: SessionState::Created,
        }
    }

    pub fn with_uploader(mut self, uploader: Box<dyn Uploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn has_uploader(&self) -> bool {
        self.uploader.is_some()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Records collected by `run`; empty before extraction.
    pub fn records(&self) -> &[ProductRecord] {
        self.records.as_deref().unwrap_or_default()
    }

    pub async fn run(&mut self, start_url: &str) -> Result<()> {
        if self.state != SessionState::Created {
            return Err(self.state_error("run"));
        }

        tracing::info!("🚀 Launching browser");
        let browser = self.launcher.launch().await?;
        self.browser = Some(browser);

        // 任何失敗都要先釋放瀏覽器再回傳錯誤
        match self.navigate_and_walk(start_url).await {
            Ok(records) => {
                tracing::info!("📦 Extracted {} products from {}", records.len(), start_url);
                self.records = Some(records);
                self.state = SessionState::Extracted;
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Scrape of {} failed: {}", start_url, e);
                if let Err(close_err) = self.close().await {
                    tracing::warn!("Browser cleanup after failure also failed: {}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn navigate_and_walk(&mut self, start_url: &str) -> Result<Vec<ProductRecord>> {
        let browser = self
            .browser
            .as_deref()
            .ok_or_else(|| ScrapeError::browser("browser is not running"))?;

        tracing::info!("🌐 Navigating to {}", start_url);
        browser.navigate(start_url).await?;
        self.state = SessionState::Navigated;

        self.walker.extract_all(browser).await
    }

    pub async fn export_csv(&self, path: &str) -> Result<()> {
        let records = self.extracted_records("export CSV")?;
        let data = records_to_csv(records)?;
        self.storage.write_file(path, &data).await?;
        tracing::info!("💾 Wrote {} rows to {}", records.len(), path);
        Ok(())
    }

    pub async fn export_json(&self, path: &str) -> Result<()> {
        let records = self.extracted_records("export JSON")?;
        let data = records_to_json(records)?;
        self.storage.write_file(path, &data).await?;
        tracing::info!("💾 Wrote {} objects to {}", records.len(), path);
        Ok(())
    }

    /// Hands the records to the upload collaborator. Errors surface as-is and
    /// are not retried.
    pub async fn upload_records(&self) -> Result<()> {
        let records = self.extracted_records("upload")?;

        let Some(uploader) = self.uploader.as_ref() else {
            tracing::info!("No upload endpoint configured, skipping upload");
            return Ok(());
        };

        tracing::info!("☁️ Uploading {} products", records.len());
        uploader.upload(records).await?;
        tracing::info!("✅ Upload accepted");
        Ok(())
    }

    /// Releases the browser. Safe to call repeatedly and before `run`.
    pub async fn close(&mut self) -> Result<()> {
        let browser = self.browser.take();
        self.state = SessionState::Closed;

        match browser {
            Some(browser) => {
                tracing::debug!("Closing browser");
                browser.close().await
            }
            None => Ok(()),
        }
    }

    fn extracted_records(&self, operation: &str) -> Result<&[ProductRecord]> {
        self.records
            .as_deref()
            .ok_or_else(|| self.state_error(operation))
    }

    fn state_error(&self, operation: &str) -> ScrapeError {
        ScrapeError::SessionStateError {
            operation: operation.to_string(),
            state: self.state.to_string(),
        }
    }
}

impl<S: Storage> Drop for ScrapeSession<S> {
    fn drop(&mut self) {
        if self.browser.is_some() {
            tracing::warn!("⚠️ Scrape session dropped without close(); browser may still be running");
        }
    }
}
