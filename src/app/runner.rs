use crate::adapters::{DefaultLauncher, HttpUploader, LocalStorage};
use crate::core::listing_walker::ListingWalker;
use crate::core::session::ScrapeSession;
use crate::core::{BrowserLauncher, ConfigProvider, Result, Storage};
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub records: usize,
    pub csv_path: String,
    pub json_path: String,
    pub uploaded: bool,
}

/// Runs a whole scrape: run, export CSV, export JSON, upload, close. The
/// browser is closed whichever step fails.
pub struct ScrapeRunner<S: Storage> {
    session: ScrapeSession<S>,
    start_url: String,
    csv_path: String,
    json_path: String,
    monitor: SystemMonitor,
}

impl ScrapeRunner<LocalStorage> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let launcher = DefaultLauncher::new(config.browser_settings());
        Self::with_launcher(config, Box::new(launcher), LocalStorage::default())
    }
}

impl<S: Storage> ScrapeRunner<S> {
    pub fn with_launcher<C: ConfigProvider>(
        config: &C,
        launcher: Box<dyn BrowserLauncher>,
        storage: S,
    ) -> Self {
        let walker = ListingWalker::from_rules(config.selector_rules());
        let mut session = ScrapeSession::new(launcher, walker, storage);
        if let Some(endpoint) = config.upload_endpoint() {
            session = session.with_uploader(Box::new(HttpUploader::new(endpoint)));
        }

        Self {
            session,
            start_url: config.start_url().to_string(),
            csv_path: config.csv_path().to_string(),
            json_path: config.json_path().to_string(),
            monitor: SystemMonitor::new(config.monitor_enabled()),
        }
    }

    pub async fn run(mut self) -> Result<ScrapeSummary> {
        let outcome = self.run_steps().await;

        // 不論成功與否都要關閉瀏覽器
        let closed = self.session.close().await;
        self.monitor.log_summary();

        let summary = outcome?;
        closed?;
        Ok(summary)
    }

    async fn run_steps(&mut self) -> Result<ScrapeSummary> {
        tracing::info!("Starting scrape of {}", self.start_url);
        self.session.run(&self.start_url).await?;
        self.monitor.log_phase("Extract");

        self.session.export_csv(&self.csv_path).await?;
        self.session.export_json(&self.json_path).await?;
        self.monitor.log_phase("Export");

        let uploaded = self.session.has_uploader();
        self.session.upload_records().await?;
        self.monitor.log_phase("Upload");

        Ok(ScrapeSummary {
            records: self.session.records().len(),
            csv_path: self.csv_path.clone(),
            json_path: self.json_path.clone(),
            uploaded,
        })
    }
}
