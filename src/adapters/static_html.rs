use crate::core::{BrowserContext, ElementHandle};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tokio::sync::Mutex;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

struct LoadedPage {
    url: String,
    html: Arc<str>,
}

/// Browser stand-in for sites that render their catalog server-side: fetches
/// the page over HTTP and evaluates selectors on the static markup.
pub struct StaticHtmlBrowser {
    client: Client,
    page: Mutex<Option<LoadedPage>>,
}

impl StaticHtmlBrowser {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            page: Mutex::new(None),
        }
    }
}

impl Default for StaticHtmlBrowser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::browser(format!("invalid CSS selector '{}': {}", selector, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

// Html 不是 Send，解析只在同步函式內進行
fn count_matches(html: &str, selector: &Selector) -> usize {
    Html::parse_document(html).select(selector).count()
}

#[async_trait]
impl BrowserContext for StaticHtmlBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .send()
            .await
            .map_err(|e| ScrapeError::navigation(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::navigation(
                url,
                format!("server responded with {}", status),
            ));
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::navigation(url, e.to_string()))?;
        tracing::debug!("Loaded {} ({} bytes)", final_url, html.len());

        *self.page.lock().await = Some(LoadedPage {
            url: final_url,
            html: html.into(),
        });
        Ok(())
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let page = self.page.lock().await;
        let page = page
            .as_ref()
            .ok_or_else(|| ScrapeError::browser("no page loaded"))?;
        let parsed = parse_selector(selector)?;
        let count = count_matches(&page.html, &parsed);

        Ok((0..count)
            .map(|index| {
                Box::new(StaticElement {
                    html: Arc::clone(&page.html),
                    selector: selector.to_string(),
                    index,
                }) as Box<dyn ElementHandle>
            })
            .collect())
    }

    async fn current_url(&self) -> Result<Option<String>> {
        Ok(self.page.lock().await.as_ref().map(|page| page.url.clone()))
    }

    async fn close(&self) -> Result<()> {
        self.page.lock().await.take();
        Ok(())
    }
}

/// The `index`-th match of `selector` in the document the page had when the
/// element was enumerated. Child selectors are evaluated inside the full
/// document, so ancestor-dependent selectors behave as under WebDriver.
pub struct StaticElement {
    html: Arc<str>,
    selector: String,
    index: usize,
}

impl StaticElement {
    fn query<T>(
        &self,
        selector: &str,
        read: impl Fn(ElementRef<'_>) -> Option<T>,
    ) -> Result<Option<T>> {
        let own = parse_selector(&self.selector)?;
        let parsed = parse_selector(selector)?;

        let document = Html::parse_document(&self.html);
        let Some(element) = document.select(&own).nth(self.index) else {
            return Ok(None);
        };
        Ok(element.select(&parsed).next().and_then(read))
    }
}

#[async_trait]
impl ElementHandle for StaticElement {
    async fn find_text(&self, selector: &str) -> Result<Option<String>> {
        self.query(selector, |el| Some(element_text(el)))
    }

    async fn find_attr(&self, selector: &str, attr: &str) -> Result<Option<String>> {
        self.query(selector, |el| el.value().attr(attr).map(str::to_string))
    }
}
