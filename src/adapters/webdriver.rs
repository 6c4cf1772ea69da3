use crate::core::{BrowserContext, ElementHandle};
use crate::domain::model::BrowserSettings;
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tokio::sync::Mutex;

fn driver_error(action: &str, e: WebDriverError) -> ScrapeError {
    ScrapeError::browser(format!("{}: {}", action, e))
}

/// Chrome driven through a WebDriver server such as chromedriver.
pub struct WebDriverBrowser {
    driver: Mutex<Option<WebDriver>>,
}

impl WebDriverBrowser {
    pub async fn connect(settings: &BrowserSettings) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()
                .map_err(|e| driver_error("set headless", e))?;
        }
        caps.add_arg("--no-sandbox")
            .map_err(|e| driver_error("add chrome argument", e))?;

        tracing::debug!("Connecting to WebDriver at {}", settings.webdriver_url);
        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| {
                ScrapeError::browser(format!(
                    "could not start a session on {}: {}",
                    settings.webdriver_url, e
                ))
            })?;

        Ok(Self {
            driver: Mutex::new(Some(driver)),
        })
    }
}

#[async_trait]
impl BrowserContext for WebDriverBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        let guard = self.driver.lock().await;
        let driver = guard
            .as_ref()
            .ok_or_else(|| ScrapeError::navigation(url, "browser already closed"))?;

        driver
            .goto(url)
            .await
            .map_err(|e| ScrapeError::navigation(url, e.to_string()))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let guard = self.driver.lock().await;
        let driver = guard
            .as_ref()
            .ok_or_else(|| ScrapeError::browser("browser already closed"))?;

        let elements = driver
            .find_all(By::Css(selector))
            .await
            .map_err(|e| driver_error("find elements", e))?;

        Ok(elements
            .into_iter()
            .map(|element| Box::new(WebDriverElement { element }) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn current_url(&self) -> Result<Option<String>> {
        let guard = self.driver.lock().await;
        let Some(driver) = guard.as_ref() else {
            return Ok(None);
        };

        let url = driver
            .current_url()
            .await
            .map_err(|e| driver_error("read current url", e))?;
        Ok(Some(url.to_string()))
    }

    async fn close(&self) -> Result<()> {
        let driver = self.driver.lock().await.take();
        match driver {
            Some(driver) => driver.quit().await.map_err(|e| driver_error("quit", e)),
            None => Ok(()),
        }
    }
}

pub struct WebDriverElement {
    element: WebElement,
}

impl WebDriverElement {
    // find_all 取代 find：沒有符合的元素時回傳空集合而非錯誤
    async fn first_match(&self, selector: &str) -> Result<Option<WebElement>> {
        let mut matches = self
            .element
            .find_all(By::Css(selector))
            .await
            .map_err(|e| driver_error("find child element", e))?;

        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(matches.swap_remove(0)))
    }
}

#[async_trait]
impl ElementHandle for WebDriverElement {
    async fn find_text(&self, selector: &str) -> Result<Option<String>> {
        let Some(child) = self.first_match(selector).await? else {
            return Ok(None);
        };

        child
            .text()
            .await
            .map(Some)
            .map_err(|e| driver_error("read text", e))
    }

    async fn find_attr(&self, selector: &str, attr: &str) -> Result<Option<String>> {
        let Some(child) = self.first_match(selector).await? else {
            return Ok(None);
        };

        child
            .attr(attr)
            .await
            .map_err(|e| driver_error("read attribute", e))
    }
}
