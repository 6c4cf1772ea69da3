use crate::core::detail_extractor::DetailExtractor;
use crate::core::{
    BrowserContext, ElementHandle, ProductRecord, ProductSelector, Result, SelectorRules,
};
use async_trait::async_trait;

/// Selects product elements with a single CSS selector.
#[derive(Debug, Clone)]
pub struct CssProductSelector {
    selector: String,
}

impl CssProductSelector {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

#[async_trait]
impl ProductSelector for CssProductSelector {
    async fn select(&self, browser: &dyn BrowserContext) -> Result<Vec<Box<dyn ElementHandle>>> {
        browser.find_elements(&self.selector).await
    }
}

/// Walks the listing page that is currently loaded, one product at a time.
pub struct ListingWalker {
    selector: Box<dyn ProductSelector>,
    extractor: DetailExtractor,
}

impl ListingWalker {
    pub fn new(selector: Box<dyn ProductSelector>, extractor: DetailExtractor) -> Self {
        Self {
            selector,
            extractor,
        }
    }

    pub fn from_rules(rules: SelectorRules) -> Self {
        let selector = CssProductSelector::new(rules.product.clone());
        Self::new(Box::new(selector), DetailExtractor::new(rules))
    }

    /// One record per product element, in page order. An empty listing gives
    /// an empty vector.
    pub async fn extract_all(&self, browser: &dyn BrowserContext) -> Result<Vec<ProductRecord>> {
        let products = self.selector.select(browser).await?;
        tracing::info!("🔎 Found {} product elements", products.len());

        if !self.extractor.follows_detail_links() {
            let mut records = Vec::with_capacity(products.len());
            for (index, product) in products.iter().enumerate() {
                let record = self.extractor.extract(product.as_ref()).await;
                tracing::debug!("Product #{}: {:?}", index + 1, record.name);
                records.push(record);
            }
            return Ok(records);
        }

        // 先讀完所有卡片與連結，離開列表頁後元素就不能再用
        let listing_url = browser.current_url().await?;
        let mut cards = Vec::with_capacity(products.len());
        for product in &products {
            let card = self.extractor.extract(product.as_ref()).await;
            let link = self
                .extractor
                .detail_url(product.as_ref(), listing_url.as_deref())
                .await;
            cards.push((card, link));
        }
        drop(products);

        let mut visited = false;
        let mut records = Vec::with_capacity(cards.len());
        for (index, (card, link)) in cards.into_iter().enumerate() {
            let record = match link {
                Some(url) => {
                    visited = true;
                    tracing::debug!("Visiting detail page #{}: {}", index + 1, url);
                    match self.extractor.extract_detail_page(browser, &url).await {
                        Some(detail) => card.overlay(detail),
                        None => card,
                    }
                }
                None => card,
            };
            records.push(record);
        }

        // 回到列表頁失敗不影響已取得的資料
        if visited {
            if let Some(url) = listing_url {
                if let Err(e) = browser.navigate(&url).await {
                    tracing::warn!("⚠️ Could not return to listing {}: {}", url, e);
                }
            }
        }

        Ok(records)
    }
}
