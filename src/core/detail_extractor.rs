use crate::core::{BrowserContext, ElementHandle, ProductRecord, SelectorRules};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// 只處理「單一金額 + 貨幣符號或代碼」的價格，其他文字原樣保留
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[A-Z]{3}\s*)?(-?)\s*\p{Sc}?\s*(\d+(?:[.,]\d+)*)\s*(?:\p{Sc}|[A-Z]{3})?$",
    )
    .expect("price pattern is valid")
});

/// A field that could not be read. Recovered locally by substituting the
/// empty string; never leaves this module.
#[derive(Debug)]
struct ExtractionGap<'a> {
    field: &'static str,
    selector: &'a str,
    reason: String,
}

impl ExtractionGap<'_> {
    fn log(&self) {
        tracing::debug!(
            "Field '{}' unavailable (selector '{}'): {}",
            self.field,
            self.selector,
            self.reason
        );
    }
}

/// Reads the four product fields out of a product element.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    rules: SelectorRules,
}

impl DetailExtractor {
    pub fn new(rules: SelectorRules) -> Self {
        Self { rules }
    }

    pub fn follows_detail_links(&self) -> bool {
        self.rules.detail_link.is_some()
    }

    /// Never fails: a field the element cannot provide comes back empty.
    pub async fn extract(&self, product: &dyn ElementHandle) -> ProductRecord {
        let name = self.read_field(product, "name", &self.rules.name).await;
        let price = self.read_field(product, "price", &self.rules.price).await;
        let category = self
            .read_field(product, "category", &self.rules.category)
            .await;
        let details = self
            .read_field(product, "details", &self.rules.details)
            .await;

        ProductRecord {
            name,
            price: normalize_price(&price),
            category,
            details,
        }
    }

    /// Absolute URL of the product's detail view, if the element links to one.
    pub async fn detail_url(
        &self,
        product: &dyn ElementHandle,
        listing_url: Option<&str>,
    ) -> Option<String> {
        let selector = self.rules.detail_link.as_deref()?;

        let href = match product.find_attr(selector, "href").await {
            Ok(Some(href)) if !href.trim().is_empty() => href,
            Ok(_) => {
                ExtractionGap {
                    field: "detail_link",
                    selector,
                    reason: "no href".to_string(),
                }
                .log();
                return None;
            }
            Err(e) => {
                ExtractionGap {
                    field: "detail_link",
                    selector,
                    reason: e.to_string(),
                }
                .log();
                return None;
            }
        };

        resolve_link(listing_url, href.trim())
    }

    /// Navigates `browser` to the detail view and reads the fields from its
    /// root element. `None` when the page or its root element is unavailable.
    pub async fn extract_detail_page(
        &self,
        browser: &dyn BrowserContext,
        url: &str,
    ) -> Option<ProductRecord> {
        if let Err(e) = browser.navigate(url).await {
            tracing::warn!("⚠️ Detail page {} unavailable: {}", url, e);
            return None;
        }

        let roots = match browser.find_elements(&self.rules.detail_root).await {
            Ok(roots) => roots,
            Err(e) => {
                tracing::warn!("⚠️ Detail page {} could not be searched: {}", url, e);
                return None;
            }
        };

        match roots.first() {
            Some(root) => Some(self.extract(root.as_ref()).await),
            None => {
                tracing::warn!(
                    "⚠️ Detail page {} has no element matching '{}'",
                    url,
                    self.rules.detail_root
                );
                None
            }
        }
    }

    async fn read_field(
        &self,
        product: &dyn ElementHandle,
        field: &'static str,
        selector: &str,
    ) -> String {
        let gap = match product.find_text(selector).await {
            Ok(Some(text)) => {
                let text = text.trim();
                if !text.is_empty() {
                    return text.to_string();
                }
                "blank text".to_string()
            }
            Ok(None) => "no matching element".to_string(),
            Err(e) => e.to_string(),
        };

        ExtractionGap {
            field,
            selector,
            reason: gap,
        }
        .log();
        String::new()
    }
}

/// Drops the currency markers around a single amount: `"$1,299.00"` becomes
/// `"1,299.00"`. Anything else (ranges, offers, words) is returned trimmed.
pub fn normalize_price(raw: &str) -> String {
    let raw = raw.trim();
    match PRICE_PATTERN.captures(raw) {
        Some(caps) => format!("{}{}", &caps[1], &caps[2]),
        None => raw.to_string(),
    }
}

fn resolve_link(base: Option<&str>, href: &str) -> Option<String> {
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }

    let base = Url::parse(base?).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}
