use serde::{Deserialize, Serialize};

/// One scraped product. Every field is always present; a value the page did
/// not provide is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: String,
    pub category: String,
    pub details: String,
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        category: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            category: category.into(),
            details: details.into(),
        }
    }

    /// Fields read from a detail page take precedence; the listing card
    /// fills whatever the detail page left empty.
    pub fn overlay(self, detail: ProductRecord) -> ProductRecord {
        fn pick(detail: String, card: String) -> String {
            if detail.is_empty() {
                card
            } else {
                detail
            }
        }

        ProductRecord {
            name: pick(detail.name, self.name),
            price: pick(detail.price, self.price),
            category: pick(detail.category, self.category),
            details: pick(detail.details, self.details),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.price.is_empty()
            && self.category.is_empty()
            && self.details.is_empty()
    }
}

fn default_detail_root() -> String {
    "body".to_string()
}

/// Site-specific CSS rules. `product` selects the listing elements; the field
/// selectors are evaluated relative to one product element (or to the
/// `detail_root` element of a detail page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorRules {
    pub product: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub details: String,
    #[serde(default)]
    pub detail_link: Option<String>,
    #[serde(default = "default_detail_root")]
    pub detail_root: String,
}

impl Default for SelectorRules {
    fn default() -> Self {
        Self {
            product: ".product".to_string(),
            name: ".name".to_string(),
            price: ".price".to_string(),
            category: ".category".to_string(),
            details: ".details".to_string(),
            detail_link: None,
            detail_root: default_detail_root(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BrowserBackend {
    /// A real browser driven over the WebDriver protocol.
    #[default]
    #[cfg_attr(feature = "cli", value(name = "webdriver"))]
    WebDriver,
    /// Plain HTTP fetch with CSS selection over the static HTML.
    Static,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_headless() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSettings {
    #[serde(default)]
    pub backend: BrowserBackend,
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            backend: BrowserBackend::default(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_prefers_detail_values() {
        let card = ProductRecord::new("Widget A", "9.99", "", "short blurb");
        let detail = ProductRecord::new("Widget A Deluxe", "", "Tools", "");

        let merged = card.overlay(detail);

        assert_eq!(merged.name, "Widget A Deluxe");
        assert_eq!(merged.price, "9.99");
        assert_eq!(merged.category, "Tools");
        assert_eq!(merged.details, "short blurb");
    }

    #[test]
    fn test_record_json_keys_are_lowercase() {
        let record = ProductRecord::new("Widget A", "9.99", "Tools", "Steel");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "Widget A",
                "price": "9.99",
                "category": "Tools",
                "details": "Steel"
            })
        );
    }

    #[test]
    fn test_selector_rules_defaults_from_toml() {
        let rules: SelectorRules = toml::from_str(
            r#"
product = "li.card"
name = "h2"
price = ".amount"
category = ".tag"
details = "p"
"#,
        )
        .unwrap();

        assert_eq!(rules.detail_root, "body");
        assert!(rules.detail_link.is_none());
    }
}
