use httpmock::prelude::*;
use shop_scraper::core::export::records_from_csv;
use shop_scraper::{BrowserBackend, CliConfig, ProductRecord, ScrapeError, ScrapeRunner};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

const WIDGETS_PAGE: &str = r#"
<html><body>
  <div class="grid">
    <div class="product">
      <h3 class="name">Widget A</h3>
      <span class="price">$9.99</span>
      <span class="category">Tools</span>
      <p class="details">Compact, steel</p>
    </div>
    <div class="product">
      <h3 class="name">Widget B</h3>
      <span class="price">$14.50</span>
      <span class="category">Tools</span>
      <p class="details">Heavy duty</p>
    </div>
  </div>
</body></html>"#;

fn config(start_url: String, dir: &TempDir) -> CliConfig {
    CliConfig {
        start_url,
        backend: BrowserBackend::Static,
        webdriver_url: "http://localhost:9515".to_string(),
        headed: false,
        product_selector: ".product".to_string(),
        name_selector: ".name".to_string(),
        price_selector: ".price".to_string(),
        category_selector: ".category".to_string(),
        details_selector: ".details".to_string(),
        detail_link_selector: None,
        detail_root_selector: "body".to_string(),
        csv_path: dir.path().join("csv/output.csv").to_str().unwrap().to_string(),
        json_path: dir.path().join("json/output.json").to_str().unwrap().to_string(),
        upload_endpoint: None,
        verbose: false,
        monitor: false,
        json_logs: false,
    }
}

#[tokio::test]
async fn test_two_widgets_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/catalog");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(WIDGETS_PAGE);
    });

    let config = config(server.url("/catalog"), &temp_dir);
    let summary = ScrapeRunner::from_config(&config).run().await.unwrap();

    page_mock.assert();
    assert_eq!(summary.records, 2);
    assert!(!summary.uploaded);

    let csv = std::fs::read_to_string(&config.csv_path).unwrap();
    assert_eq!(
        csv,
        "Name,Price,Category,Details\n\
         Widget A,9.99,Tools,\"Compact, steel\"\n\
         Widget B,14.50,Tools,Heavy duty\n"
    );

    let json = std::fs::read_to_string(&config.json_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {"name": "Widget A", "price": "9.99", "category": "Tools", "details": "Compact, steel"},
            {"name": "Widget B", "price": "14.50", "category": "Tools", "details": "Heavy duty"}
        ])
    );

    // CSV 重新解析後應與 JSON 內容一致
    let from_csv = records_from_csv(csv.as_bytes()).unwrap();
    let from_json: Vec<ProductRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(from_csv, from_json);
}

#[tokio::test]
async fn test_empty_listing_writes_header_and_empty_array() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/empty");
        then.status(200).body("<html><body><p>No products</p></body></html>");
    });

    let config = config(server.url("/empty"), &temp_dir);
    let summary = ScrapeRunner::from_config(&config).run().await.unwrap();

    assert_eq!(summary.records, 0);
    assert_eq!(
        std::fs::read_to_string(&config.csv_path).unwrap(),
        "Name,Price,Category,Details\n"
    );
    assert_eq!(std::fs::read_to_string(&config.json_path).unwrap(), "[]");
}

#[tokio::test]
async fn test_unreachable_start_url_is_navigation_error() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/down");
        then.status(503);
    });

    let config = config(server.url("/down"), &temp_dir);
    let err = ScrapeRunner::from_config(&config).run().await.unwrap_err();

    assert!(matches!(err, ScrapeError::NavigationError { .. }));
    assert!(!std::path::Path::new(&config.csv_path).exists());
}

#[tokio::test]
async fn test_missing_fields_become_empty_strings() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sparse");
        then.status(200).body(
            r#"<div class="product"><h3 class="name">Mystery Box</h3></div>
               <div class="product"><span class="price">Call us</span></div>"#,
        );
    });

    let config = config(server.url("/sparse"), &temp_dir);
    assert_ok!(ScrapeRunner::from_config(&config).run().await);

    let json = std::fs::read_to_string(&config.json_path).unwrap();
    let records: Vec<ProductRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        records,
        vec![
            ProductRecord::new("Mystery Box", "", "", ""),
            ProductRecord::new("", "Call us", "", ""),
        ]
    );
}

#[tokio::test]
async fn test_detail_pages_fill_in_fields() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/tools");
        then.status(200).body(
            r#"<ul>
                 <li class="product"><a class="more" href="/p/1"><span class="name">Widget A</span></a><span class="price">$9.99</span></li>
                 <li class="product"><a class="more" href="/p/2"><span class="name">Widget B</span></a><span class="price">$14.50</span></li>
               </ul>"#,
        );
    });
    let detail_one = server.mock(|when, then| {
        when.method(GET).path("/p/1");
        then.status(200).body(
            r#"<main><span class="category">Tools</span><div class="details">Forged steel head</div></main>"#,
        );
    });
    let detail_two = server.mock(|when, then| {
        when.method(GET).path("/p/2");
        then.status(500);
    });

    let mut config = config(server.url("/tools"), &temp_dir);
    config.product_selector = "li.product".to_string();
    config.detail_link_selector = Some("a.more".to_string());
    config.detail_root_selector = "main".to_string();

    let summary = ScrapeRunner::from_config(&config).run().await.unwrap();

    detail_one.assert();
    detail_two.assert();
    assert_eq!(summary.records, 2);

    let records =
        records_from_csv(std::fs::read_to_string(&config.csv_path).unwrap().as_bytes()).unwrap();
    assert_eq!(
        records,
        vec![
            ProductRecord::new("Widget A", "9.99", "Tools", "Forged steel head"),
            ProductRecord::new("Widget B", "14.50", "", ""),
        ]
    );
}

#[tokio::test]
async fn test_upload_posts_records() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/catalog");
        then.status(200).body(WIDGETS_PAGE);
    });
    let upload_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/wp-json/wc/v3/products/batch")
            .body_contains(r#""name":"Widget A","price":"9.99""#);
        then.status(200).json_body(serde_json::json!({"create": []}));
    });

    let mut config = config(server.url("/catalog"), &temp_dir);
    config.upload_endpoint = Some(server.url("/wp-json/wc/v3/products/batch"));

    let summary = ScrapeRunner::from_config(&config).run().await.unwrap();

    upload_mock.assert();
    assert!(summary.uploaded);
}

#[tokio::test]
async fn test_upload_failure_keeps_exports() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/catalog");
        then.status(200).body(WIDGETS_PAGE);
    });
    server.mock(|when, then| {
        when.method(POST).path("/import");
        then.status(403).body("forbidden");
    });

    let mut config = config(server.url("/catalog"), &temp_dir);
    config.upload_endpoint = Some(server.url("/import"));

    let result = ScrapeRunner::from_config(&config).run().await;

    let err = assert_err!(result);
    assert!(matches!(err, ScrapeError::UploadError { status: Some(403), .. }));
    assert!(std::path::Path::new(&config.csv_path).exists());
    assert!(std::path::Path::new(&config.json_path).exists());
}
