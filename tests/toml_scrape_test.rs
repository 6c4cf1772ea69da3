use anyhow::Result;
use httpmock::prelude::*;
use shop_scraper::utils::validation::Validate;
use shop_scraper::{ScrapeRunner, TomlConfig};
use tempfile::TempDir;

/// TOML 配置驅動完整流程
#[tokio::test]
async fn test_toml_config_drives_full_scrape() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let out = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/shop");
        then.status(200).body(
            r#"<section>
                 <article class="card"><h2>Widget A</h2><b>$9.99</b><em>Tools</em></article>
                 <article class="card"><h2>Widget B</h2><b>$14.50</b><em>Tools</em></article>
               </section>"#,
        );
    });
    let upload_mock = server.mock(|when, then| {
        when.method(POST).path("/import");
        then.status(201);
    });

    let config_content = format!(
        r#"
[scrape]
name = "toml-e2e"
start_url = "{start}"

[browser]
backend = "static"

[selectors]
product = "article.card"
name = "h2"
price = "b"
category = "em"
details = "p"

[output]
csv_path = "{out}/products.csv"
json_path = "{out}/products.json"

[upload]
endpoint = "{upload}"
"#,
        start = server.url("/shop"),
        out = out,
        upload = server.url("/import"),
    );

    let config_path = temp_dir.path().join("scraper.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;

    let summary = ScrapeRunner::from_config(&config).run().await?;

    page_mock.assert();
    upload_mock.assert();
    assert_eq!(summary.records, 2);
    assert!(summary.uploaded);

    let csv = tokio::fs::read_to_string(format!("{}/products.csv", out)).await?;
    assert_eq!(
        csv,
        "Name,Price,Category,Details\nWidget A,9.99,Tools,\nWidget B,14.50,Tools,\n"
    );
    Ok(())
}
