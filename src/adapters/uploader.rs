use crate::core::{ProductRecord, Uploader};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;

/// Posts the records as one JSON array to the store's import endpoint.
pub struct HttpUploader {
    client: Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, records: &[ProductRecord]) -> Result<()> {
        tracing::debug!("POST {} ({} records)", self.endpoint, records.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(records)
            .send()
            .await
            .map_err(|e| ScrapeError::UploadError {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Upload response status: {}", status);

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ScrapeError::UploadError {
            status: Some(status.as_u16()),
            message: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        })
    }
}
