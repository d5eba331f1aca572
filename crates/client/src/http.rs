//! reqwest-backed implementation of [`RagBackend`].

use std::time::Duration;

use intellirag_core::{AppConfig, AppError, AppResult};
use serde::de::DeserializeOwned;

use crate::client::RagBackend;
use crate::error_body::extract_error_message;
use crate::types::{IndexPdfResponse, PdfUpload, QaRequest, QaResponse};

/// HTTP client for the question-answering service.
pub struct HttpBackend {
    /// Base URL without a trailing slash
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a client with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(
            base_url,
            Duration::from_secs(intellirag_core::config::DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS, timeouts).
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client from the resolved application config.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;
        Self::with_timeout(
            config.api_base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turn a response into `T`, or into an [`AppError::Api`] for non-2xx.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), "Service returned error: {}", message);
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| AppError::Serialization(format!("Malformed response from service: {}", e)))
    }
}

fn send_error(url: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Network(format!("Request to {} timed out", url))
    } else {
        AppError::Network(format!("Could not reach {}: {}", url, err))
    }
}

#[async_trait::async_trait]
impl RagBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn ask_question(&self, request: &QaRequest) -> AppResult<QaResponse> {
        let url = self.endpoint("qa");
        tracing::info!("Sending question to {}", url);
        tracing::debug!("Request: {:?}", request);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| send_error(&url, e))?;

        let answer: QaResponse = Self::read_json(response).await?;

        tracing::info!(
            answer_len = answer.answer.len(),
            citations = answer.citations.as_ref().map_or(0, |c| c.len()),
            "Received answer"
        );

        Ok(answer)
    }

    async fn index_pdf(&self, upload: &PdfUpload) -> AppResult<IndexPdfResponse> {
        let url = self.endpoint("index-pdf");
        tracing::info!("Uploading {} to {}", upload.file_name, url);

        let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| AppError::Other(format!("Invalid upload content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| send_error(&url, e))?;

        let indexed: IndexPdfResponse = Self::read_json(response).await?;

        tracing::info!(chunks = ?indexed.chunks_indexed, "Indexing finished");

        Ok(indexed)
    }
}
