//! HTTP download of remote PDFs.
//!
//! One GET per call, no retry. A response only counts as a PDF when the
//! status is exactly 200 and the `Content-Type` starts with
//! `application/pdf`; anything else is a [`Pdf2TxtError::FetchFailed`]
//! carrying the status so the caller can report it. Transport failures and
//! timeouts get their own variants.

use crate::config::ExtractionConfig;
use crate::error::Pdf2TxtError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

const PDF_MIME: &str = "application/pdf";

/// HTTP client for downloading PDF documents.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout_secs: u64,
}

impl Fetcher {
    /// Create a fetcher using the timeout and User-Agent from `config`.
    pub fn new(config: &ExtractionConfig) -> Result<Self, Pdf2TxtError> {
        Self::with_options(&config.user_agent, config.download_timeout_secs)
    }

    pub fn with_options(user_agent: &str, timeout_secs: u64) -> Result<Self, Pdf2TxtError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| Pdf2TxtError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Download `url` and return the response body.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, Pdf2TxtError> {
        info!("Downloading PDF from: {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, PDF_MIME)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!(
            "GET {} → {} ({})",
            url,
            status,
            content_type.as_deref().unwrap_or("no content-type")
        );

        if status != StatusCode::OK || !is_pdf_content_type(content_type.as_deref()) {
            return Err(Pdf2TxtError::FetchFailed {
                url: url.to_string(),
                status: status.as_u16(),
                content_type,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        info!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> Pdf2TxtError {
        if e.is_timeout() {
            Pdf2TxtError::DownloadTimeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            Pdf2TxtError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// `true` when the header value names the PDF media type (parameters allowed).
fn is_pdf_content_type(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with(PDF_MIME))
        .unwrap_or(false)
}
