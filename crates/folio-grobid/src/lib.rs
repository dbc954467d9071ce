//! HTTP client for a GROBID document-analysis service.
//!
//! GROBID accepts a PDF via multipart upload and returns the document's
//! structure as TEI XML. This crate covers only the transport: a single
//! attempt per call with a timeout, no retry policy. The returned XML text
//! is handed to `folio-tei` for parsing and section extraction.

use std::time::Duration;

use thiserror::Error;

/// Default GROBID base URL for a local installation.
pub const DEFAULT_GROBID_URL: &str = "http://localhost:8070";

/// Full-text processing of a large PDF can take GROBID a while.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum GrobidError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GROBID processing failed with status {0}")]
    Status(reqwest::StatusCode),
    /// GROBID answers 204 when it could not extract anything from the PDF.
    #[error("GROBID found no extractable content in the document")]
    EmptyDocument,
}

/// Client for one GROBID instance.
#[derive(Debug, Clone)]
pub struct GrobidClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GrobidClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a PDF through GROBID's `processFulltextDocument` endpoint and
    /// return the raw TEI XML text.
    pub async fn process_fulltext_document(
        &self,
        pdf: Vec<u8>,
        filename: &str,
    ) -> Result<String, GrobidError> {
        let url = format!("{}/api/processFulltextDocument", self.base_url);

        let part = reqwest::multipart::Part::bytes(pdf)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("input", part);

        tracing::debug!(%url, filename, "sending document to GROBID");
        let resp = self
            .client
            .post(&url)
            .header("Accept", "application/xml")
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Err(GrobidError::EmptyDocument);
        }
        if !status.is_success() {
            tracing::warn!(%status, "GROBID returned an error status");
            return Err(GrobidError::Status(status));
        }

        let xml = resp.text().await?;
        tracing::debug!(bytes = xml.len(), "received TEI XML from GROBID");
        Ok(xml)
    }

    /// Probe GROBID's `isalive` endpoint.
    pub async fn is_alive(&self) -> bool {
        let url = format!("{}/api/isalive", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
