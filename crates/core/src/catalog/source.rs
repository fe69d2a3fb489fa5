//! Catalog data sources.
//!
//! The fetch seam is a trait so the application core can be driven by a mock
//! source in tests; the production implementation is a thin reqwest client
//! with a bounded request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{CatalogError, ListKind};
use crate::config::SourcesConfig;

/// Trait for raw catalog text providers.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw CSV text for a list kind.
    async fn fetch(&self, kind: ListKind) -> Result<String, CatalogError>;
}

/// HTTP catalog source backed by the configured per-list URLs.
pub struct HttpCatalogSource {
    client: Client,
    sources: SourcesConfig,
}

impl HttpCatalogSource {
    /// Create a new HTTP source. The timeout bounds the whole request,
    /// connect included.
    pub fn new(sources: SourcesConfig, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self { client, sources })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self, kind: ListKind) -> Result<String, CatalogError> {
        let url = self.sources.url_for(kind);

        debug!(%kind, "fetching catalog");

        let response = self.client.get(url).send().await.map_err(map_fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Network(format!(
                "unexpected status {} from {}",
                status, url
            )));
        }

        response.text().await.map_err(map_fetch_error)
    }
}

fn map_fetch_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Network(e.to_string())
    }
}
