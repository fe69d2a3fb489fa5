//! Mock catalog source with scripted responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{CatalogError, CatalogSource, ListKind};

/// A catalog source that serves scripted results.
///
/// Scripted responses are consumed first, in order; once they run out the
/// fixed CSV (if any) is served, otherwise every fetch fails.
pub struct MockCatalogSource {
    fixed: Option<String>,
    scripted: Mutex<VecDeque<Result<String, CatalogError>>>,
}

impl MockCatalogSource {
    /// A source with no responses; every fetch fails until `push` is called.
    pub fn new() -> Self {
        Self {
            fixed: None,
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// A source that always serves the same CSV text.
    pub fn with_csv(csv: &str) -> Self {
        Self {
            fixed: Some(csv.to_string()),
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// A source whose next fetch fails with `error`.
    pub fn failing(error: CatalogError) -> Self {
        let source = Self::new();
        source.push(Err(error));
        source
    }

    /// Queue a scripted response.
    pub fn push(&self, result: Result<String, CatalogError>) {
        self.scripted
            .lock()
            .expect("mock source lock poisoned")
            .push_back(result);
    }
}

impl Default for MockCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch(&self, _kind: ListKind) -> Result<String, CatalogError> {
        if let Some(next) = self
            .scripted
            .lock()
            .expect("mock source lock poisoned")
            .pop_front()
        {
            return next;
        }

        match &self.fixed {
            Some(csv) => Ok(csv.clone()),
            None => Err(CatalogError::Network("no scripted response".to_string())),
        }
    }
}
