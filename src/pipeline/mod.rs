//! Acquisition of a single source: fetch, extract, stamp ownership.

pub mod merge;

use std::sync::Arc;

use tracing::debug;

use crate::app::error::AcquisitionError;
use crate::domain::{Item, Source};
use crate::extractor::{ExtractedFeed, Extractor};
use crate::fetcher::Fetcher;

pub use merge::merge_new;

#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            extractor: Extractor::new(),
        }
    }

    /// Fetch and extract the document behind `address`.
    ///
    /// Transport and parse failures stay distinct. No retries happen here.
    pub async fn fetch_feed(&self, address: &str) -> Result<ExtractedFeed, AcquisitionError> {
        let body = self.fetcher.fetch(address).await?;
        debug!("Fetched {} bytes from {}", body.len(), address);
        Ok(self.extractor.extract(&body, address)?)
    }

    /// Acquire the current items of a registered source, owned by that source.
    pub async fn acquire(&self, source: &Source) -> Result<Vec<Item>, AcquisitionError> {
        let extracted = self.fetch_feed(&source.address).await?;
        Ok(extracted
            .entries
            .into_iter()
            .map(|entry| entry.into_item(source.id.clone()))
            .collect())
    }
}
