//! Fetch-then-extract, with every failure collapsed to [`PriceResult::NotFound`].

use std::time::Duration;

use crate::client::PageFetcher;
use crate::error::ScraperError;
use crate::strategy::ExtractionStrategy;
use crate::types::PriceResult;

/// Fetches a product page and runs a vendor strategy over it.
///
/// Each call is independent: one fetch attempt bounded by `timeout`, no
/// retries, no shared state beyond the fetcher.
#[derive(Debug, Clone)]
pub struct PriceExtractor<F> {
    fetcher: F,
    timeout: Duration,
}

impl<F: PageFetcher> PriceExtractor<F> {
    #[must_use]
    pub fn new(fetcher: F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the price found on `url`, or `NotFound` if the page cannot be
    /// fetched within the timeout or no strategy pass matches. Never errors.
    pub async fn extract_price(&self, url: &str, strategy: &ExtractionStrategy) -> PriceResult {
        let body = match self.fetch_page(url).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(url, error = %err, "page fetch failed; price not found");
                return PriceResult::NotFound;
            }
        };

        let result = strategy.extract(&body);
        match &result {
            PriceResult::Found(price) => {
                tracing::debug!(url, price = price.as_str(), "price extracted");
            }
            PriceResult::NotFound => {
                tracing::debug!(url, body_len = body.len(), "no price on page");
            }
        }
        result
    }

    /// The fetcher may enforce its own timeout; this one bounds the whole
    /// call regardless of the fetcher implementation.
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        match tokio::time::timeout(self.timeout, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(ScraperError::Timeout {
                url: url.to_owned(),
                timeout_ms: self.timeout.as_millis(),
            }),
        }
    }
}
