//! Page fetch collaborator: a browser-like HTTP GET that returns the body as text.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;

use crate::error::ScraperError;

/// Fetches page bodies for the extractor.
///
/// Implementations report every failure (transport, TLS, non-2xx status) as
/// an `Err`; the extractor decides what a failure means.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// Transport settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
    pub accept_invalid_certs: bool,
}

impl FetchSettings {
    #[must_use]
    pub fn from_app_config(config: &pricecheck_core::AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.request_timeout_secs),
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            accept_invalid_certs: config.accept_invalid_certs,
        }
    }
}

/// `reqwest`-backed [`PageFetcher`]. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Builds the client with the configured timeout, `User-Agent` and
    /// `Accept-Language` headers.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidHeader`] if `accept_language` is not a valid header value.
    /// - [`ScraperError::ClientBuild`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(settings: &FetchSettings) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        let language = HeaderValue::from_str(&settings.accept_language).map_err(|e| {
            ScraperError::InvalidHeader {
                header: "Accept-Language",
                reason: e.to_string(),
            }
        })?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(ScraperError::ClientBuild)?;

        Ok(Self {
            client,
            timeout: settings.timeout,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> ScraperError {
        if err.is_timeout() {
            ScraperError::Timeout {
                url: url.to_owned(),
                timeout_ms: self.timeout.as_millis(),
            }
        } else {
            ScraperError::Http(err)
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response.text().await.map_err(|e| self.classify(url, e))
    }
}
