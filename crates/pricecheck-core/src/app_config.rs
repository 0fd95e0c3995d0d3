use std::path::PathBuf;

/// Runtime settings for a price comparison run, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub output_path: PathBuf,
    /// Budget for a single page fetch, connect through body read.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// Upper bound on in-flight page fetches. Always at least 1.
    pub max_concurrent_fetches: usize,
    /// Skip TLS certificate validation. Only affects transport trust.
    pub accept_invalid_certs: bool,
}
