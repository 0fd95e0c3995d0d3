use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid header value for {header}: {reason}")]
    InvalidHeader { header: &'static str, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("fetch of {url} exceeded {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("invalid price pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("price pattern \"{pattern}\" declares {groups} capture groups; at most one is allowed")]
    TooManyCaptureGroups { pattern: String, groups: usize },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },
}
