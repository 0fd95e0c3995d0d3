pub mod client;
pub mod error;
pub mod extract;
pub mod pattern;
pub mod strategy;
mod text;
pub mod types;

pub use client::{FetchSettings, HttpFetcher, PageFetcher};
pub use error::ScraperError;
pub use extract::PriceExtractor;
pub use pattern::{PatternKind, PriceMatch, PricePattern};
pub use strategy::ExtractionStrategy;
pub use types::PriceResult;
