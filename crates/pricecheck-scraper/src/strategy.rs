//! Per-vendor extraction strategy: ordered candidate selectors, then a
//! whole-page fallback pattern.

use pricecheck_core::ExtractionConfig;
use scraper::{Html, Selector};

use crate::error::ScraperError;
use crate::pattern::PricePattern;
use crate::text::{element_text, page_text};
use crate::types::PriceResult;

#[derive(Debug, Clone)]
struct CandidateSelector {
    source: String,
    selector: Selector,
}

/// Compiled form of a vendor's [`ExtractionConfig`].
///
/// Compiling up front means a bad selector or pattern fails at startup
/// instead of silently turning every page for that vendor into a miss.
#[derive(Debug, Clone)]
pub struct ExtractionStrategy {
    candidates: Vec<CandidateSelector>,
    fallback: PricePattern,
    strict: PricePattern,
}

impl ExtractionStrategy {
    /// # Errors
    ///
    /// - [`ScraperError::InvalidSelector`] if a selector does not parse.
    /// - [`ScraperError::InvalidPattern`] / [`ScraperError::TooManyCaptureGroups`]
    ///   if the fallback pattern is unusable.
    pub fn compile(config: &ExtractionConfig) -> Result<Self, ScraperError> {
        let candidates = config
            .selectors
            .iter()
            .map(|source| {
                Selector::parse(source)
                    .map(|selector| CandidateSelector {
                        source: source.clone(),
                        selector,
                    })
                    .map_err(|e| ScraperError::InvalidSelector {
                        selector: source.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fallback = PricePattern::new(config.fallback_pattern())?;

        Ok(Self {
            candidates,
            fallback,
            strict: PricePattern::strict(),
        })
    }

    #[must_use]
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.source.as_str())
    }

    #[must_use]
    pub fn fallback(&self) -> &PricePattern {
        &self.fallback
    }

    /// Locate a price in an HTML page body.
    ///
    /// html5ever recovers from any malformed markup, so parsing never fails;
    /// at worst the document is empty and only the fallback pass runs.
    #[must_use]
    pub fn extract(&self, html: &str) -> PriceResult {
        let document = Html::parse_document(html);

        if let Some(price) = self.candidate_pass(&document) {
            return PriceResult::Found(price);
        }

        let text = page_text(&document);
        match self.fallback.find(&text) {
            Some(found) => {
                tracing::trace!(
                    pattern = self.fallback.as_str(),
                    price = found.as_str(),
                    "fallback pattern matched"
                );
                PriceResult::Found(found.as_str().to_owned())
            }
            None => PriceResult::NotFound,
        }
    }

    /// Selectors are listed most-confident first, so the first element that
    /// carries a `$` and a strict price wins even if later selectors match.
    /// Only the first element per selector is considered.
    fn candidate_pass(&self, document: &Html) -> Option<String> {
        for candidate in &self.candidates {
            let Some(element) = document.select(&candidate.selector).next() else {
                continue;
            };

            let text = element_text(element);
            if !text.contains('$') {
                tracing::trace!(
                    selector = %candidate.source,
                    "selector matched an element without a currency marker"
                );
                continue;
            }

            if let Some(found) = self.strict.find(&text) {
                tracing::trace!(
                    selector = %candidate.source,
                    price = found.as_str(),
                    "selector matched"
                );
                return Some(found.as_str().to_owned());
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "strategy_test.rs"]
mod tests;
