//! Compiled price patterns.
//!
//! A pattern either yields its whole match or, when it declares a capture
//! group, the text of that group. Which one is decided once at compile time
//! and carried as [`PatternKind`], so callers never inspect match objects.

use std::sync::LazyLock;

use pricecheck_core::DEFAULT_PRICE_PATTERN;
use regex::Regex;

use crate::error::ScraperError;

static STRICT_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_PRICE_PATTERN).expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    WholeMatch,
    CapturedGroup,
}

/// Text located by a [`PricePattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceMatch<'t> {
    Whole(&'t str),
    Captured(&'t str),
}

impl<'t> PriceMatch<'t> {
    #[must_use]
    pub fn as_str(&self) -> &'t str {
        match self {
            PriceMatch::Whole(s) | PriceMatch::Captured(s) => s,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PricePattern {
    regex: Regex,
    kind: PatternKind,
}

impl PricePattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidPattern`] if the regex does not compile.
    /// - [`ScraperError::TooManyCaptureGroups`] if it declares more than one group.
    pub fn new(pattern: &str) -> Result<Self, ScraperError> {
        let regex = Regex::new(pattern).map_err(|source| ScraperError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;

        // captures_len() counts the implicit whole-match group.
        let kind = match regex.captures_len() - 1 {
            0 => PatternKind::WholeMatch,
            1 => PatternKind::CapturedGroup,
            groups => {
                return Err(ScraperError::TooManyCaptureGroups {
                    pattern: pattern.to_owned(),
                    groups,
                })
            }
        };

        Ok(Self { regex, kind })
    }

    /// The strict monetary pattern: `$` then digits/commas, a point and two digits.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            regex: STRICT_PRICE_RE.clone(),
            kind: PatternKind::WholeMatch,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    #[must_use]
    pub fn has_capture(&self) -> bool {
        self.kind == PatternKind::CapturedGroup
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Leftmost match in `haystack`.
    ///
    /// A capture group that did not participate in the match (e.g. `(...)?`)
    /// falls back to the whole match.
    #[must_use]
    pub fn find<'t>(&self, haystack: &'t str) -> Option<PriceMatch<'t>> {
        match self.kind {
            PatternKind::WholeMatch => self
                .regex
                .find(haystack)
                .map(|m| PriceMatch::Whole(m.as_str())),
            PatternKind::CapturedGroup => {
                let caps = self.regex.captures(haystack)?;
                match caps.get(1) {
                    Some(group) => Some(PriceMatch::Captured(group.as_str())),
                    None => caps.get(0).map(|m| PriceMatch::Whole(m.as_str())),
                }
            }
        }
    }
}
