/// Outcome of one (product, vendor) price lookup.
///
/// Every failure mode (unreachable host, bad status, no match) is
/// `NotFound`; the reason is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceResult {
    /// Price text as the vendor formats it, e.g. `"$12.34"`.
    Found(String),
    NotFound,
}

impl PriceResult {
    #[must_use]
    pub fn as_price(&self) -> Option<&str> {
        match self {
            PriceResult::Found(price) => Some(price),
            PriceResult::NotFound => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, PriceResult::Found(_))
    }
}

impl From<Option<String>> for PriceResult {
    fn from(value: Option<String>) -> Self {
        value.map_or(PriceResult::NotFound, PriceResult::Found)
    }
}
