//! Report assembly: one extraction per (product, vendor) pair, folded into
//! rows in catalog order with columns in vendor order.

pub(crate) mod output;

use futures::stream::{self, StreamExt};
use pricecheck_core::{CatalogFile, VendorConfig};
use pricecheck_scraper::{ExtractionStrategy, PageFetcher, PriceExtractor, PriceResult};

/// A vendor column: its catalog entry plus the compiled strategy.
pub(crate) struct VendorColumn<'a> {
    pub vendor: &'a VendorConfig,
    pub strategy: ExtractionStrategy,
}

/// Compile every vendor's strategy, in catalog vendor order.
///
/// # Errors
///
/// Returns an error naming the vendor whose selector or pattern is invalid.
pub(crate) fn compile_vendor_columns(
    catalog: &CatalogFile,
) -> anyhow::Result<Vec<VendorColumn<'_>>> {
    catalog
        .vendors
        .iter()
        .map(|vendor| {
            ExtractionStrategy::compile(&vendor.extraction)
                .map(|strategy| VendorColumn { vendor, strategy })
                .map_err(|e| anyhow::anyhow!("vendor '{}': {e}", vendor.id))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VendorPrice {
    pub vendor_id: String,
    pub price: PriceResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportRow {
    pub product_name: String,
    /// One entry per vendor, in vendor column order.
    pub prices: Vec<VendorPrice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Report {
    /// Column headings after the product name, in vendor order.
    pub vendor_names: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.prices.len()).sum()
    }

    pub fn found_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| &r.prices)
            .filter(|p| p.price.is_found())
            .count()
    }
}

/// Run the extractor for every (product, vendor) pair with at most
/// `max_concurrent` fetches in flight.
///
/// Completion order is arbitrary; results are keyed by (product index,
/// vendor index) and placed back into catalog/vendor order, so the report
/// always has one row per product and one price per vendor.
pub(crate) async fn build_report<F: PageFetcher>(
    catalog: &CatalogFile,
    columns: &[VendorColumn<'_>],
    extractor: &PriceExtractor<F>,
    max_concurrent: usize,
) -> Report {
    let jobs = catalog
        .products
        .iter()
        .enumerate()
        .flat_map(|(product_idx, product)| {
            columns
                .iter()
                .enumerate()
                .map(move |(vendor_idx, column)| (product_idx, product, vendor_idx, column))
        });

    let results: Vec<(usize, usize, PriceResult)> = stream::iter(jobs)
        .map(|(product_idx, product, vendor_idx, column)| async move {
            let vendor_id = column.vendor.id.as_str();
            let price = match product.endpoint(vendor_id) {
                Some(url) => extractor.extract_price(url, &column.strategy).await,
                None => {
                    tracing::error!(
                        product = %product.name,
                        vendor = vendor_id,
                        "no endpoint configured; catalog validation should have caught this"
                    );
                    PriceResult::NotFound
                }
            };
            tracing::debug!(
                product = %product.name,
                vendor = vendor_id,
                found = price.is_found(),
                "extraction finished"
            );
            (product_idx, vendor_idx, price)
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut slots: Vec<Vec<Option<PriceResult>>> =
        vec![vec![None; columns.len()]; catalog.products.len()];
    for (product_idx, vendor_idx, price) in results {
        let slot = &mut slots[product_idx][vendor_idx];
        debug_assert!(slot.is_none(), "slot written twice");
        *slot = Some(price);
    }

    let rows = catalog
        .products
        .iter()
        .zip(slots)
        .map(|(product, product_slots)| ReportRow {
            product_name: product.name.clone(),
            prices: columns
                .iter()
                .zip(product_slots)
                .map(|(column, slot)| VendorPrice {
                    vendor_id: column.vendor.id.clone(),
                    price: slot.unwrap_or(PriceResult::NotFound),
                })
                .collect(),
        })
        .collect();

    Report {
        vendor_names: columns.iter().map(|c| c.vendor.name.clone()).collect(),
        rows,
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
