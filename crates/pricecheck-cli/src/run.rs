//! Command handlers for the CLI.
//!
//! Only startup problems (bad config, bad catalog, unwritable output) are
//! errors. Individual prices that cannot be found are reported as missing
//! cells and never fail the run.

use pricecheck_core::{catalog_warnings, load_catalog, AppConfig, CatalogFile};
use pricecheck_scraper::{FetchSettings, HttpFetcher, PriceExtractor};

use crate::report::output::{render_table, write_csv_file};
use crate::report::{build_report, compile_vendor_columns};

fn load_catalog_with_context(config: &AppConfig) -> anyhow::Result<CatalogFile> {
    let catalog = load_catalog(&config.catalog_path).map_err(|e| {
        anyhow::anyhow!(
            "failed to load catalog from {}: {e}",
            config.catalog_path.display()
        )
    })?;
    Ok(catalog)
}

/// Fetch every (product, vendor) page, print the comparison table to stdout
/// and write it as CSV to `config.output_path`.
///
/// # Errors
///
/// Returns an error if the catalog or a vendor strategy is invalid, the HTTP
/// client cannot be built, or the CSV file cannot be written.
pub(crate) async fn run_report(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog_with_context(config)?;
    for warning in catalog_warnings(&catalog) {
        tracing::warn!(%warning, "suspicious catalog entry");
    }
    let columns = compile_vendor_columns(&catalog)?;

    let settings = FetchSettings::from_app_config(config);
    let fetcher = HttpFetcher::new(&settings)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
    let extractor = PriceExtractor::new(fetcher, settings.timeout);

    tracing::info!(
        products = catalog.products.len(),
        vendors = columns.len(),
        max_concurrent = config.max_concurrent_fetches,
        timeout_ms = extractor.timeout().as_millis(),
        "starting price comparison"
    );

    let report = build_report(
        &catalog,
        &columns,
        &extractor,
        config.max_concurrent_fetches,
    )
    .await;

    print!("{}", render_table(&report));
    write_csv_file(&report, &config.output_path)?;

    println!();
    println!(
        "Found {}/{} prices at {}; wrote {}",
        report.found_count(),
        report.cell_count(),
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC"),
        config.output_path.display()
    );

    Ok(())
}

/// Validate the catalog and compile every vendor strategy without fetching.
///
/// # Errors
///
/// Returns an error if the catalog fails validation or a vendor's selector
/// or pattern does not compile.
pub(crate) fn run_check(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog_with_context(config)?;
    let columns = compile_vendor_columns(&catalog)?;

    println!(
        "catalog {}: {} products, {} vendors",
        config.catalog_path.display(),
        catalog.products.len(),
        catalog.vendors.len()
    );
    for column in &columns {
        let selectors: Vec<&str> = column.strategy.selectors().collect();
        println!(
            "  {:<20}selectors [{}]  pattern {}{}",
            column.vendor.id,
            selectors.join(", "),
            column.strategy.fallback().as_str(),
            if column.strategy.fallback().has_capture() {
                " (captured group)"
            } else {
                ""
            }
        );
    }

    let warnings = catalog_warnings(&catalog);
    if warnings.is_empty() {
        println!("no catalog warnings");
    } else {
        println!("{} catalog warnings:", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}
