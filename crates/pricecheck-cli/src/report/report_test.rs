use std::collections::HashMap;
use std::time::{Duration, Instant};

use pricecheck_core::parse_catalog;
use pricecheck_scraper::ScraperError;

use super::*;

const CATALOG: &str = r"
vendors:
  - id: acme
    name: Acme
    selectors: [span.price]
  - id: globex
    name: Globex
    pattern: '5000\+[^\$]*(\$[0-9,]+\.\d{2})'
products:
  - name: Pint
    endpoints:
      acme: https://acme.example/pint
      globex: https://globex.example/pint
  - name: Flute
    endpoints:
      acme: https://acme.example/flute
      globex: https://globex.example/flute
  - name: Tumbler
    endpoints:
      acme: https://acme.example/tumbler
      globex: https://globex.example/tumbler
";

/// Canned page per URL, each served after its own delay. URLs without a
/// page fail like an unreachable host.
struct StubFetcher {
    pages: HashMap<&'static str, (Duration, &'static str)>,
}

impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let Some((delay, body)) = self.pages.get(url) else {
            return Err(ScraperError::UnexpectedStatus {
                status: 502,
                url: url.to_owned(),
            });
        };
        tokio::time::sleep(*delay).await;
        Ok((*body).to_string())
    }
}

fn stub(pages: &[(&'static str, u64, &'static str)]) -> StubFetcher {
    StubFetcher {
        pages: pages
            .iter()
            .map(|(url, delay_ms, body)| (*url, (Duration::from_millis(*delay_ms), *body)))
            .collect(),
    }
}

fn prices(report: &Report) -> Vec<Vec<Option<&str>>> {
    report
        .rows
        .iter()
        .map(|row| row.prices.iter().map(|p| p.price.as_price()).collect())
        .collect()
}

#[tokio::test]
async fn report_has_one_row_per_product_and_one_cell_per_vendor() {
    let catalog = parse_catalog(CATALOG).unwrap();
    let columns = compile_vendor_columns(&catalog).unwrap();
    // Every fetch fails: shape must still be complete.
    let extractor = PriceExtractor::new(stub(&[]), Duration::from_secs(1));

    let report = build_report(&catalog, &columns, &extractor, 4).await;

    assert_eq!(report.vendor_names, ["Acme", "Globex"]);
    assert_eq!(report.rows.len(), 3);
    for row in &report.rows {
        let ids: Vec<&str> = row.prices.iter().map(|p| p.vendor_id.as_str()).collect();
        assert_eq!(ids, ["acme", "globex"]);
        assert!(row.prices.iter().all(|p| p.price == PriceResult::NotFound));
    }
    assert_eq!(report.cell_count(), 6);
    assert_eq!(report.found_count(), 0);
}

#[tokio::test]
async fn rows_follow_catalog_order_despite_completion_order() {
    let catalog = parse_catalog(CATALOG).unwrap();
    let columns = compile_vendor_columns(&catalog).unwrap();
    // Earlier products answer slowest so they complete last.
    let fetcher = stub(&[
        ("https://acme.example/pint", 120, r#"<span class="price">$1.10</span>"#),
        ("https://globex.example/pint", 100, "<p>5000+ $0.91</p>"),
        ("https://acme.example/flute", 60, r#"<span class="price">$2.20</span>"#),
        ("https://acme.example/tumbler", 0, r#"<span class="price">$3.30</span>"#),
        ("https://globex.example/tumbler", 10, "<p>Buy 5000+ for $0.89 each</p>"),
    ]);
    let extractor = PriceExtractor::new(fetcher, Duration::from_secs(2));

    let report = build_report(&catalog, &columns, &extractor, 6).await;

    let names: Vec<&str> = report.rows.iter().map(|r| r.product_name.as_str()).collect();
    assert_eq!(names, ["Pint", "Flute", "Tumbler"]);
    assert_eq!(
        prices(&report),
        vec![
            vec![Some("$1.10"), Some("$0.91")],
            vec![Some("$2.20"), None],
            vec![Some("$3.30"), Some("$0.89")],
        ]
    );
    assert_eq!(report.found_count(), 5);
}

#[tokio::test]
async fn hanging_vendor_does_not_hold_up_siblings() {
    let catalog = parse_catalog(CATALOG).unwrap();
    let columns = compile_vendor_columns(&catalog).unwrap();
    let fetcher = stub(&[
        ("https://acme.example/pint", 0, r#"<span class="price">$1.10</span>"#),
        ("https://globex.example/pint", 60_000, "<p>5000+ $0.91</p>"),
        ("https://acme.example/flute", 0, r#"<span class="price">$2.20</span>"#),
        ("https://globex.example/flute", 0, "<p>5000+ $0.95</p>"),
        ("https://acme.example/tumbler", 0, r#"<span class="price">$3.30</span>"#),
        ("https://globex.example/tumbler", 0, "<p>5000+ $0.89</p>"),
    ]);
    let extractor = PriceExtractor::new(fetcher, Duration::from_millis(200));

    let started = Instant::now();
    let report = build_report(&catalog, &columns, &extractor, 2).await;

    assert!(
        started.elapsed() < Duration::from_secs(5),
        "a hung fetch must be cut off by its own timeout, took {:?}",
        started.elapsed()
    );
    assert_eq!(
        prices(&report),
        vec![
            vec![Some("$1.10"), None],
            vec![Some("$2.20"), Some("$0.95")],
            vec![Some("$3.30"), Some("$0.89")],
        ]
    );
}

#[tokio::test]
async fn sequential_limit_produces_same_report() {
    let catalog = parse_catalog(CATALOG).unwrap();
    let columns = compile_vendor_columns(&catalog).unwrap();
    let pages = [
        ("https://acme.example/pint", 5, r#"<span class="price">$1.10</span>"#),
        ("https://globex.example/flute", 0, "<p>5000+ $0.95</p>"),
    ];

    let sequential = build_report(
        &catalog,
        &columns,
        &PriceExtractor::new(stub(&pages), Duration::from_secs(1)),
        1,
    )
    .await;
    let concurrent = build_report(
        &catalog,
        &columns,
        &PriceExtractor::new(stub(&pages), Duration::from_secs(1)),
        8,
    )
    .await;

    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn empty_catalog_yields_empty_report() {
    let catalog = parse_catalog(
        r"
vendors:
  - id: acme
    name: Acme
products: []
",
    )
    .unwrap();
    let columns = compile_vendor_columns(&catalog).unwrap();
    let extractor = PriceExtractor::new(stub(&[]), Duration::from_secs(1));

    let report = build_report(&catalog, &columns, &extractor, 4).await;

    assert_eq!(report.vendor_names, ["Acme"]);
    assert!(report.rows.is_empty());
}

#[test]
fn compile_vendor_columns_names_the_bad_vendor() {
    let catalog = parse_catalog(
        r"
vendors:
  - id: acme
    name: Acme
    selectors: ['span[']
products: []
",
    )
    .unwrap();
    let err = compile_vendor_columns(&catalog).err().expect("expected an error");
    assert!(err.to_string().contains("vendor 'acme'"), "got: {err}");
}
