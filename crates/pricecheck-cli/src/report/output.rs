//! Console table and CSV export for an assembled [`Report`].

use std::io::Write;
use std::path::Path;

use super::Report;

const ITEM_HEADER: &str = "Item";
const MISSING_CELL: &str = "\u{2014}";
const COLUMN_GAP: usize = 2;

/// Render the report as a left-aligned fixed-width table, one line per row.
pub(crate) fn render_table(report: &Report) -> String {
    let mut header = vec![ITEM_HEADER.to_string()];
    header.extend(report.vendor_names.iter().cloned());

    let body: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.product_name.clone()];
            cells.extend(
                row.prices
                    .iter()
                    .map(|p| p.price.as_price().unwrap_or(MISSING_CELL).to_string()),
            );
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for cells in std::iter::once(&header).chain(&body) {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<w$}", w = width + COLUMN_GAP))
            .collect::<String>();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Write the report as CSV: `Item` then one column per vendor. Missing
/// prices are empty cells.
///
/// # Errors
///
/// Returns an error if a record cannot be written to `writer`.
pub(crate) fn write_csv<W: Write>(report: &Report, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![ITEM_HEADER];
    header.extend(report.vendor_names.iter().map(String::as_str));
    csv_writer.write_record(&header)?;

    for row in &report.rows {
        let mut record = vec![row.product_name.as_str()];
        record.extend(row.prices.iter().map(|p| p.price.as_price().unwrap_or("")));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// # Errors
///
/// Returns an error if `path` cannot be created or written.
pub(crate) fn write_csv_file(report: &Report, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", path.display()))?;
    write_csv(report, std::io::BufWriter::new(file))
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
}
