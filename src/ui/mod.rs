pub mod bottom;
pub mod dashboard;
pub mod report;
pub mod top;

use crate::model::{record::AggregateKey, stats::EndpointStats};

/// Column headers in display order. The percentile block only appears when
/// the expand flag is set.
pub fn headers(expand: bool) -> Vec<&'static str> {
    let mut headers = vec!["COUNT", "MIN", "MAX", "AVG", "STDEV"];
    if expand {
        headers.extend(["P10", "P50", "P90", "P95", "P99"]);
    }
    headers.extend(["BODYMIN", "BODYMAX", "BODYAVG", "METHOD", "URI"]);
    headers
}

/// Formatted cells for one row, aligned with `headers`. Times get three
/// decimal places, body sizes two.
pub fn row_cells(key: &AggregateKey, stats: &EndpointStats, expand: bool) -> Vec<String> {
    let mut cells = vec![
        stats.count.to_string(),
        format!("{:.3}", stats.min_time),
        format!("{:.3}", stats.max_time),
        format!("{:.3}", stats.avg_time),
        format!("{:.3}", stats.stdev),
    ];
    if expand {
        cells.extend([
            format!("{:.3}", stats.p10),
            format!("{:.3}", stats.p50),
            format!("{:.3}", stats.p90),
            format!("{:.3}", stats.p95),
            format!("{:.3}", stats.p99),
        ]);
    }
    cells.extend([
        format!("{:.2}", stats.min_body),
        format!("{:.2}", stats.max_body),
        format!("{:.2}", stats.avg_body),
        key.method.clone(),
        key.uri.clone(),
    ]);
    cells
}

/// Width of each column: the widest of the header and any cell, plus two of
/// padding. Computed left-to-right over whatever rows are actually shown.
pub fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    for width in &mut widths {
        *width += 2;
    }
    widths
}

/// One padded display line from a row of cells.
pub fn pad_cells<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        line.push_str(cell);
        line.extend(std::iter::repeat_n(' ', width.saturating_sub(cell.len())));
    }
    while line.ends_with(' ') {
        line.pop();
    }
    line
}
