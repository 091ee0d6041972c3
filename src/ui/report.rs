use std::fmt;

use crate::{
    agg::{sort::SortSpec, table::AggregationTable},
    ui::{column_widths, headers, pad_cells, row_cells},
};

/// One-shot table for batch mode: every key, no pagination.
pub fn print_table(table: &AggregationTable, sort: SortSpec, expand: bool) {
    let s = render_table_to_string(table, sort, expand);
    print!("{s}");
}

pub fn render_table_to_string(table: &AggregationTable, sort: SortSpec, expand: bool) -> String {
    let mut out = String::new();
    write_table(&mut out, table, sort, expand).unwrap();
    out
}

fn write_table<W: fmt::Write>(
    out: &mut W,
    table: &AggregationTable,
    sort: SortSpec,
    expand: bool,
) -> fmt::Result {
    let headers = headers(expand);
    let rows: Vec<Vec<String>> = table
        .sorted_keys(sort)
        .into_iter()
        .map(|key| row_cells(key, table.get(key).unwrap(), expand))
        .collect();
    let widths = column_widths(&headers, &rows);

    writeln!(out, "{}", pad_cells(&headers, &widths))?;
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(w - 2)).collect();
    writeln!(out, "{}", pad_cells(&dashes, &widths))?;
    for row in &rows {
        writeln!(out, "{}", pad_cells(row, &widths))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{Record, StatusClass};

    fn record(uri: &str, method: &str, time: f64, body: f64) -> Record {
        Record {
            uri: uri.into(),
            method: method.into(),
            status: StatusClass::from_code("200"),
            response_time: time,
            body_size: body,
        }
    }

    #[test]
    fn renders_header_and_formatted_rows() {
        let mut table = AggregationTable::new();
        table.upsert(&record("/api/items", "GET", 0.1, 512.0));
        table.upsert(&record("/api/items", "GET", 0.3, 256.0));

        let out = render_table_to_string(&table, SortSpec::default(), false);
        let mut lines = out.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("COUNT"));
        assert!(header.contains("BODYAVG"));
        assert!(!header.contains("P50"));

        let separator = lines.next().unwrap();
        assert!(separator.starts_with("-----"));

        let row = lines.next().unwrap();
        assert!(row.starts_with('2'));
        assert!(row.contains("0.100"));
        assert!(row.contains("0.300"));
        assert!(row.contains("0.200")); // avg
        assert!(row.contains("256.00"));
        assert!(row.contains("512.00"));
        assert!(row.contains("384.00")); // body avg
        assert!(row.contains("GET"));
        assert!(row.ends_with("/api/items"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn expanded_table_carries_percentile_columns() {
        let mut table = AggregationTable::new();
        for t in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0] {
            table.upsert(&record("/p", "GET", t, 1.0));
        }
        let out = render_table_to_string(&table, SortSpec::default(), true);
        assert!(out.lines().next().unwrap().contains("P99"));
        // p50 of 1..=10 under nearest-rank
        assert!(out.contains("5.000"));
    }

    #[test]
    fn descending_min_orders_rows() {
        let mut table = AggregationTable::new();
        table.upsert(&record("/fast", "GET", 0.1, 1.0));
        table.upsert(&record("/slow", "GET", 0.9, 1.0));

        let out = render_table_to_string(&table, SortSpec::parse("min,desc"), false);
        let slow = out.find("/slow").unwrap();
        let fast = out.find("/fast").unwrap();
        assert!(slow < fast);
    }
}
