use std::collections::HashMap;

use crate::{
    agg::sort::{SortSpec, order_stats},
    model::{
        record::{AggregateKey, Record},
        stats::EndpointStats,
    },
};

/// Per-key running statistics with insertion-ordered keys and a pagination
/// cursor for the dashboard's top pane. Keys are never removed.
#[derive(Debug, Default)]
pub struct AggregationTable {
    entries: HashMap<AggregateKey, EndpointStats>,
    keys: Vec<AggregateKey>,
    start: usize,
    visible_rows: usize,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a record into its key's stats, creating the row on first sight.
    /// Never fails; malformed input is filtered upstream.
    pub fn upsert(&mut self, record: &Record) {
        let key = AggregateKey::of(record);
        match self.entries.get_mut(&key) {
            Some(stats) => stats.observe(record),
            None => {
                self.keys.push(key.clone());
                self.entries.insert(key, EndpointStats::seed(record));
            }
        }
    }

    pub fn get(&self, key: &AggregateKey) -> Option<&EndpointStats> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of distinct uris across all keys.
    pub fn distinct_uris(&self) -> usize {
        let mut uris: Vec<&str> = self.keys.iter().map(|k| k.uri.as_str()).collect();
        uris.sort_unstable();
        uris.dedup();
        uris.len()
    }

    /// Lines that produced a record, i.e. the sum of per-key counts.
    pub fn accepted_lines(&self) -> u64 {
        self.entries.values().map(|s| s.count).sum()
    }

    /// All keys ordered by the requested metric. Ties land in whatever order
    /// the sort leaves them.
    pub fn sorted_keys(&self, spec: SortSpec) -> Vec<&AggregateKey> {
        let mut keys: Vec<&AggregateKey> = self.keys.iter().collect();
        keys.sort_by(|a, b| order_stats(&self.entries[*a], &self.entries[*b], spec));
        keys
    }

    /// The current pagination window over `sorted_keys`, clipped to the
    /// available keys.
    pub fn page(&self, spec: SortSpec) -> Vec<&AggregateKey> {
        let keys = self.sorted_keys(spec);
        let end = (self.start + self.visible_rows).min(keys.len());
        let start = self.start.min(end);
        keys[start..end].to_vec()
    }

    /// Fit the window to the pane. When every key fits, the window snaps back
    /// to the top.
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows;
        if self.visible_rows >= self.keys.len() {
            self.start = 0;
        } else {
            self.start = self.start.min(self.keys.len() - self.visible_rows);
        }
    }

    pub fn scroll_up(&mut self) {
        if self.start > 0 {
            self.start -= 1;
        }
    }

    pub fn scroll_down(&mut self) {
        if self.start + self.visible_rows < self.keys.len() {
            self.start += 1;
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::StatusClass;

    fn record(uri: &str, method: &str, time: f64) -> Record {
        Record {
            uri: uri.into(),
            method: method.into(),
            status: StatusClass::from_code("200"),
            response_time: time,
            body_size: 100.0,
        }
    }

    fn table_of(records: &[Record]) -> AggregationTable {
        let mut table = AggregationTable::new();
        for r in records {
            table.upsert(r);
        }
        table
    }

    #[test]
    fn upsert_keys_by_uri_and_method() {
        let table = table_of(&[
            record("/a", "GET", 0.1),
            record("/a", "POST", 0.2),
            record("/a", "GET", 0.3),
        ]);
        assert_eq!(table.len(), 2);
        let get = AggregateKey { uri: "/a".into(), method: "GET".into() };
        assert_eq!(table.get(&get).unwrap().count, 2);
        assert_eq!(table.distinct_uris(), 1);
        assert_eq!(table.accepted_lines(), 3);
    }

    #[test]
    fn sorted_keys_by_min_descending() {
        let table = table_of(&[
            record("/a", "GET", 0.1),
            record("/b", "GET", 0.3),
            record("/c", "GET", 0.2),
        ]);
        let keys = table.sorted_keys(SortSpec::parse("min,desc"));
        let mins: Vec<f64> = keys.iter().map(|k| table.get(k).unwrap().min_time).collect();
        assert!(mins.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn unknown_metric_orders_like_count() {
        let table = table_of(&[
            record("/a", "GET", 0.1),
            record("/b", "GET", 0.3),
            record("/b", "GET", 0.2),
            record("/b", "GET", 0.4),
            record("/c", "GET", 0.2),
            record("/c", "GET", 0.5),
        ]);
        let bogus: Vec<u64> = table
            .sorted_keys(SortSpec::parse("bogus,asc"))
            .iter()
            .map(|k| table.get(k).unwrap().count)
            .collect();
        let count: Vec<u64> = table
            .sorted_keys(SortSpec::parse("count,asc"))
            .iter()
            .map(|k| table.get(k).unwrap().count)
            .collect();
        assert_eq!(bogus, count);
        assert!(count.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn page_clips_to_the_window() {
        let mut table = table_of(&[
            record("/a", "GET", 0.1),
            record("/b", "GET", 0.2),
            record("/c", "GET", 0.3),
            record("/d", "GET", 0.4),
        ]);
        table.set_visible_rows(2);
        let spec = SortSpec::parse("min,asc");
        assert_eq!(table.page(spec).len(), 2);

        table.scroll_down();
        table.scroll_down();
        assert_eq!(table.start(), 2);
        // already at the last window
        table.scroll_down();
        assert_eq!(table.start(), 2);

        table.scroll_up();
        table.scroll_up();
        assert_eq!(table.start(), 0);
        table.scroll_up();
        assert_eq!(table.start(), 0);
    }

    #[test]
    fn window_snaps_to_top_when_everything_fits() {
        let mut table = table_of(&[
            record("/a", "GET", 0.1),
            record("/b", "GET", 0.2),
            record("/c", "GET", 0.3),
        ]);
        table.set_visible_rows(2);
        table.scroll_down();
        assert_eq!(table.start(), 1);

        table.set_visible_rows(10);
        assert_eq!(table.start(), 0);
        assert_eq!(table.page(SortSpec::default()).len(), 3);
    }
}
