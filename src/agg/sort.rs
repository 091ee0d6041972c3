use std::cmp::Ordering;

use crate::model::stats::EndpointStats;

/// Which column orders the table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SortMetric {
    #[default]
    Count,
    Min,
    Max,
    Avg,
    Stdev,
    P10,
    P50,
    P90,
    P95,
    P99,
    BodyMin,
    BodyMax,
    BodyAvg,
}

impl SortMetric {
    /// An unknown metric name orders by count. The fallback is a deliberate,
    /// observable rule, not an error.
    fn parse(name: &str) -> Self {
        match name {
            "count" => SortMetric::Count,
            "min" => SortMetric::Min,
            "max" => SortMetric::Max,
            "avg" => SortMetric::Avg,
            "stdev" => SortMetric::Stdev,
            "p10" => SortMetric::P10,
            "p50" => SortMetric::P50,
            "p90" => SortMetric::P90,
            "p95" => SortMetric::P95,
            "p99" => SortMetric::P99,
            "bodymin" => SortMetric::BodyMin,
            "bodymax" => SortMetric::BodyMax,
            "bodyavg" => SortMetric::BodyAvg,
            _ => SortMetric::Count,
        }
    }

    fn value(self, stats: &EndpointStats) -> f64 {
        match self {
            SortMetric::Count => stats.count as f64,
            SortMetric::Min => stats.min_time,
            SortMetric::Max => stats.max_time,
            SortMetric::Avg => stats.avg_time,
            SortMetric::Stdev => stats.stdev,
            SortMetric::P10 => stats.p10,
            SortMetric::P50 => stats.p50,
            SortMetric::P90 => stats.p90,
            SortMetric::P95 => stats.p95,
            SortMetric::P99 => stats.p99,
            SortMetric::BodyMin => stats.min_body,
            SortMetric::BodyMax => stats.max_body,
            SortMetric::BodyAvg => stats.avg_body,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SortSpec {
    pub metric: SortMetric,
    pub descending: bool,
}

impl SortSpec {
    /// Parse a "metric,direction" argument. Ascending unless the direction
    /// part is exactly "desc".
    pub fn parse(raw: &str) -> Self {
        let (name, direction) = match raw.split_once(',') {
            Some((name, direction)) => (name, direction),
            None => (raw, ""),
        };
        Self {
            metric: SortMetric::parse(name),
            descending: direction == "desc",
        }
    }
}

/// Pure comparator between two rows under one sort specification.
pub fn order_stats(a: &EndpointStats, b: &EndpointStats, spec: SortSpec) -> Ordering {
    let ord = spec.metric.value(a).total_cmp(&spec.metric.value(b));
    if spec.descending { ord.reverse() } else { ord }
}
