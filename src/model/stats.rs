use crate::model::record::{Record, StatusClass};

/// Running statistics for one (uri, method) key.
///
/// `retained_times` keeps every response time ever observed for the key so
/// the percentiles stay exact nearest-rank over the full history. Memory
/// grows with the key's traffic; bounding it would change the percentiles.
#[derive(Debug, Clone)]
pub struct EndpointStats {
    pub count: u64,
    pub min_time: f64,
    pub max_time: f64,
    pub avg_time: f64,
    pub stdev: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub min_body: f64,
    pub max_body: f64,
    pub avg_body: f64,
    pub code_2xx: u64,
    pub code_3xx: u64,
    pub code_4xx: u64,
    pub code_5xx: u64,
    retained_times: Vec<f64>,
}

impl EndpointStats {
    /// Seed from the first record for a key.
    pub fn seed(record: &Record) -> Self {
        let t = record.response_time;
        let mut stats = Self {
            count: 1,
            min_time: t,
            max_time: t,
            avg_time: t,
            stdev: 0.0,
            p10: t,
            p50: t,
            p90: t,
            p95: t,
            p99: t,
            min_body: record.body_size,
            max_body: record.body_size,
            avg_body: record.body_size,
            code_2xx: 0,
            code_3xx: 0,
            code_4xx: 0,
            code_5xx: 0,
            retained_times: vec![t],
        };
        stats.count_status(record.status);
        stats
    }

    /// Fold one more record into the running stats.
    pub fn observe(&mut self, record: &Record) {
        let t = record.response_time;
        self.count += 1;
        self.retained_times.push(t);
        self.retained_times.sort_by(f64::total_cmp);

        self.p10 = self.retained_times[percentile_idx(self.count, 10)];
        self.p50 = self.retained_times[percentile_idx(self.count, 50)];
        self.p90 = self.retained_times[percentile_idx(self.count, 90)];
        self.p95 = self.retained_times[percentile_idx(self.count, 95)];
        self.p99 = self.retained_times[percentile_idx(self.count, 99)];

        if self.max_time < t {
            self.max_time = t;
        }
        // A minimum of exactly 0 counts as unset and is overwritten.
        if self.min_time > t || self.min_time == 0.0 {
            self.min_time = t;
        }

        let now = self.count as f64;
        let before = now - 1.0;
        self.avg_time = (self.avg_time * before + t) / now;

        // Sample standard deviation over the full history with the
        // just-updated mean, divisor n-1. Recomputed fresh on every record,
        // not maintained incrementally.
        let mut sum = 0.0;
        for &x in &self.retained_times {
            let diff = x - self.avg_time;
            sum += diff * diff;
        }
        self.stdev = (sum / before).sqrt();

        let b = record.body_size;
        if self.max_body < b {
            self.max_body = b;
        }
        if self.min_body > b || self.min_body == 0.0 {
            self.min_body = b;
        }
        self.avg_body = (self.avg_body * before + b) / now;

        self.count_status(record.status);
    }

    fn count_status(&mut self, status: Option<StatusClass>) {
        match status {
            Some(StatusClass::Success) => self.code_2xx += 1,
            Some(StatusClass::Redirect) => self.code_3xx += 1,
            Some(StatusClass::ClientError) => self.code_4xx += 1,
            Some(StatusClass::ServerError) => self.code_5xx += 1,
            None => {}
        }
    }

    pub fn retained_times(&self) -> &[f64] {
        &self.retained_times
    }
}

/// Nearest-rank index into a sorted sample of `len` values: (len * pct / 100)
/// - 1, clamped to 0.
fn percentile_idx(len: u64, pct: u64) -> usize {
    (len * pct / 100).saturating_sub(1) as usize
}
