use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    failed_requests: AtomicUsize,
    datasets_loaded: AtomicUsize,
    extractions: AtomicUsize,
    cache_hits: AtomicUsize,
    searches: AtomicUsize,

    // Timing (in microseconds)
    total_index_time_us: AtomicU64,
    total_extract_time_us: AtomicU64,
    total_search_time_us: AtomicU64,

    // Counts
    total_nodes_returned: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            datasets_loaded: AtomicUsize::new(0),
            extractions: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
            total_index_time_us: AtomicU64::new(0),
            total_extract_time_us: AtomicU64::new(0),
            total_search_time_us: AtomicU64::new(0),
            total_nodes_returned: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_index(&self, duration: Duration) {
        self.datasets_loaded.fetch_add(1, Ordering::Relaxed);
        self.total_index_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_extract(&self, duration: Duration, nodes: usize) {
        self.extractions.fetch_add(1, Ordering::Relaxed);
        self.total_extract_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.total_nodes_returned.fetch_add(nodes, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search(&self, duration: Duration) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.total_search_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            datasets_loaded: self.datasets_loaded.load(Ordering::Relaxed),
            extractions: self.extractions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            avg_index_time_ms: avg_time_ms(&self.total_index_time_us, &self.datasets_loaded),
            avg_extract_time_ms: avg_time_ms(&self.total_extract_time_us, &self.extractions),
            avg_search_time_ms: avg_time_ms(&self.total_search_time_us, &self.searches),
            avg_nodes_per_extraction: {
                let n = self.extractions.load(Ordering::Relaxed);
                if n > 0 {
                    self.total_nodes_returned.load(Ordering::Relaxed) as f64 / n as f64
                } else {
                    0.0
                }
            },
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    let cnt = count.load(Ordering::Relaxed) as f64;
    if cnt > 0.0 {
        total / cnt / 1000.0 // Convert to ms
    } else {
        0.0
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub failed_requests: usize,
    pub datasets_loaded: usize,
    pub extractions: usize,
    pub cache_hits: usize,
    pub searches: usize,
    pub avg_index_time_ms: f64,
    pub avg_extract_time_ms: f64,
    pub avg_search_time_ms: f64,
    pub avg_nodes_per_extraction: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averages() {
        let metrics = Metrics::new();
        metrics.record_extract(Duration::from_millis(2), 10);
        metrics.record_extract(Duration::from_millis(4), 30);
        metrics.record_request(true);
        metrics.record_request(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.extractions, 2);
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
        assert!((snapshot.avg_extract_time_ms - 3.0).abs() < 1e-9);
        assert!((snapshot.avg_nodes_per_extraction - 20.0).abs() < 1e-9);
        assert_eq!(snapshot.avg_search_time_ms, 0.0);
    }
}
