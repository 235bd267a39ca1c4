use crate::metrics::snapshot::MetricsSnapshot;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct MetricsCollector {
    urls_queued: Arc<AtomicU64>,
    urls_processed: Arc<AtomicU64>,
    urls_invalid: Arc<AtomicU64>,
    pages_saved: Arc<AtomicU64>,
    fetches_failed: Arc<AtomicU64>,
    redirects_followed: Arc<AtomicU64>,
    bytes_written: Arc<AtomicU64>,
    requests_total: Arc<AtomicU64>,
    pauses: Arc<AtomicU64>,
    total_response_time_ms: Arc<AtomicU64>,
    start_time: Arc<Instant>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            urls_queued: Arc::new(AtomicU64::new(0)),
            urls_processed: Arc::new(AtomicU64::new(0)),
            urls_invalid: Arc::new(AtomicU64::new(0)),
            pages_saved: Arc::new(AtomicU64::new(0)),
            fetches_failed: Arc::new(AtomicU64::new(0)),
            redirects_followed: Arc::new(AtomicU64::new(0)),
            bytes_written: Arc::new(AtomicU64::new(0)),
            requests_total: Arc::new(AtomicU64::new(0)),
            pauses: Arc::new(AtomicU64::new(0)),
            total_response_time_ms: Arc::new(AtomicU64::new(0)),
            start_time: Arc::new(Instant::now()),
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_urls_queued(&self, count: u64) {
        self.urls_queued.fetch_add(count, Ordering::SeqCst);
    }

    pub fn increment_urls_processed(&self) {
        self.urls_processed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_urls_invalid(&self) {
        self.urls_invalid.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_redirects(&self) {
        self.redirects_followed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_pauses(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    /// One HTTP round trip, whatever its status.
    pub fn record_request(&self, duration: Duration) {
        self.requests_total.fetch_add(1, Ordering::SeqCst);
        self.total_response_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn record_saved(&self, bytes: u64) {
        self.pages_saved.fetch_add(1, Ordering::SeqCst);
        self.bytes_written.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.fetches_failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests_total = self.requests_total.load(Ordering::SeqCst);
        let saved = self.pages_saved.load(Ordering::SeqCst);
        let failed = self.fetches_failed.load(Ordering::SeqCst);
        let total_time = self.total_response_time_ms.load(Ordering::SeqCst);

        let attempted = saved + failed;
        let success_rate = if attempted > 0 {
            (saved as f64 / attempted as f64) * 100.0
        } else {
            0.0
        };

        let avg_response_time_ms = if requests_total > 0 {
            total_time / requests_total
        } else {
            0
        };

        MetricsSnapshot {
            urls_queued: self.urls_queued.load(Ordering::SeqCst),
            urls_processed: self.urls_processed.load(Ordering::SeqCst),
            urls_invalid: self.urls_invalid.load(Ordering::SeqCst),
            pages_saved: saved,
            fetches_failed: failed,
            redirects_followed: self.redirects_followed.load(Ordering::SeqCst),
            bytes_written: self.bytes_written.load(Ordering::SeqCst),
            requests_total,
            pauses: self.pauses.load(Ordering::SeqCst),
            success_rate,
            avg_response_time_ms,
            elapsed_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }
}
