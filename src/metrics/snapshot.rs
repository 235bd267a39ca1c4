use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub urls_queued: u64,
    pub urls_processed: u64,
    pub urls_invalid: u64,
    pub pages_saved: u64,
    pub fetches_failed: u64,
    pub redirects_followed: u64,
    pub bytes_written: u64,
    pub requests_total: u64,
    pub pauses: u64,
    pub success_rate: f64,
    pub avg_response_time_ms: u64,
    pub elapsed_seconds: f64,
}
