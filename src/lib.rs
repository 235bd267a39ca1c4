pub mod classify;
pub mod config;
pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod filename;
pub mod metadata;
pub mod metrics;
pub mod output;
pub mod url_check;

pub use classify::{ResponseClass, classify};
pub use config::{ConfigLoader, CrawlConfig};
pub use crawler::{BatchResults, CrawlerEngine};
pub use error::{Error, FetchError, Result};
pub use fetcher::{FetchRequest, FetchResult, Fetcher, format_crawl_time};
pub use filename::derive_filename;
pub use metadata::{PageMetadata, extract_metadata};
pub use metrics::collector::MetricsCollector;
pub use metrics::snapshot::MetricsSnapshot;
pub use output::{OutputHandler, ReportSink};
pub use url_check::{is_valid_url, parse_http_url};
