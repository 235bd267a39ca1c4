use crate::config::CrawlConfig;
use crate::error::{FetchError, Result};
use crate::fetcher::{FetchResult, Fetcher};
use crate::metrics::collector::MetricsCollector;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::output::ReportSink;
use crate::url_check::is_valid_url;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Per-URL results of a batch, in the order URLs were first seen.
///
/// A URL that appears twice keeps its first position but holds the later result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResults {
    entries: Vec<(String, FetchResult)>,
    index: HashMap<String, usize>,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `result` for `url`, returning the result it replaced.
    pub fn insert(&mut self, url: String, result: FetchResult) -> Option<FetchResult> {
        match self.index.get(&url) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, result)),
            None => {
                self.index.insert(url.clone(), self.entries.len());
                self.entries.push((url, result));
                None
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&FetchResult> {
        self.index.get(url).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(url, _)| url.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FetchResult)> {
        self.entries.iter().map(|(url, result)| (url.as_str(), result))
    }
}

/// Runs a list of URLs through the [`Fetcher`], one after another.
pub struct CrawlerEngine {
    fetcher: Fetcher,
    pacing: Option<Duration>,
    sink: Arc<dyn ReportSink>,
    metrics: Arc<MetricsCollector>,
}

impl CrawlerEngine {
    pub fn new(
        config: &CrawlConfig,
        sink: Arc<dyn ReportSink>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Result<Self> {
        let metrics = metrics.unwrap_or_else(|| Arc::new(MetricsCollector::new()));
        let fetcher = Fetcher::new(config, sink.clone(), metrics.clone())?;

        Ok(Self {
            fetcher,
            pacing: config.pacing_delay(),
            sink,
            metrics,
        })
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Crawls `urls` in order and returns one result per distinct URL.
    ///
    /// Invalid URLs are recorded without touching the network. After every URL that
    /// did reach the network the engine pauses before moving on, unless pacing is off
    /// or nothing is left to crawl.
    pub async fn crawl_urls<S: AsRef<str>>(&self, urls: &[S]) -> BatchResults {
        let mut results = BatchResults::new();
        self.metrics.add_urls_queued(urls.len() as u64);

        for (position, url) in urls.iter().enumerate() {
            let url = url.as_ref();

            if !is_valid_url(url) {
                self.sink.line(&format!("Invalid URL: {}", url));
                self.metrics.increment_urls_invalid();
                self.metrics.increment_urls_processed();
                results.insert(url.to_string(), FetchError::InvalidUrl.into());
                continue;
            }

            let result = self.fetcher.fetch(url).await;
            self.metrics.increment_urls_processed();
            if results.insert(url.to_string(), result).is_some() {
                log::debug!("{} was listed more than once; keeping the latest result", url);
            }

            if position + 1 < urls.len() {
                self.pause().await;
            }
        }

        log::info!("Crawl finished: {} URL(s)", results.len());
        results
    }

    async fn pause(&self) {
        if let Some(delay) = self.pacing {
            log::debug!("Pausing {:?} before the next URL", delay);
            self.metrics.increment_pauses();
            sleep(delay).await;
        }
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<MetricsSnapshot> {
        let (tx, rx) = watch::channel(self.metrics.snapshot());
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(250));
            loop {
                interval.tick().await;
                if tx.send(metrics.snapshot()).is_err() {
                    break;
                }
            }
        });
        rx
    }
}
