use crate::classify::{ResponseClass, classify};
use crate::config::CrawlConfig;
use crate::error::{FetchError, Result};
use crate::filename::derive_filename;
use crate::metadata::extract_metadata;
use crate::metrics::MetricsCollector;
use crate::output::ReportSink;
use crate::url_check::parse_http_url;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, redirect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Outcome of one top-level fetch, redirects included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchResult {
    Success {
        filename: String,
        last_modified: DateTime<Utc>,
        links_count: usize,
        images_count: usize,
    },
    Failure {
        message: String,
    },
}

impl FetchResult {
    pub fn failure(message: impl Into<String>) -> Self {
        FetchResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            FetchResult::Success { filename, .. } => Some(filename),
            FetchResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::Failure { message } => Some(message),
        }
    }
}

impl From<FetchError> for FetchResult {
    fn from(err: FetchError) -> Self {
        FetchResult::failure(err.to_string())
    }
}

/// One hop of a fetch chain: the URL to request and how many redirects may still follow it.
///
/// `requested` is the URL as it was given (the caller's input, or the `Location` value of
/// the previous hop) and is what reports and failure messages quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub requested: String,
    pub url: Url,
    pub redirects_remaining: u32,
}

impl FetchRequest {
    pub fn new(requested: impl Into<String>, url: Url, redirect_budget: u32) -> Self {
        Self {
            requested: requested.into(),
            url,
            redirects_remaining: redirect_budget,
        }
    }

    pub fn can_redirect(&self) -> bool {
        self.redirects_remaining > 0
    }

    /// The next hop towards `location`, or `None` once the budget is spent.
    pub fn follow(&self, target: impl Into<String>, location: Url) -> Option<FetchRequest> {
        let remaining = self.redirects_remaining.checked_sub(1)?;
        Some(FetchRequest::new(target, location, remaining))
    }
}

/// `Sat Jul 15 2023 13:00 UTC`
pub fn format_crawl_time(time: &DateTime<Utc>) -> String {
    time.format("%a %b %d %Y %H:%M UTC").to_string()
}

pub struct Fetcher {
    client: Client,
    output_dir: PathBuf,
    max_redirects: u32,
    sink: Arc<dyn ReportSink>,
    metrics: Arc<MetricsCollector>,
}

impl Fetcher {
    pub fn new(
        config: &CrawlConfig,
        sink: Arc<dyn ReportSink>,
        metrics: Arc<MetricsCollector>,
    ) -> Result<Self> {
        // Redirects are followed by hand so the hop budget and the terminal URL stay ours.
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            output_dir: PathBuf::from(&config.output_dir),
            max_redirects: config.max_redirects,
            sink,
            metrics,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetches `url`, following at most the configured number of redirects, and saves
    /// the terminal page. Never fails: every problem ends up in [`FetchResult::Failure`].
    pub async fn fetch(&self, url: &str) -> FetchResult {
        match parse_http_url(url) {
            Some(parsed) => {
                self.fetch_request(FetchRequest::new(url, parsed, self.max_redirects))
                    .await
            }
            None => self.fail(FetchError::InvalidUrl),
        }
    }

    pub async fn fetch_request(&self, mut request: FetchRequest) -> FetchResult {
        loop {
            log::info!("Visiting: {}", request.requested);

            let started = Instant::now();
            let response = match self.client.get(request.url.clone()).send().await {
                Ok(response) => response,
                Err(e) => {
                    self.metrics.record_request(started.elapsed());
                    return self.fail(FetchError::transport_chain(request.requested.as_str(), &e));
                }
            };
            self.metrics.record_request(started.elapsed());
            log::debug!("{} answered {}", request.requested, response.status());

            // The budget is checked before the Location header is even looked at.
            if response.status().is_redirection() && !request.can_redirect() {
                return self.fail(FetchError::TooManyRedirects {
                    url: request.requested,
                });
            }

            match classify(
                &request.url,
                &request.requested,
                response.status(),
                response.headers(),
            ) {
                ResponseClass::Success => return self.save(&request, response).await,
                ResponseClass::Redirect { location, target } => match request.follow(target, location) {
                    Some(next) => {
                        self.sink.line(&format!("Redirected to {}", next.requested));
                        self.metrics.increment_redirects();
                        request = next;
                    }
                    None => {
                        return self.fail(FetchError::TooManyRedirects {
                            url: request.requested,
                        });
                    }
                },
                ResponseClass::Failure(err) => return self.fail(err),
            }
        }
    }

    async fn save(&self, request: &FetchRequest, response: Response) -> FetchResult {
        let requested = request.requested.as_str();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return self.fail(FetchError::transport_chain(requested, &e)),
        };

        let filename = derive_filename(&request.url);
        let path = self.output_dir.join(&filename);

        let last_modified = match previous_modification(&path).await {
            Some(time) => time,
            None => Utc::now(),
        };

        if let Err(e) = tokio::fs::write(&path, &body).await {
            return self.fail(FetchError::transport(requested, e));
        }
        log::debug!("Saved {} bytes to {}", body.len(), path.display());
        self.metrics.record_saved(body.len() as u64);

        let metadata = extract_metadata(&String::from_utf8_lossy(&body));

        self.sink.line(&format!("site: {}", requested));
        self.sink
            .line(&format!("  Last crawl time: {}", format_crawl_time(&last_modified)));
        self.sink
            .line(&format!("  Number of links: {}", metadata.links_count));
        self.sink
            .line(&format!("  Number of images: {}", metadata.images_count));

        FetchResult::Success {
            filename,
            last_modified,
            links_count: metadata.links_count,
            images_count: metadata.images_count,
        }
    }

    fn fail(&self, err: FetchError) -> FetchResult {
        log::warn!("{}", err);
        self.metrics.record_failure();
        self.sink.line(&err.to_string());
        err.into()
    }
}

async fn previous_modification(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    metadata.modified().ok().map(DateTime::<Utc>::from)
}
