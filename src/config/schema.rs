use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_MAX_REDIRECTS: u32 = 3;
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CrawlConfig {
    /// Redirect hops a single URL may follow after its first request
    #[serde(default = "default_max_redirects")]
    #[validate(range(max = 20))]
    pub max_redirects: u32,

    /// Pause between two top-level URLs
    #[serde(default = "default_delay")]
    pub delay_ms: u64,

    /// `false` for non-interactive runs: no pause is ever taken
    #[serde(default = "default_pacing")]
    pub pacing: bool,

    #[serde(default = "default_output_dir")]
    #[validate(length(min = 1))]
    pub output_dir: String,

    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,

    #[serde(default = "default_timeout")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u32,

    /// Where to export the per-URL results of a batch, if anywhere
    #[serde(default)]
    pub results: Option<ResultsOutput>,

    /// Optional path to a parent configuration file to inherit from
    #[serde(default)]
    pub extends: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResultsOutput {
    Json { path: String },
    Csv { path: String },
}

impl ResultsOutput {
    /// Picks the format from the file extension; anything but `.csv` is JSON.
    pub fn from_path(path: &Path) -> Self {
        let display = path.to_string_lossy().into_owned();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ResultsOutput::Csv { path: display },
            _ => ResultsOutput::Json { path: display },
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_redirects: default_max_redirects(),
            delay_ms: default_delay(),
            pacing: default_pacing(),
            output_dir: default_output_dir(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            results: None,
            extends: None,
        }
    }
}

impl CrawlConfig {
    /// Same configuration with pacing switched off, for tests and scripted runs.
    pub fn non_interactive(mut self) -> Self {
        self.pacing = false;
        self
    }

    pub fn pacing_delay(&self) -> Option<Duration> {
        if self.pacing && self.delay_ms > 0 {
            Some(Duration::from_millis(self.delay_ms))
        } else {
            None
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }
}

pub(crate) fn default_max_redirects() -> u32 {
    DEFAULT_MAX_REDIRECTS
}

pub(crate) fn default_delay() -> u64 {
    DEFAULT_DELAY_MS
}

pub(crate) fn default_pacing() -> bool {
    true
}

pub(crate) fn default_output_dir() -> String {
    ".".to_string()
}

pub(crate) fn default_user_agent() -> String {
    format!("page-crawler/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn default_timeout() -> u32 {
    DEFAULT_TIMEOUT_SECS
}
