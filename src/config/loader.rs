use crate::config::schema::{self, CrawlConfig, ResultsOutput};
use crate::crawler::CrawlerEngine;
use crate::error::{Error, Result};
use crate::metrics::MetricsCollector;
use crate::output::{OutputHandler, ReportSink, csv::CsvOutput, json::JsonOutput};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::Validate;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<CrawlConfig> {
        let path = path.as_ref();
        let mut visited = HashSet::new();
        Self::load_with_inheritance(path, &mut visited, false)
    }

    /// Loads `path` when given, otherwise starts from the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<CrawlConfig> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(CrawlConfig::default()),
        }
    }

    fn load_with_inheritance(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        is_parent_load: bool,
    ) -> Result<CrawlConfig> {
        let path = fs::canonicalize(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        if !visited.insert(path.clone()) {
            return Err(Error::Config(format!(
                "Circular inheritance detected involving {}",
                path.display()
            )));
        }

        let config = Self::load_file(&path)?;

        let final_config = match &config.extends {
            Some(parent_path_str) => {
                let parent_path = path
                    .parent()
                    .ok_or_else(|| {
                        Error::Config(format!(
                            "Cannot determine parent directory for {}",
                            path.display()
                        ))
                    })?
                    .join(parent_path_str);

                let parent_config = Self::load_with_inheritance(&parent_path, visited, true)?;
                Self::merge_configs(parent_config, config)
            }
            None => config,
        };

        if !is_parent_load {
            final_config.validate()?;
        }

        Ok(final_config)
    }

    fn load_file(path: &Path) -> Result<CrawlConfig> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(Error::Config(format!(
                "Unsupported file extension: {}",
                path.display()
            ))),
        }
    }

    /// Child values win wherever they differ from the defaults.
    fn merge_configs(mut parent: CrawlConfig, child: CrawlConfig) -> CrawlConfig {
        if child.max_redirects != schema::default_max_redirects() {
            parent.max_redirects = child.max_redirects;
        }
        if child.delay_ms != schema::default_delay() {
            parent.delay_ms = child.delay_ms;
        }
        if child.pacing != schema::default_pacing() {
            parent.pacing = child.pacing;
        }
        if child.output_dir != schema::default_output_dir() {
            parent.output_dir = child.output_dir;
        }
        if child.user_agent != schema::default_user_agent() {
            parent.user_agent = child.user_agent;
        }
        if child.timeout_secs != schema::default_timeout() {
            parent.timeout_secs = child.timeout_secs;
        }
        if child.results.is_some() {
            parent.results = child.results;
        }

        parent.extends = None;
        parent
    }

    pub fn create_engine(
        config: &CrawlConfig,
        sink: Arc<dyn ReportSink>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Result<CrawlerEngine> {
        config.validate()?;
        CrawlerEngine::new(config, sink, metrics)
    }

    pub fn create_results_output(config: &CrawlConfig) -> Result<Option<Box<dyn OutputHandler>>> {
        let handler: Option<Box<dyn OutputHandler>> = match &config.results {
            Some(ResultsOutput::Json { path }) => Some(Box::new(JsonOutput::new(PathBuf::from(path))?)),
            Some(ResultsOutput::Csv { path }) => Some(Box::new(CsvOutput::new(PathBuf::from(path))?)),
            None => None,
        };
        Ok(handler)
    }
}
