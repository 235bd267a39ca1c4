use crate::crawler::BatchResults;
use crate::error::Result;
use crate::fetcher::FetchResult;
use async_trait::async_trait;

pub mod console;
pub mod csv;
pub mod json;
pub mod memory;

/// Line-oriented destination for the human-readable crawl report.
pub trait ReportSink: Send + Sync {
    fn line(&self, text: &str);
}

/// Destination for the per-URL results of a finished batch.
#[async_trait]
pub trait OutputHandler: Send + Sync {
    async fn write(&mut self, url: &str, result: &FetchResult) -> Result<()>;
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes every entry of `results`, in batch order, then closes the handler.
pub async fn export_results(handler: &mut dyn OutputHandler, results: &BatchResults) -> Result<()> {
    for (url, result) in results.iter() {
        handler.write(url, result).await?;
    }
    handler.close().await
}
