use super::OutputHandler;
use crate::error::Result;
use crate::fetcher::FetchResult;
use async_trait::async_trait;
use std::path::PathBuf;

const HEADERS: [&str; 7] = [
    "url",
    "success",
    "filename",
    "last_modified",
    "links_count",
    "images_count",
    "error",
];

pub struct CsvOutput {
    writer: csv::Writer<std::fs::File>,
    headers_written: bool,
}

impl CsvOutput {
    pub fn new(path: PathBuf) -> Result<Self> {
        let writer = csv::Writer::from_path(path)?;

        Ok(Self {
            writer,
            headers_written: false,
        })
    }
}

#[async_trait]
impl OutputHandler for CsvOutput {
    async fn write(&mut self, url: &str, result: &FetchResult) -> Result<()> {
        if !self.headers_written {
            self.writer.write_record(HEADERS)?;
            self.headers_written = true;
        }

        let record = match result {
            FetchResult::Success {
                filename,
                last_modified,
                links_count,
                images_count,
            } => [
                url.to_string(),
                "true".to_string(),
                filename.clone(),
                last_modified.to_rfc3339(),
                links_count.to_string(),
                images_count.to_string(),
                String::new(),
            ],
            FetchResult::Failure { message } => [
                url.to_string(),
                "false".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                message.clone(),
            ],
        };

        self.writer.write_record(&record)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.headers_written {
            self.writer.write_record(HEADERS)?;
            self.headers_written = true;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn one_row_per_result() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");

        let mut output = CsvOutput::new(path.clone()).unwrap();
        let saved = FetchResult::Success {
            filename: "test.com.html".into(),
            last_modified: Utc::now(),
            links_count: 0,
            images_count: 4,
        };
        output.write("http://test.com", &saved).await.unwrap();
        output
            .write("http://down.test", &FetchResult::failure("Error crawling http://down.test: refused"))
            .await
            .unwrap();
        output.close().await.unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "http://test.com");
        assert_eq!(&rows[0][1], "true");
        assert_eq!(&rows[0][5], "4");
        assert_eq!(&rows[1][1], "false");
        assert!(rows[1][6].starts_with("Error crawling"));
    }
}
