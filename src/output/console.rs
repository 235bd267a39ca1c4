use super::ReportSink;
use indicatif::MultiProgress;
use std::sync::Arc;

/// Prints report lines to stdout, or above the progress bars when they are shown.
pub struct ConsoleOutput {
    multi: Option<Arc<MultiProgress>>,
}

impl ConsoleOutput {
    pub fn new(multi: Option<Arc<MultiProgress>>) -> Self {
        Self { multi }
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ReportSink for ConsoleOutput {
    fn line(&self, text: &str) {
        match &self.multi {
            Some(multi) => {
                if let Err(e) = multi.println(text) {
                    log::warn!("Could not print report line: {}", e);
                }
            }
            None => println!("{}", text),
        }
    }
}
