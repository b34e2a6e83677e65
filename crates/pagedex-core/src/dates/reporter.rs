use std::sync::{Arc, Mutex};

use super::DateError;
use crate::record::PageId;

/// Diagnostic sink for date mentions that could not be normalized.
pub trait DateReporter: Send + Sync {
    fn report(&self, page: &PageId, error: &DateError);
}

/// Emits a `debug` event per unparseable date.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl DateReporter for TracingReporter {
    fn report(&self, page: &PageId, error: &DateError) {
        tracing::debug!(
            orig_file = %page.orig_file,
            page = %page.page,
            text = error.raw_text(),
            "{error}"
        );
    }
}

/// Keeps reports in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<(PageId, DateError)>>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(PageId, DateError)> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn raw_texts(&self) -> Vec<String> {
        self.reports()
            .into_iter()
            .map(|(_, e)| e.raw_text().to_string())
            .collect()
    }
}

impl DateReporter for RecordingReporter {
    fn report(&self, page: &PageId, error: &DateError) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((page.clone(), error.clone()));
        }
    }
}
