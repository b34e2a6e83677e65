mod format;
mod normalizer;
mod reporter;

use thiserror::Error;

pub use format::{expand_short_year, DateFormat, CENTURY_PIVOT};
pub use normalizer::{DateNormalizer, ISO_FORMAT, SUPPORTED_DATE_FORMATS};
pub use reporter::{DateReporter, RecordingReporter, TracingReporter};

/// Why a date mention could not be turned into an ISO date. Neither variant
/// stops processing; both go to the [`DateReporter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Unrecognized date format: {0}")]
    UnrecognizedDateFormat(String),
    #[error("Malformed embedded date: {0}")]
    MalformedEmbeddedDate(String),
}

impl DateError {
    pub fn raw_text(&self) -> &str {
        match self {
            Self::UnrecognizedDateFormat(text) | Self::MalformedEmbeddedDate(text) => text,
        }
    }
}
