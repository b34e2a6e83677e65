#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod ingest;
pub mod record;
pub mod span;

pub use aggregate::{clean_date_mention, EntityAggregator};
pub use config::{ExtractorConfig, ExtractorKind, OutputFormat, PipelineConfig};
pub use dates::{DateError, DateNormalizer, DateReporter, TracingReporter};
pub use ingest::{
    BatchResult, Extractor, IngestError, IngestStats, PageFile, PagePipeline, PageTree,
};
pub use record::{sanitize_text, PageId, PageRecord, PageRecordBuilder};
pub use span::{EntityLabel, EntitySpan};
