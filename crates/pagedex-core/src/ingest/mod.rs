mod extractor;
mod layout;
mod pipeline;
mod sink;

pub use extractor::{
    CompositeExtractor, ExtractionError, ExtractionPattern, ExtractionResult, Extractor,
    HttpExtractor, PageText, RuleBasedExtractor, SpanFileExtractor, SPAN_FILE_SUFFIX,
};
pub use layout::{parse_page_name, PageFile, PageTree, RECORD_SUFFIX};
pub use pipeline::{BatchResult, IngestError, IngestResult, IngestStats, PagePipeline};
pub use sink::{BulkSink, RecordFileSink, RecordSink, DEFAULT_INDEX};
