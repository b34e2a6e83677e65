use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::extractor::{
    CompositeExtractor, ExtractionError, Extractor, HttpExtractor, PageText, RuleBasedExtractor,
    SpanFileExtractor,
};
use super::layout::{PageFile, PageTree};
use super::sink::{BulkSink, RecordFileSink, RecordSink};
use crate::aggregate::EntityAggregator;
use crate::config::{ExtractorKind, OutputFormat, PipelineConfig};
use crate::record::{PageId, PageRecord};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Not a page file: {0}")]
    InvalidPageName(String),
    #[error("Worker failed: {0}")]
    Task(String),
}

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub pages_processed: usize,
    pub pages_failed: usize,
    pub dates: usize,
    pub entities: usize,
    pub duration_ms: u64,
}

impl IngestStats {
    pub const fn total_pages(&self) -> usize {
        self.pages_processed + self.pages_failed
    }
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub successful: Vec<PageId>,
    pub failed: Vec<(PathBuf, IngestError)>,
    pub stats: IngestStats,
}

impl BatchResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn add_success(&mut self, record: &PageRecord) {
        self.stats.pages_processed += 1;
        self.stats.dates += record.dates.len();
        self.stats.entities += record.entity_count();
        self.successful
            .push(PageId::new(&record.orig_file, &record.page));
    }

    fn add_failure(&mut self, path: PathBuf, error: IngestError) {
        self.stats.pages_failed += 1;
        self.failed.push((path, error));
    }

    pub fn success_count(&self) -> usize {
        self.successful.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// Reads pages, extracts spans, aggregates records and hands them to a sink.
pub struct PagePipeline {
    extractor: Box<dyn Extractor>,
    aggregator: EntityAggregator,
    sink: Box<dyn RecordSink>,
    jobs: usize,
}

impl PagePipeline {
    #[must_use]
    pub fn new(extractor: Box<dyn Extractor>, sink: Box<dyn RecordSink>) -> Self {
        Self {
            extractor,
            aggregator: EntityAggregator::default(),
            sink,
            jobs: 1,
        }
    }

    /// Builds the extractor and sink named by `config`. Records go under
    /// `out_root` unless the config asks for a bulk file.
    pub async fn from_config(config: &PipelineConfig, out_root: &Path) -> IngestResult<Self> {
        let primary: Box<dyn Extractor> = match config.extractor {
            ExtractorKind::Http => Box::new(HttpExtractor::from_config(&config.ner)?),
            ExtractorKind::Spans if config.strict_spans => {
                Box::new(SpanFileExtractor::new().strict())
            }
            ExtractorKind::Spans => Box::new(SpanFileExtractor::new()),
            ExtractorKind::Rules => Box::new(RuleBasedExtractor::with_default_patterns()),
        };

        let extractor: Box<dyn Extractor> =
            if config.date_rules && config.extractor != ExtractorKind::Rules {
                Box::new(CompositeExtractor::default().with_extractor(primary))
            } else {
                primary
            };

        let sink: Box<dyn RecordSink> = match &config.output {
            OutputFormat::Records => Box::new(RecordFileSink::new(out_root)),
            OutputFormat::Bulk { path, index } => {
                Box::new(BulkSink::create(&out_root.join(path), index.clone()).await?)
            }
        };

        Ok(Self::new(extractor, sink).with_jobs(config.jobs))
    }

    #[must_use]
    pub fn with_aggregator(mut self, aggregator: EntityAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Turns one page into a record without writing it anywhere.
    pub async fn build_record(&self, page: &PageFile) -> IngestResult<PageRecord> {
        let text = tokio::fs::read_to_string(&page.source).await?;
        let input = PageText::new(page.id.clone(), text).with_path(page.source.clone());

        let spans = self.extractor.extract(&input).await?;
        Ok(self.aggregator.aggregate(&page.id, &input.text, &spans))
    }

    pub async fn process_page(&self, page: &PageFile) -> IngestResult<PageRecord> {
        let record = self.build_record(page).await?;
        self.sink.write(page, &record).await?;
        tracing::debug!(page = %page.id, dates = record.dates.len(), "wrote record");
        Ok(record)
    }

    /// Processes every page in `tree`, at most `jobs` at a time. A failing
    /// page is recorded in the result and does not stop the others.
    pub async fn run(self: Arc<Self>, tree: &PageTree) -> IngestResult<BatchResult> {
        let start = Instant::now();
        let mut result = BatchResult::new();

        self.sink.prepare(tree).await?;

        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut tasks = JoinSet::new();

        for page in tree.pages.iter().cloned() {
            let pipeline = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let path = page.source.clone();
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return (path, Err(IngestError::Task(e.to_string()))),
                };

                // A panicking page surfaces here as a JoinError, still tied to its path.
                let worker = tokio::spawn(async move { pipeline.process_page(&page).await });
                let outcome = worker
                    .await
                    .unwrap_or_else(|e| Err(IngestError::Task(e.to_string())));
                (path, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (path, outcome) = joined.unwrap_or_else(|e| {
                (PathBuf::from("<worker>"), Err(IngestError::Task(e.to_string())))
            });
            match outcome {
                Ok(record) => result.add_success(&record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "page failed: {e}");
                    result.add_failure(path, e);
                }
            }
        }

        self.sink.finish().await?;

        result.stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            processed = result.stats.pages_processed,
            failed = result.stats.pages_failed,
            dates = result.stats.dates,
            "ingested {}",
            tree.root.display()
        );

        Ok(result)
    }
}
