use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::ExtractorConfig;
use crate::record::PageId;
use crate::span::{EntityLabel, EntitySpan};

/// Suffix of the sidecar file holding precomputed spans for a page.
pub const SPAN_FILE_SUFFIX: &str = ".ents.json";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("NER service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("No NER endpoint configured")]
    MissingEndpoint,
    #[error("Span file {path} could not be read: {source}")]
    SpanFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed span data: {0}")]
    MalformedSpans(#[from] serde_json::Error),
    #[error("Page has no source path")]
    MissingPath,
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// One page handed to an extractor.
#[derive(Debug, Clone)]
pub struct PageText {
    pub id: PageId,
    pub path: Option<PathBuf>,
    pub text: String,
}

impl PageText {
    #[must_use]
    pub fn new(id: PageId, text: String) -> Self {
        Self {
            id,
            path: None,
            text,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Turns page text into labelled entity spans.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, page: &PageText) -> ExtractionResult<Vec<EntitySpan>>;

    async fn extract_text(&self, text: &str) -> ExtractionResult<Vec<EntitySpan>> {
        let page = PageText::new(PageId::new("", ""), text.to_string());
        self.extract(&page).await
    }
}

/// Accepted span payloads: a bare array or an object with an `ents` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpanPayload {
    Spans(Vec<EntitySpan>),
    Doc { ents: Vec<EntitySpan> },
}

impl SpanPayload {
    fn into_spans(self) -> Vec<EntitySpan> {
        match self {
            Self::Spans(spans) | Self::Doc { ents: spans } => spans,
        }
    }
}

#[derive(Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

/// Calls an external NER service over HTTP.
pub struct HttpExtractor {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpExtractor {
    pub fn new(endpoint: Url, timeout: Duration) -> ExtractionResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &ExtractorConfig) -> ExtractionResult<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or(ExtractionError::MissingEndpoint)?;
        Self::new(endpoint, Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait::async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, page: &PageText) -> ExtractionResult<Vec<EntitySpan>> {
        let payload: SpanPayload = self
            .client
            .post(self.endpoint.clone())
            .json(&NerRequest { text: &page.text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(payload.into_spans())
    }
}

/// Reads spans produced ahead of time and stored next to each page as
/// `<page file>.ents.json`. A page without a sidecar has no entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanFileExtractor {
    require_file: bool,
}

impl SpanFileExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat a missing sidecar as an error instead of an empty page.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.require_file = true;
        self
    }

    pub fn span_path(page_path: &Path) -> PathBuf {
        let mut name = page_path.as_os_str().to_owned();
        name.push(SPAN_FILE_SUFFIX);
        PathBuf::from(name)
    }
}

#[async_trait::async_trait]
impl Extractor for SpanFileExtractor {
    async fn extract(&self, page: &PageText) -> ExtractionResult<Vec<EntitySpan>> {
        let path = Self::span_path(page.path.as_ref().ok_or(ExtractionError::MissingPath)?);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.require_file => {
                tracing::debug!(page = %page.id, "no span file, treating page as empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(ExtractionError::SpanFile { path, source }),
        };

        let payload: SpanPayload = serde_json::from_str(&raw)?;
        Ok(payload.into_spans())
    }
}

pub struct ExtractionPattern {
    pub label: EntityLabel,
    pub regex: regex::Regex,
}

impl ExtractionPattern {
    pub fn new(label: EntityLabel, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label,
            regex: regex::Regex::new(pattern)?,
        })
    }
}

/// Tags every regex match with the pattern's label.
pub struct RuleBasedExtractor {
    patterns: Vec<ExtractionPattern>,
}

impl RuleBasedExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: ExtractionPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Date shapes only: there is no sensible regex for people or places.
    #[must_use]
    pub fn with_default_patterns() -> Self {
        let mut extractor = Self::new();

        let patterns = [
            r"\b[0-9]{4}-[0-9]{2}-[0-9]{2}\b",
            r"\b[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}\b",
            r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.? [0-9]{1,2},? [0-9]{4}\b",
            r"(?i)\b[0-9]{1,2} (?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]* [0-9]{4}\b",
        ];

        for pattern in patterns {
            if let Ok(p) = ExtractionPattern::new(EntityLabel::Date, pattern) {
                extractor.patterns.push(p);
            }
        }

        extractor
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Extractor for RuleBasedExtractor {
    async fn extract(&self, page: &PageText) -> ExtractionResult<Vec<EntitySpan>> {
        let spans = self
            .patterns
            .iter()
            .flat_map(|pattern| {
                pattern
                    .regex
                    .find_iter(&page.text)
                    .map(|m| EntitySpan::new(m.as_str(), pattern.label.clone()))
            })
            .collect();

        Ok(spans)
    }
}

/// Runs several extractors and concatenates their spans.
pub struct CompositeExtractor {
    extractors: Vec<Box<dyn Extractor>>,
}

impl CompositeExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }
}

impl Default for CompositeExtractor {
    fn default() -> Self {
        Self::new().with_extractor(Box::new(RuleBasedExtractor::with_default_patterns()))
    }
}

#[async_trait::async_trait]
impl Extractor for CompositeExtractor {
    async fn extract(&self, page: &PageText) -> ExtractionResult<Vec<EntitySpan>> {
        let mut combined = Vec::new();

        for extractor in &self.extractors {
            combined.extend(extractor.extract(page).await?);
        }

        Ok(combined)
    }
}
