use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Connection settings for the external NER service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub endpoint: Option<Url>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which extractor backend produces the spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// External NER service over HTTP
    Http,
    /// Precomputed `<page>.ents.json` sidecar files
    #[default]
    Spans,
    /// Built-in date regexes only
    Rules,
}

/// Shape of the emitted records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One `.record` file per page under the output directory
    #[default]
    Records,
    /// A single NDJSON bulk file
    Bulk { path: PathBuf, index: String },
}

/// Everything needed to build a page pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub extractor: ExtractorKind,
    #[serde(default)]
    pub ner: ExtractorConfig,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Fail pages whose span sidecar is missing instead of indexing them empty.
    #[serde(default)]
    pub strict_spans: bool,
    /// Also run the built-in date rules alongside the chosen extractor.
    #[serde(default)]
    pub date_rules: bool,
}

const fn default_jobs() -> usize {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorKind::default(),
            ner: ExtractorConfig::default(),
            output: OutputFormat::default(),
            jobs: default_jobs(),
            strict_spans: false,
            date_rules: false,
        }
    }
}
