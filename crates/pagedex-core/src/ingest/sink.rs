use std::path::{Path, PathBuf};

use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::layout::{PageFile, PageTree};
use super::pipeline::IngestResult;
use crate::record::PageRecord;

/// Default bulk index name.
pub const DEFAULT_INDEX: &str = "pages";

/// Destination for finished page records.
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    /// Called once with the discovered tree before any record is written.
    async fn prepare(&self, _tree: &PageTree) -> IngestResult<()> {
        Ok(())
    }

    async fn write(&self, page: &PageFile, record: &PageRecord) -> IngestResult<()>;

    async fn finish(&self) -> IngestResult<()> {
        Ok(())
    }
}

/// One `<page file>.record` JSON file per page, in a tree mirroring the input.
pub struct RecordFileSink {
    out_root: PathBuf,
}

impl RecordFileSink {
    #[must_use]
    pub fn new(out_root: impl Into<PathBuf>) -> Self {
        Self {
            out_root: out_root.into(),
        }
    }
}

#[async_trait::async_trait]
impl RecordSink for RecordFileSink {
    async fn prepare(&self, tree: &PageTree) -> IngestResult<()> {
        tokio::fs::create_dir_all(&self.out_root).await?;
        for dir in &tree.dirs {
            tokio::fs::create_dir_all(self.out_root.join(dir)).await?;
        }
        Ok(())
    }

    async fn write(&self, page: &PageFile, record: &PageRecord) -> IngestResult<()> {
        let path = page.record_path(&self.out_root);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, serde_json::to_vec(record)?).await?;
        Ok(())
    }
}

/// Appends every record to a single NDJSON file in bulk-index form: an
/// `index` action line keyed by the page file name, then the record itself.
pub struct BulkSink {
    index: String,
    file: Mutex<tokio::fs::File>,
}

impl BulkSink {
    pub async fn create(path: &Path, index: impl Into<String>) -> IngestResult<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::File::create(path).await?;
        Ok(Self {
            index: index.into(),
            file: Mutex::new(file),
        })
    }

    fn entry(&self, page: &PageFile, record: &PageRecord) -> IngestResult<String> {
        let action = json!({ "index": { "_index": self.index, "_id": page.file_name } });
        Ok(format!(
            "{}\n{}\n",
            serde_json::to_string(&action)?,
            serde_json::to_string(record)?
        ))
    }
}

#[async_trait::async_trait]
impl RecordSink for BulkSink {
    async fn write(&self, page: &PageFile, record: &PageRecord) -> IngestResult<()> {
        let entry = self.entry(page, record)?;
        let mut file = self.file.lock().await;
        file.write_all(entry.as_bytes()).await?;
        Ok(())
    }

    async fn finish(&self) -> IngestResult<()> {
        self.file.lock().await.flush().await?;
        Ok(())
    }
}
