//! Page files on disk: naming convention and tree discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::pipeline::{IngestError, IngestResult};
use crate::record::PageId;

/// Suffix appended to a page file name for its record.
pub const RECORD_SUFFIX: &str = ".record";

/// `<doc>.pdf_page<N>.pdf.txt`, where `<doc>` contains no dot.
static PAGE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^.]+)\.pdf_page([0-9]+)\.pdf\.txt$").expect("page file pattern compiles")
});

/// Extracts the page identity from a page file name.
pub fn parse_page_name(file_name: &str) -> Option<PageId> {
    let caps = PAGE_FILE.captures(file_name)?;
    Some(PageId::new(&caps[1], &caps[2]))
}

/// A page text file found under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub id: PageId,
    pub source: PathBuf,
    /// Directory of the page relative to the input root.
    pub relative_dir: PathBuf,
    pub file_name: String,
}

impl PageFile {
    pub fn from_path(root: &Path, source: &Path) -> IngestResult<Self> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| IngestError::InvalidPageName(source.display().to_string()))?
            .to_string();

        let id = parse_page_name(&file_name)
            .ok_or_else(|| IngestError::InvalidPageName(file_name.clone()))?;

        let relative_dir = source
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            id,
            source: source.to_path_buf(),
            relative_dir,
            file_name,
        })
    }

    /// Where this page's record lands under `out_root`.
    pub fn record_path(&self, out_root: &Path) -> PathBuf {
        out_root
            .join(&self.relative_dir)
            .join(format!("{}{RECORD_SUFFIX}", self.file_name))
    }
}

/// Everything found under an input root.
#[derive(Debug, Clone, Default)]
pub struct PageTree {
    pub root: PathBuf,
    /// Subdirectories relative to the root, parents before children.
    pub dirs: Vec<PathBuf>,
    pub pages: Vec<PageFile>,
}

impl PageTree {
    /// Walks `root` recursively. Files that do not follow the page naming
    /// convention are skipped.
    pub fn discover(root: &Path) -> IngestResult<Self> {
        let mut tree = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };
        tree.walk(root)?;
        tree.pages.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(tree)
    }

    fn walk(&mut self, dir: &Path) -> IngestResult<()> {
        let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(fs::DirEntry::path);

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                if let Ok(rel) = path.strip_prefix(&self.root) {
                    self.dirs.push(rel.to_path_buf());
                }
                self.walk(&path)?;
            } else if file_type.is_file() {
                match PageFile::from_path(&self.root, &path) {
                    Ok(page) => self.pages.push(page),
                    Err(_) => tracing::trace!(path = %path.display(), "skipping non-page file"),
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
