use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Replacement for each newline in the page body.
pub const NEWLINE_REPLACEMENT: &str = "    ";

/// Identity of one page of one source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId {
    pub orig_file: String,
    pub page: String,
}

impl PageId {
    #[must_use]
    pub fn new(orig_file: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            orig_file: orig_file.into(),
            page: page.into(),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} page {}", self.orig_file, self.page)
    }
}

/// Structured output for a single page, ready for the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub orig_file: String,
    pub page: String,
    pub people: BTreeSet<String>,
    pub dates: BTreeSet<String>,
    pub places: BTreeSet<String>,
    pub orgs: BTreeSet<String>,
    pub groups: BTreeSet<String>,
    #[serde(rename = "txt")]
    pub text: String,
}

impl PageRecord {
    pub fn entity_count(&self) -> usize {
        self.people.len() + self.places.len() + self.orgs.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0 && self.dates.is_empty()
    }
}

/// Category collections accumulated while walking a page's spans.
#[derive(Debug, Default)]
pub struct PageRecordBuilder {
    people: BTreeSet<String>,
    dates: BTreeSet<String>,
    places: BTreeSet<String>,
    orgs: BTreeSet<String>,
    groups: BTreeSet<String>,
}

impl PageRecordBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person(&mut self, text: &str) {
        self.people.insert(text.to_string());
    }

    pub fn place(&mut self, text: &str) {
        self.places.insert(text.to_string());
    }

    pub fn org(&mut self, text: &str) {
        self.orgs.insert(text.to_string());
    }

    pub fn group(&mut self, text: &str) {
        self.groups.insert(text.to_string());
    }

    pub fn dates(&mut self, dates: impl IntoIterator<Item = String>) {
        self.dates.extend(dates);
    }

    #[must_use]
    pub fn build(self, page: &PageId, body: &str) -> PageRecord {
        PageRecord {
            orig_file: page.orig_file.clone(),
            page: page.page.clone(),
            people: self.people,
            dates: self.dates,
            places: self.places,
            orgs: self.orgs,
            groups: self.groups,
            text: sanitize_text(body),
        }
    }
}

/// Makes a page body safe for single-line consumption: double quotes become
/// single quotes and every newline becomes [`NEWLINE_REPLACEMENT`].
pub fn sanitize_text(body: &str) -> String {
    body.replace('"', "'").replace('\n', NEWLINE_REPLACEMENT)
}
