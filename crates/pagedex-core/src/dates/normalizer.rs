use std::sync::LazyLock;

use regex::Regex;

use super::format::DateFormat;
use super::reporter::{DateReporter, TracingReporter};
use super::DateError;
use crate::record::PageId;

/// Canonical output format.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Formats tried in order; the first one matching the whole mention wins.
/// Several are ambiguous subsets of later ones, so the order matters.
pub const SUPPORTED_DATE_FORMATS: &[&str] = &[
    "%a, %d %b %Y",               // Tue, 20 Oct 2020
    "%a, %b %d, %Y",              // Tue, Oct 20, 2020
    "%d %b %Y",                   // 20 Oct 2020
    "%a, %d %b %Y %H:%M:%S %z",   // Tue, 20 Oct 2020 13:44:57 +0000
    "%Y-%m-%d",                   // 2020-10-23
    "%m/%d/%Y",                   // 08/21/2024
    "%m/%d/%y",                   // 10/19/99
    "%m/%d/%Y at %I:%M %p",       // 08/21/2024 at 1:12 PM
    "%b %d, %Y, at %I:%M %p",     // Apr 19, 2023, at 3:46 PM
    "%b %d, %Y",                  // Apr 19, 2023
    "%b %d %Y",                   // Apr 19 2023
    "%Y/%m/%d %H:%M:%S",          // 2020/05/01 00:00:00
    "%A, %B %d, %Y %I:%M %p",     // Monday, October 19, 2020 3:14 PM
    "%A, %B %d, %Y",              // Monday, October 19, 2020
    "%A %B %d, %Y",               // Monday October 19, 2020
    "%B %d, %Y",                  // October 15, 2019
    "%B %d %Y",                   // October 15 2019
    "%B %Y",                      // October 2019
    "%b %Y",                      // Oct 2019
    "%Y",                         // 2023
];

static FORMATS: LazyLock<Vec<DateFormat>> = LazyLock::new(|| {
    SUPPORTED_DATE_FORMATS
        .iter()
        .map(|p| DateFormat::new(p).expect("built-in date format compiles"))
        .collect()
});

static EMBEDDED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})")
        .expect("embedded date pattern compiles")
});

static EMBEDDED_SHORT_YEAR: LazyLock<DateFormat> =
    LazyLock::new(|| DateFormat::new("%m/%d/%y").expect("built-in date format compiles"));

static EMBEDDED_LONG_YEAR: LazyLock<DateFormat> =
    LazyLock::new(|| DateFormat::new("%m/%d/%Y").expect("built-in date format compiles"));

/// Turns free-text date mentions into ISO-8601 dates.
pub struct DateNormalizer {
    reporter: Box<dyn DateReporter>,
}

impl DateNormalizer {
    #[must_use]
    pub fn new(reporter: Box<dyn DateReporter>) -> Self {
        Self { reporter }
    }

    /// Normalizes one mention found on `page`.
    ///
    /// Returns `None` when the mention is not a recognizable date. Mentions
    /// made only of words (a bare weekday or month name) are dropped silently;
    /// anything else that fails is sent to the reporter.
    pub fn normalize(&self, text: &str, page: &PageId) -> Option<Vec<String>> {
        if is_word_only(text) {
            return None;
        }

        if let Some(date) = FORMATS.iter().find_map(|f| f.parse(text)) {
            return Some(vec![date.format(ISO_FORMAT).to_string()]);
        }

        let mut found = false;
        let mut dates = Vec::new();
        for caps in EMBEDDED_DATE.captures_iter(text) {
            found = true;
            let (month, day, year) = (&caps[1], &caps[2], &caps[3]);
            let candidate = format!("{month}/{day}/{year}");
            let format = if year.len() == 2 {
                &*EMBEDDED_SHORT_YEAR
            } else {
                &*EMBEDDED_LONG_YEAR
            };

            match format.parse_strict(&candidate) {
                Ok(date) => dates.push(date.format(ISO_FORMAT).to_string()),
                Err(e) => self.reporter.report(page, &e),
            }
        }

        if !found {
            self.reporter
                .report(page, &DateError::UnrecognizedDateFormat(text.to_string()));
        }

        (!dates.is_empty()).then_some(dates)
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new(Box::new(TracingReporter))
    }
}

fn is_word_only(text: &str) -> bool {
    text.split_whitespace()
        .all(|token| token.chars().all(char::is_alphabetic))
}
