//! Strftime-style date formats compiled into anchored regexes.
//!
//! Each directive becomes a named capture group. A format matches only when
//! it covers the entire input, and the captured fields must then form a real
//! calendar date.

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::DateError;

const WEEKDAYS_SHORT: &str = "mon|tue|wed|thu|fri|sat|sun";
const WEEKDAYS_FULL: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const MONTHS_SHORT: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const MONTHS_FULL: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Two-digit years below this value land in the 2000s, the rest in the 1900s.
pub const CENTURY_PIVOT: u32 = 69;

/// Expands a two-digit year using [`CENTURY_PIVOT`].
pub const fn expand_short_year(year: u32) -> i32 {
    if year < CENTURY_PIVOT {
        2000 + year as i32
    } else {
        1900 + year as i32
    }
}

/// One date format, e.g. `%a, %d %b %Y`.
#[derive(Debug, Clone)]
pub struct DateFormat {
    regex: Regex,
}

impl DateFormat {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&compile(pattern))?;
        Ok(Self { regex })
    }

    /// Parses `text` as a whole. `None` when the shape does not match or the
    /// fields do not make a valid date.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.regex.captures(text)?;
        resolve(&caps)
    }

    /// Like [`parse`](Self::parse), reporting a shape match whose fields fail
    /// calendar validation as [`DateError::MalformedEmbeddedDate`].
    pub fn parse_strict(&self, text: &str) -> Result<NaiveDate, DateError> {
        self.parse(text)
            .ok_or_else(|| DateError::MalformedEmbeddedDate(text.to_string()))
    }
}

fn directive(c: char) -> Option<String> {
    let fragment = match c {
        'a' => format!("(?P<a>{WEEKDAYS_SHORT})"),
        'A' => format!("(?P<A>{WEEKDAYS_FULL})"),
        'b' => format!("(?P<b>{})", MONTHS_SHORT.join("|")),
        'B' => format!("(?P<B>{})", MONTHS_FULL.join("|")),
        'd' => r"(?P<d>3[01]|[12][0-9]|0[1-9]|[1-9]| [1-9])".to_string(),
        'm' => r"(?P<m>1[0-2]|0[1-9]|[1-9])".to_string(),
        'Y' => r"(?P<Y>[0-9]{4})".to_string(),
        'y' => r"(?P<y>[0-9]{2})".to_string(),
        'H' => r"(?P<H>2[0-3]|[01][0-9]|[0-9])".to_string(),
        'I' => r"(?P<I>1[0-2]|0[1-9]|[1-9])".to_string(),
        'M' => r"(?P<M>[0-5][0-9]|[0-9])".to_string(),
        'S' => r"(?P<S>6[01]|[0-5][0-9]|[0-9])".to_string(),
        'p' => "(?P<p>am|pm)".to_string(),
        'z' => r"(?P<z>[+-][0-9]{2}:?[0-5][0-9](?::?[0-5][0-9])?|(?-i:Z))".to_string(),
        _ => return None,
    };
    Some(fragment)
}

/// Translates a strftime pattern into an anchored, case-insensitive regex.
/// Runs of whitespace in the pattern match any run of whitespace.
fn compile(pattern: &str) -> String {
    let mut out = String::from("(?i)^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(next) = chars.next() {
                match directive(next) {
                    Some(fragment) => out.push_str(&fragment),
                    None => out.push_str(&regex::escape(&next.to_string())),
                }
            }
        } else if c.is_whitespace() {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            out.push_str(r"\s+");
        } else {
            out.push_str(&regex::escape(&c.to_string()));
        }
    }

    out.push('$');
    out
}

fn field(caps: &Captures, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().trim().parse().ok()
}

fn month_index(names: &[&str; 12], name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    names
        .iter()
        .position(|m| *m == name)
        .and_then(|i| u32::try_from(i + 1).ok())
}

fn resolve(caps: &Captures) -> Option<NaiveDate> {
    let year = match (field(caps, "Y"), field(caps, "y")) {
        (Some(y), _) => i32::try_from(y).ok()?,
        (None, Some(y)) => expand_short_year(y),
        (None, None) => 1900,
    };
    if year < 1 {
        return None;
    }

    let month = if let Some(m) = field(caps, "m") {
        m
    } else if let Some(b) = caps.name("b") {
        month_index(&MONTHS_SHORT, b.as_str())?
    } else if let Some(b) = caps.name("B") {
        month_index(&MONTHS_FULL, b.as_str())?
    } else {
        1
    };

    let day = field(caps, "d").unwrap_or(1);

    NaiveDate::from_ymd_opt(year, month, day)
}
