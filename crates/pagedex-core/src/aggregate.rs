use crate::dates::DateNormalizer;
use crate::record::{PageId, PageRecord, PageRecordBuilder};
use crate::span::{EntityLabel, EntitySpan};

/// Folds a page's entity spans into a deduplicated [`PageRecord`].
///
/// Pure apart from the date reporter: no I/O, no state carried between pages.
#[derive(Default)]
pub struct EntityAggregator {
    normalizer: DateNormalizer,
}

impl EntityAggregator {
    #[must_use]
    pub fn new(normalizer: DateNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn aggregate(&self, page: &PageId, text: &str, spans: &[EntitySpan]) -> PageRecord {
        let mut builder = PageRecordBuilder::new();

        for span in spans {
            match &span.label {
                EntityLabel::Place => builder.place(&span.text),
                EntityLabel::Person => builder.person(&span.text),
                EntityLabel::Org => builder.org(&span.text),
                EntityLabel::Group => builder.group(&span.text),
                EntityLabel::Date => {
                    let mention = clean_date_mention(&span.text);
                    if let Some(dates) = self.normalizer.normalize(&mention, page) {
                        builder.dates(dates);
                    }
                }
                EntityLabel::Other(_) => {}
            }
        }

        builder.build(page, text)
    }
}

/// Strips surrounding whitespace and commas, then drops embedded newlines.
pub fn clean_date_mention(text: &str) -> String {
    text.trim_matches(|c| matches!(c, '\r' | '\n' | ' ' | '\t' | ','))
        .replace('\n', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::RecordingReporter;

    fn span(text: &str, label: &str) -> EntitySpan {
        EntitySpan::new(text, EntityLabel::parse(label))
    }

    fn page() -> PageId {
        PageId::new("report", "12")
    }

    #[test]
    fn test_routes_by_label() {
        let aggregator = EntityAggregator::default();
        let spans = vec![
            span("Berlin", "GPE"),
            span("the Alps", "LOC"),
            span("Grace Hopper", "PERSON"),
            span("Navy", "ORG"),
            span("Americans", "NORP"),
            span("$5", "MONEY"),
            span("10/19/99", "DATE"),
        ];

        let record = aggregator.aggregate(&page(), "body", &spans);

        assert_eq!(record.orig_file, "report");
        assert_eq!(record.page, "12");
        assert!(record.places.contains("Berlin"));
        assert!(record.places.contains("the Alps"));
        assert!(record.people.contains("Grace Hopper"));
        assert!(record.orgs.contains("Navy"));
        assert!(record.groups.contains("Americans"));
        assert_eq!(record.dates.iter().collect::<Vec<_>>(), vec!["1999-10-19"]);
        assert_eq!(record.entity_count(), 5);
    }

    #[test]
    fn test_date_mentions_cleaned_before_normalizing() {
        let aggregator = EntityAggregator::default();
        let spans = vec![
            span(" ,Oct 2019,\n", "DATE"),
            span("October\n 15, 2019", "DATE"),
        ];

        let record = aggregator.aggregate(&page(), "", &spans);

        assert!(record.dates.contains("2019-10-01"));
        assert!(record.dates.contains("2019-10-15"));
    }

    #[test]
    fn test_duplicate_dates_collapse() {
        let aggregator = EntityAggregator::default();
        let spans = vec![
            span("2020-01-02", "DATE"),
            span("1/2/2020 and 1/2/20", "DATE"),
            span("Jan 2, 2020", "DATE"),
        ];

        let record = aggregator.aggregate(&page(), "", &spans);

        assert_eq!(record.dates.len(), 1);
        assert!(record.dates.contains("2020-01-02"));
    }

    #[test]
    fn test_unparseable_dates_dropped_and_reported() {
        let reporter = RecordingReporter::new();
        let aggregator =
            EntityAggregator::new(DateNormalizer::new(Box::new(reporter.clone())));
        let spans = vec![span("the 90s", "DATE"), span("Friday", "DATE")];

        let record = aggregator.aggregate(&page(), "", &spans);

        assert!(record.dates.is_empty());
        assert_eq!(reporter.raw_texts(), vec!["the 90s".to_string()]);
        assert_eq!(reporter.reports()[0].0, page());
    }

    #[test]
    fn test_empty_page() {
        let aggregator = EntityAggregator::default();
        let record = aggregator.aggregate(&page(), "line one\n\"quoted\"", &[]);

        assert!(record.is_empty());
        assert_eq!(record.text, "line one    'quoted'");
    }

    #[test]
    fn test_order_insensitive_and_idempotent() {
        let aggregator = EntityAggregator::default();
        let spans = vec![
            span("Lisbon", "GPE"),
            span("Pessoa", "PERSON"),
            span("Lisbon", "GPE"),
            span("Orpheu", "ORG"),
            span("Portuguese", "NORP"),
            span("Pessoa", "PERSON"),
        ];
        let mut reversed = spans.clone();
        reversed.reverse();

        let forward = aggregator.aggregate(&page(), "", &spans);
        let backward = aggregator.aggregate(&page(), "", &reversed);
        assert_eq!(forward, backward);

        let mut deduplicated = Vec::new();
        for s in &spans {
            if !deduplicated.contains(s) {
                deduplicated.push(s.clone());
            }
        }
        let first = aggregator.aggregate(&page(), "", &deduplicated);
        let again = aggregator.aggregate(&page(), "", &deduplicated);
        assert_eq!(first, forward);
        assert_eq!(first, again);
    }
}
