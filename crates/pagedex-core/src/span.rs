use std::fmt;

use serde::{Deserialize, Serialize};

/// Category label carried by an entity span.
///
/// Extractor backends speak in their own tag sets; the aggregator only cares
/// which of the five record categories a tag belongs to. Unknown tags are kept
/// as `Other` so they round-trip but are never routed anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Place,
    Person,
    Date,
    Org,
    Group,
    Other(String),
}

impl EntityLabel {
    /// Maps an extractor tag onto a label. Accepts both the five canonical
    /// names and the usual NER tags (`GPE`, `LOC`, `NORP`).
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "PLACE" | "GPE" | "LOC" => Self::Place,
            "PERSON" => Self::Person,
            "DATE" => Self::Date,
            "ORG" => Self::Org,
            "GROUP" | "NORP" => Self::Group,
            _ => Self::Other(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Place => "PLACE",
            Self::Person => "PERSON",
            Self::Date => "DATE",
            Self::Org => "ORG",
            Self::Group => "GROUP",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized mention inside page text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
}

impl EntitySpan {
    #[must_use]
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ner_tags_map_to_categories() {
        assert_eq!(EntityLabel::parse("GPE"), EntityLabel::Place);
        assert_eq!(EntityLabel::parse("loc"), EntityLabel::Place);
        assert_eq!(EntityLabel::parse("NORP"), EntityLabel::Group);
        assert_eq!(EntityLabel::parse("PERSON"), EntityLabel::Person);
        assert_eq!(
            EntityLabel::parse("MONEY"),
            EntityLabel::Other("MONEY".into())
        );
    }

    #[test]
    fn test_span_deserializes_from_tag_string() {
        let span: EntitySpan =
            serde_json::from_str(r#"{"text": "Paris", "label": "GPE"}"#).unwrap();
        assert_eq!(span, EntitySpan::new("Paris", EntityLabel::Place));

        let json = serde_json::to_string(&span).unwrap();
        assert!(json.contains(r#""label":"PLACE""#));
    }
}
