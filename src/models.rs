//! Data models for scraped articles and their parsed abstracts.
//!
//! - [`ArticleRecord`]: metadata for one entry of a topic listing page
//! - [`AbstractRecord`]: label/value pairs split out of an article's abstract
//!
//! Both serialize to the exact JSON shape written to `articles.json` and
//! `abstracts.json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One article as it appears on a topic listing page.
///
/// The field names match the keys in `articles.json`. `url_id` is kept as a
/// single-element array so existing consumers of the file keep working.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The trimmed article title.
    pub heading: String,
    /// Text of the `rel="category tag"` links in the article footer.
    pub topic: Vec<String>,
    /// Text of the `rel="tag"` links in the article footer.
    pub categories: Vec<String>,
    /// Text of every `.author-trigger` element in the author section.
    pub authors: Vec<String>,
    /// Trailing path segment of the article link, wrapped in a one-element array.
    pub url_id: Vec<String>,
}

impl ArticleRecord {
    /// The article identifier, i.e. the only element of `url_id`.
    pub fn identifier(&self) -> Option<&str> {
        self.url_id.first().map(String::as_str)
    }
}

/// Label/value pairs parsed from an abstract.
///
/// Serializes as a flat JSON object. Insertion order is preserved, so the
/// `"key"` entry always comes first when present. An empty record means the
/// detail page or its abstract section could not be found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AbstractRecord {
    fields: Map<String, Value>,
}

impl AbstractRecord {
    /// Name of the entry holding the source article identifier.
    pub const KEY: &'static str = "key";
    /// Name of the entry recording an isolated parse failure.
    pub const PARSE_ERROR: &'static str = "parse_error";

    /// A record holding only the `"key"` entry.
    pub fn for_identifier(identifier: &str) -> Self {
        let mut record = Self::default();
        record.insert(Self::KEY, identifier);
        record
    }

    /// Insert a field. An existing label is overwritten in place.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(label.into(), Value::String(value.into()));
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).and_then(Value::as_str)
    }

    /// The identifier stored under `"key"`, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.get(Self::KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> ArticleRecord {
        ArticleRecord {
            heading: "Outcomes of CAR-T therapy".to_string(),
            topic: vec!["Haematological Oncology".to_string()],
            categories: vec!["lymphoma".to_string(), "CAR-T".to_string()],
            authors: vec!["A. Rossi".to_string(), "B. Chen".to_string()],
            url_id: vec!["1852".to_string()],
        }
    }

    #[test]
    fn test_article_serializes_with_expected_field_names() {
        let json = serde_json::to_value(sample_article()).unwrap();
        let object = json.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, ["heading", "topic", "categories", "authors", "url_id"]);
        assert_eq!(json["url_id"], serde_json::json!(["1852"]));
    }

    #[test]
    fn test_article_identifier() {
        assert_eq!(sample_article().identifier(), Some("1852"));
        let mut article = sample_article();
        article.url_id.clear();
        assert_eq!(article.identifier(), None);
    }

    #[test]
    fn test_article_sequence_round_trip() {
        let articles = vec![sample_article(), sample_article()];
        let json = serde_json::to_string(&articles).unwrap();
        let back: Vec<ArticleRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, articles);
    }

    #[test]
    fn test_abstract_record_keeps_insertion_order() {
        let mut record = AbstractRecord::for_identifier("9999");
        record.insert("Objective", "x");
        record.insert("Background", "y");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"key":"9999","Objective":"x","Background":"y"}"#);
    }

    #[test]
    fn test_abstract_record_last_write_wins() {
        let mut record = AbstractRecord::for_identifier("1");
        record.insert("Results", "first");
        record.insert("Results", "second");
        assert_eq!(record.get("Results"), Some("second"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_empty_abstract_record_is_empty_object() {
        let record = AbstractRecord::default();
        assert!(record.is_empty());
        assert_eq!(record.identifier(), None);
        assert_eq!(serde_json::to_string(&record).unwrap(), "{}");
    }

    #[test]
    fn test_abstract_sequence_round_trip() {
        let mut parsed = AbstractRecord::for_identifier("2157");
        parsed.insert("Methods", "Retrospective cohort");
        let records = vec![parsed, AbstractRecord::default()];
        let json = serde_json::to_string(&records).unwrap();
        let back: Vec<AbstractRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);
        assert_eq!(back[0].labels().collect::<Vec<_>>(), ["key", "Methods"]);
    }
}
