//! Typed field tree returned by document field extraction

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single node of an extracted document.
///
/// Extraction services report each value together with its type. The tree is
/// closed over three shapes: plain text, ordered lists and nested records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ExtractedField {
    Scalar(String),
    List(Vec<ExtractedField>),
    Record(FieldRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    List,
    Record,
}

/// Named fields of one record, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRecord {
    fields: BTreeMap<String, ExtractedField>,
}

/// Everything an extraction call produced for one resume file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    #[serde(default)]
    pub documents: Vec<FieldRecord>,
}

impl ExtractedField {
    pub fn scalar(value: impl Into<String>) -> Self {
        ExtractedField::Scalar(value.into())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            ExtractedField::Scalar(_) => FieldKind::Scalar,
            ExtractedField::List(_) => FieldKind::List,
            ExtractedField::Record(_) => FieldKind::Record,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ExtractedField::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// True when the node carries no value at all: empty text, an empty list
    /// or a record without fields.
    pub fn is_empty(&self) -> bool {
        match self {
            ExtractedField::Scalar(value) => value.is_empty(),
            ExtractedField::List(items) => items.is_empty(),
            ExtractedField::Record(record) => record.is_empty(),
        }
    }
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, field: ExtractedField) -> Self {
        self.insert(key, field);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, field: ExtractedField) {
        self.fields.insert(key.into(), field);
    }

    pub fn get(&self, key: &str) -> Option<&ExtractedField> {
        self.fields.get(key)
    }

    /// First field whose key equals `key` ignoring ASCII case.
    pub fn get_ignore_case(&self, key: &str) -> Option<&ExtractedField> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, field)| field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractedField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ExtractedField)> for FieldRecord {
    fn from_iter<I: IntoIterator<Item = (K, ExtractedField)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar => write!(f, "scalar"),
            FieldKind::List => write!(f, "list"),
            FieldKind::Record => write!(f, "record"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "documents": [{
                "Name": {"kind": "scalar", "value": "Ada Lovelace"},
                "Experience": {"kind": "list", "value": [
                    {"kind": "record", "value": {"DATE": {"kind": "scalar", "value": "Jan 2020 - Mar 2021"}}}
                ]}
            }]
        }"#;

        let output: ExtractionOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.documents.len(), 1);

        let doc = &output.documents[0];
        assert_eq!(doc.get("Name").and_then(|f| f.as_scalar()), Some("Ada Lovelace"));

        match doc.get_ignore_case("experience") {
            Some(ExtractedField::List(items)) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].kind(), FieldKind::Record);
            }
            other => panic!("unexpected experience field: {:?}", other),
        }
    }

    #[test]
    fn test_emptiness() {
        assert!(ExtractedField::scalar("").is_empty());
        assert!(ExtractedField::List(Vec::new()).is_empty());
        assert!(ExtractedField::Record(FieldRecord::new()).is_empty());
        assert!(!ExtractedField::scalar("rust").is_empty());
    }

    #[test]
    fn test_case_insensitive_lookup_prefers_key_order() {
        let record = FieldRecord::new()
            .with("name", ExtractedField::scalar("lower"))
            .with("NAME", ExtractedField::scalar("upper"));

        // BTreeMap order puts "NAME" before "name"
        assert_eq!(
            record.get_ignore_case("Name").and_then(|f| f.as_scalar()),
            Some("upper")
        );
    }
}
