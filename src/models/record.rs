//! Extracted paper metadata.

use serde::{Deserialize, Serialize};

/// Placeholder for single-valued fields missing from a metadata table.
pub const NOT_AVAILABLE: &str = "N/A";

/// Metadata fields recognized in an item's full-view table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Title,
    Year,
    Doi,
    Author,
    Abstract,
}

impl MetadataField {
    /// Map a Dublin Core label from the metadata table to a field.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "dc.title" => Some(Self::Title),
            "dc.date.issued" => Some(Self::Year),
            "dc.identifier.doi" => Some(Self::Doi),
            "dc.contributor.author" => Some(Self::Author),
            "dc.description.abstract" => Some(Self::Abstract),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "dc.title",
            Self::Year => "dc.date.issued",
            Self::Doi => "dc.identifier.doi",
            Self::Author => "dc.contributor.author",
            Self::Abstract => "dc.description.abstract",
        }
    }
}

/// Metadata of one paper. Field order matches the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub year: String,
    pub doi: String,
    pub r#abstract: String,
    /// Authors in the order their rows appear.
    pub authors: Vec<String>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            title: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
            doi: NOT_AVAILABLE.to_string(),
            r#abstract: NOT_AVAILABLE.to_string(),
            authors: Vec::new(),
        }
    }
}

impl Record {
    /// Store a value for `field`. Authors accumulate; other fields take the
    /// last value seen.
    pub fn apply(&mut self, field: MetadataField, value: String) {
        match field {
            MetadataField::Title => self.title = value,
            MetadataField::Year => self.year = value,
            MetadataField::Doi => self.doi = value,
            MetadataField::Author => self.authors.push(value),
            MetadataField::Abstract => self.r#abstract = value,
        }
    }

    /// Store a labeled table row; returns false when the label is not tracked.
    pub fn apply_row(&mut self, label: &str, value: &str) -> bool {
        match MetadataField::from_label(label.trim()) {
            Some(field) => {
                self.apply(field, value.trim().to_string());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let record = Record::default();
        assert_eq!(record.title, "N/A");
        assert_eq!(record.year, "N/A");
        assert_eq!(record.doi, "N/A");
        assert_eq!(record.r#abstract, "N/A");
        assert!(record.authors.is_empty());
    }

    #[test]
    fn test_label_roundtrip() {
        for field in [
            MetadataField::Title,
            MetadataField::Year,
            MetadataField::Doi,
            MetadataField::Author,
            MetadataField::Abstract,
        ] {
            assert_eq!(MetadataField::from_label(field.label()), Some(field));
        }
        assert_eq!(MetadataField::from_label("dc.subject"), None);
        assert_eq!(MetadataField::from_label("DC.TITLE"), None);
    }

    #[test]
    fn test_apply_row() {
        let mut record = Record::default();
        assert!(record.apply_row(" dc.contributor.author ", " Silva, Ana "));
        assert!(record.apply_row("dc.contributor.author", "Costa, Rui"));
        assert!(record.apply_row("dc.date.issued", "2019"));
        assert!(record.apply_row("dc.date.issued", "2020"));
        assert!(!record.apply_row("dc.language.iso", "eng"));

        assert_eq!(record.authors, vec!["Silva, Ana", "Costa, Rui"]);
        assert_eq!(record.year, "2020");
        assert_eq!(record.title, "N/A");
    }

    #[test]
    fn test_serialized_key_order() {
        let record = Record {
            title: "T".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"title":"T","year":"N/A","doi":"N/A","abstract":"N/A","authors":[]}"#
        );
    }
}
