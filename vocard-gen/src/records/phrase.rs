//! Phrase records (fixed expressions, greetings)

use super::{normalize_name, Category, FieldReader, RawRow, RecordFields};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseRecord {
    pub phrase: String,
    pub english: String,
    pub context: Option<String>,
    pub related: Option<String>,
}

impl PhraseRecord {
    pub const COLUMNS: &'static [&'static str] = &["phrase", "english", "context", "related"];

    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(row, Self::COLUMNS);

        Ok(Self {
            phrase: reader.required("phrase")?,
            english: reader.required("english")?,
            context: reader.optional("context"),
            related: reader.optional("related"),
        })
    }
}

impl RecordFields for PhraseRecord {
    fn category(&self) -> Category {
        Category::Phrase
    }

    fn headword(&self) -> &str {
        &self.phrase
    }

    fn english(&self) -> &str {
        &self.english
    }

    fn attribute(&self, key: &str) -> Option<Option<&str>> {
        match normalize_name(key).as_str() {
            "phrase" => Some(Some(&self.phrase)),
            "english" => Some(Some(&self.english)),
            "context" => Some(self.context.as_deref()),
            "related" => Some(self.related.as_deref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_with_only_required_columns() {
        let record = PhraseRecord::from_row(&RawRow::positional(["Guten Morgen", "good morning"])).unwrap();
        assert_eq!(record.phrase, "Guten Morgen");
        assert!(record.context.is_none());
        assert!(record.related.is_none());
    }

    #[test]
    fn test_missing_english() {
        let err = PhraseRecord::from_row(&RawRow::keyed([("phrase", "Tschüss")])).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "english" });
    }
}
