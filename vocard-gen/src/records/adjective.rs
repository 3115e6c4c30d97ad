//! Adjective records

use super::{normalize_name, Category, FieldReader, RawRow, RecordFields};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjectiveRecord {
    pub word: String,
    pub english: String,
    pub example: String,
    pub comparative: Option<String>,
    pub superlative: Option<String>,
}

impl AdjectiveRecord {
    pub const COLUMNS: &'static [&'static str] =
        &["word", "english", "example", "comparative", "superlative"];

    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(row, Self::COLUMNS);

        Ok(Self {
            word: reader.required("word")?,
            english: reader.required("english")?,
            example: reader.required("example")?,
            comparative: reader.optional("comparative"),
            superlative: reader.optional("superlative"),
        })
    }
}

impl RecordFields for AdjectiveRecord {
    fn category(&self) -> Category {
        Category::Adjective
    }

    fn headword(&self) -> &str {
        &self.word
    }

    fn english(&self) -> &str {
        &self.english
    }

    fn attribute(&self, key: &str) -> Option<Option<&str>> {
        match normalize_name(key).as_str() {
            "word" => Some(Some(&self.word)),
            "english" => Some(Some(&self.english)),
            "example" => Some(Some(&self.example)),
            "comparative" => Some(self.comparative.as_deref()),
            "superlative" => Some(self.superlative.as_deref()),
            _ => None,
        }
    }
}
