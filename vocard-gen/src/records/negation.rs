//! Negation records (nicht, kein, nie, ...)

use super::{normalize_name, parse_enum, Category, FieldReader, RawRow, RecordFields};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegationType {
    General,
    Article,
    Pronoun,
    Adverb,
    Conjunction,
}

const NEGATION_TYPE_LABELS: &[&str] = &["general", "article", "pronoun", "adverb", "conjunction"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegationRecord {
    pub word: String,
    pub english: String,
    pub negation_type: String,
    pub kind: NegationType,
    pub example: String,
}

impl NegationRecord {
    pub const COLUMNS: &'static [&'static str] = &["word", "english", "type", "example"];

    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        const TABLE: &[(&str, NegationType)] = &[
            ("general", NegationType::General),
            ("article", NegationType::Article),
            ("pronoun", NegationType::Pronoun),
            ("adverb", NegationType::Adverb),
            ("conjunction", NegationType::Conjunction),
        ];

        let reader = FieldReader::new(row, Self::COLUMNS);

        let word = reader.required("word")?;
        let english = reader.required("english")?;
        let negation_type = reader.required("type")?;
        let kind = parse_enum("type", &negation_type, TABLE, NEGATION_TYPE_LABELS)?;
        let example = reader.required("example")?;

        Ok(Self {
            word,
            english,
            negation_type,
            kind,
            example,
        })
    }
}

impl RecordFields for NegationRecord {
    fn category(&self) -> Category {
        Category::Negation
    }

    fn headword(&self) -> &str {
        &self.word
    }

    fn english(&self) -> &str {
        &self.english
    }

    fn attribute(&self, key: &str) -> Option<Option<&str>> {
        let value = match normalize_name(key).as_str() {
            "word" => &self.word,
            "english" => &self.english,
            "type" => &self.negation_type,
            "example" => &self.example,
            _ => return None,
        };
        Some(Some(value))
    }
}
