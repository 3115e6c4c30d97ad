//! Adverb records

use super::{normalize_name, parse_enum, Category, FieldReader, RawRow, RecordFields};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdverbType {
    Time,
    Place,
    Manner,
    Degree,
    Frequency,
    Quantity,
    Intensity,
}

const ADVERB_TYPE_LABELS: &[&str] = &[
    "time",
    "place",
    "manner",
    "degree",
    "frequency",
    "quantity",
    "intensity",
];

impl AdverbType {
    fn parse(value: &str) -> Result<Self, ValidationError> {
        const TABLE: &[(&str, AdverbType)] = &[
            ("time", AdverbType::Time),
            ("place", AdverbType::Place),
            ("location", AdverbType::Place),
            ("manner", AdverbType::Manner),
            ("degree", AdverbType::Degree),
            ("frequency", AdverbType::Frequency),
            ("quantity", AdverbType::Quantity),
            ("intensity", AdverbType::Intensity),
        ];
        parse_enum("type", value, TABLE, ADVERB_TYPE_LABELS)
    }

    /// Abstract adverb types that never get an illustrative image
    pub fn is_abstract(self) -> bool {
        matches!(
            self,
            Self::Degree | Self::Frequency | Self::Quantity | Self::Intensity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdverbRecord {
    pub word: String,
    pub english: String,
    pub adverb_type: String,
    pub kind: AdverbType,
    pub example: String,
}

impl AdverbRecord {
    pub const COLUMNS: &'static [&'static str] = &["word", "english", "type", "example"];

    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(row, Self::COLUMNS);

        let word = reader.required("word")?;
        let english = reader.required("english")?;
        let adverb_type = reader.required("type")?;
        let kind = AdverbType::parse(&adverb_type)?;
        let example = reader.required("example")?;

        Ok(Self {
            word,
            english,
            adverb_type,
            kind,
            example,
        })
    }
}

impl RecordFields for AdverbRecord {
    fn category(&self) -> Category {
        Category::Adverb
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
            "type" => &self.adverb_type,
            "example" => &self.example,
            _ => return None,
        };
        Some(Some(value))
    }
}
