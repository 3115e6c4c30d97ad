//! Verb records

use super::{normalize_name, parse_bool, Category, FieldReader, GrammarFeature, RawRow, RecordFields};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbRecord {
    pub verb: String,
    pub english: String,
    pub present_ich: String,
    pub present_du: String,
    pub present_er: String,
    pub perfect: String,
    pub example: String,
    /// Raw flag text as supplied (`ja`, `true`, `1`, ...)
    pub separable: String,
    pub is_separable: bool,
}

impl VerbRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "verb",
        "english",
        "present_ich",
        "present_du",
        "present_er",
        "perfect",
        "example",
        "separable",
    ];

    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(row, Self::COLUMNS);

        let verb = reader.required("verb")?;
        let english = reader.required("english")?;
        let present_ich = reader.required("present_ich")?;
        let present_du = reader.required("present_du")?;
        let present_er = reader.required("present_er")?;
        let perfect = reader.required("perfect")?;
        let example = reader.required("example")?;
        let separable = reader.required("separable")?;
        let is_separable = parse_bool("separable", &separable)?;

        Ok(Self {
            verb,
            english,
            present_ich,
            present_du,
            present_er,
            perfect,
            example,
            separable,
            is_separable,
        })
    }
}

impl RecordFields for VerbRecord {
    fn category(&self) -> Category {
        Category::Verb
    }

    fn grammar(&self) -> Option<GrammarFeature> {
        Some(GrammarFeature::Separable(self.is_separable))
    }

    fn headword(&self) -> &str {
        &self.verb
    }

    fn english(&self) -> &str {
        &self.english
    }

    fn attribute(&self, key: &str) -> Option<Option<&str>> {
        let value = match normalize_name(key).as_str() {
            "verb" => &self.verb,
            "english" => &self.english,
            "presentich" => &self.present_ich,
            "presentdu" => &self.present_du,
            "presenter" => &self.present_er,
            "perfect" => &self.perfect,
            "example" => &self.example,
            "separable" => &self.separable,
            _ => return None,
        };
        Some(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verb_row(separable: &str) -> RawRow {
        RawRow::positional([
            "aufstehen",
            "to get up",
            "stehe auf",
            "stehst auf",
            "steht auf",
            "ist aufgestanden",
            "Ich stehe um sieben Uhr auf.",
            separable,
        ])
    }

    #[test]
    fn test_separable_flag_coercion() {
        let record = VerbRecord::from_row(&verb_row("Ja")).unwrap();
        assert!(record.is_separable);
        assert_eq!(record.separable, "Ja");

        let record = VerbRecord::from_row(&verb_row("false")).unwrap();
        assert!(!record.is_separable);
    }

    #[test]
    fn test_non_boolean_flag_rejected() {
        let err = VerbRecord::from_row(&verb_row("sometimes")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidEnum { field: "separable", .. }
        ));
    }

    #[test]
    fn test_missing_separable_column() {
        let row = RawRow::positional([
            "arbeiten",
            "to work",
            "arbeite",
            "arbeitest",
            "arbeitet",
            "hat gearbeitet",
            "Ich arbeite heute.",
        ]);
        assert_eq!(
            VerbRecord::from_row(&row).unwrap_err(),
            ValidationError::MissingField { field: "separable" }
        );
    }

    #[test]
    fn test_attribute_names_normalized() {
        let record = VerbRecord::from_row(&verb_row("1")).unwrap();
        assert_eq!(record.attribute("PresentEr"), Some(Some("steht auf")));
        assert_eq!(record.attribute("present_du"), Some(Some("stehst auf")));
        assert_eq!(record.attribute("plural"), None);
    }
}
