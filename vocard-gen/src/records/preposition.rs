//! Preposition records
//!
//! A preposition governs exactly one case. Two-way prepositions
//! (Wechselpräpositionen) are their own case label and must carry one example
//! per case.

use super::{normalize_name, parse_enum, Category, FieldReader, GrammarFeature, RawRow, RecordFields};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammaticalCase {
    Accusative,
    Dative,
    Genitive,
    TwoWay,
}

const CASE_LABELS: &[&str] = &["accusative", "dative", "genitive", "two-way"];

/// Separators that indicate more than one case was declared
const CASE_SEPARATORS: &[&str] = &["/", "+", ",", "&", ";", " and ", " und ", " or ", " oder "];

impl GrammaticalCase {
    /// Parse a case label (English or German, any capitalization)
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        const TABLE: &[(&str, GrammaticalCase)] = &[
            ("accusative", GrammaticalCase::Accusative),
            ("akkusativ", GrammaticalCase::Accusative),
            ("dative", GrammaticalCase::Dative),
            ("dativ", GrammaticalCase::Dative),
            ("genitive", GrammaticalCase::Genitive),
            ("genitiv", GrammaticalCase::Genitive),
            ("twoway", GrammaticalCase::TwoWay),
            ("wechsel", GrammaticalCase::TwoWay),
            ("wechselpräposition", GrammaticalCase::TwoWay),
        ];

        let lowered = value.to_lowercase();
        if CASE_SEPARATORS.iter().any(|sep| lowered.contains(sep)) {
            return Err(ValidationError::StructuralRuleViolation {
                field,
                rule: format!(
                    "'{}' declares more than one case; use exactly one of {}",
                    value,
                    CASE_LABELS.join(", ")
                ),
            });
        }

        parse_enum(field, value, TABLE, CASE_LABELS)
    }

    /// German grammar label shown on cards
    pub fn label(self) -> &'static str {
        match self {
            Self::Accusative => "Akkusativ",
            Self::Dative => "Dativ",
            Self::Genitive => "Genitiv",
            Self::TwoWay => "Wechselpräposition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepositionRecord {
    pub preposition: String,
    pub english: String,
    pub case: String,
    pub governed_case: GrammaticalCase,
    pub example1: String,
    pub example2: Option<String>,
}

impl PrepositionRecord {
    pub const COLUMNS: &'static [&'static str] =
        &["preposition", "english", "case", "example1", "example2"];

    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(row, Self::COLUMNS);

        let preposition = reader.required("preposition")?;
        let english = reader.required("english")?;
        let case = reader.required("case")?;
        let governed_case = GrammaticalCase::parse("case", &case)?;
        let example1 = reader.required("example1")?;
        let example2 = reader.optional("example2");

        if governed_case == GrammaticalCase::TwoWay && example2.is_none() {
            return Err(ValidationError::StructuralRuleViolation {
                field: "example2",
                rule: "two-way prepositions need one example per case".to_string(),
            });
        }

        Ok(Self {
            preposition,
            english,
            case,
            governed_case,
            example1,
            example2,
        })
    }
}

impl RecordFields for PrepositionRecord {
    fn category(&self) -> Category {
        Category::Preposition
    }

    fn grammar(&self) -> Option<GrammarFeature> {
        Some(GrammarFeature::Case(self.governed_case))
    }

    fn headword(&self) -> &str {
        &self.preposition
    }

    fn english(&self) -> &str {
        &self.english
    }

    fn attribute(&self, key: &str) -> Option<Option<&str>> {
        match normalize_name(key).as_str() {
            "preposition" => Some(Some(&self.preposition)),
            "english" => Some(Some(&self.english)),
            "case" => Some(Some(&self.case)),
            "example1" => Some(Some(&self.example1)),
            "example2" => Some(self.example2.as_deref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(case: &str, example2: &str) -> RawRow {
        RawRow::positional(["mit", "with", case, "Ich fahre mit dem Bus.", example2])
    }

    #[test]
    fn test_single_case_accepted_in_both_languages() {
        let record = PrepositionRecord::from_row(&row("Dativ", "")).unwrap();
        assert_eq!(record.governed_case, GrammaticalCase::Dative);
        assert_eq!(record.case, "Dativ");

        let record = PrepositionRecord::from_row(&row("dative", "")).unwrap();
        assert_eq!(record.governed_case, GrammaticalCase::Dative);
        assert!(record.example2.is_none());
    }

    #[test]
    fn test_multiple_cases_violate_rule() {
        for declared in ["dative/accusative", "Dativ + Akkusativ", "dative and accusative"] {
            let err = PrepositionRecord::from_row(&row(declared, "x")).unwrap_err();
            assert!(
                matches!(err, ValidationError::StructuralRuleViolation { field: "case", .. }),
                "{declared} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_case_is_invalid_enum() {
        let err = PrepositionRecord::from_row(&row("nominative", "")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEnum { field: "case", .. }));
    }

    #[test]
    fn test_two_way_requires_second_example() {
        let err = PrepositionRecord::from_row(&row("two-way", "")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::StructuralRuleViolation { field: "example2", .. }
        ));

        let record = PrepositionRecord::from_row(&row("Wechsel", "Ich lege es in die Tasche.")).unwrap();
        assert_eq!(record.governed_case, GrammaticalCase::TwoWay);
        assert_eq!(record.governed_case.label(), "Wechselpräposition");
    }
}
