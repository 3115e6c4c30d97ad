//! Record validation
//!
//! Turns one raw row plus a category tag into a typed, immutable [`Record`],
//! or fails on the first offending field. Values are kept verbatim apart from
//! whitespace trimming; enum-like columns are parsed alongside the raw text.
//!
//! Whether a failing row is skipped or aborts the batch is decided by the
//! caller, never here.

pub mod adjective;
pub mod adverb;
pub mod negation;
pub mod noun;
pub mod phrase;
pub mod preposition;
pub mod verb;

pub use adjective::AdjectiveRecord;
pub use adverb::{AdverbRecord, AdverbType};
pub use negation::{NegationRecord, NegationType};
pub use noun::{strip_article, Article, NounRecord};
pub use phrase::PhraseRecord;
pub use preposition::{GrammaticalCase, PrepositionRecord};
pub use verb::VerbRecord;

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Grammatical category of a vocabulary entry (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Phrase,
    Negation,
}

const CATEGORY_TAGS: &[&str] = &[
    "noun",
    "verb",
    "adjective",
    "adverb",
    "preposition",
    "phrase",
    "negation",
];

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Noun,
        Self::Verb,
        Self::Adjective,
        Self::Adverb,
        Self::Preposition,
        Self::Phrase,
        Self::Negation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Preposition => "preposition",
            Self::Phrase => "phrase",
            Self::Negation => "negation",
        }
    }

    /// Parse a category tag (case-insensitive, plural file-style tags accepted)
    pub fn parse(tag: &str) -> Result<Self, ValidationError> {
        let normalized = normalize_name(tag);
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized || c.as_str() == singular)
            .ok_or_else(|| ValidationError::InvalidEnum {
                field: "category",
                value: tag.trim().to_string(),
                allowed: CATEGORY_TAGS,
            })
    }

    /// Columns of this category in positional order
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Noun => NounRecord::COLUMNS,
            Self::Verb => VerbRecord::COLUMNS,
            Self::Adjective => AdjectiveRecord::COLUMNS,
            Self::Adverb => AdverbRecord::COLUMNS,
            Self::Preposition => PrepositionRecord::COLUMNS,
            Self::Phrase => PhraseRecord::COLUMNS,
            Self::Negation => NegationRecord::COLUMNS,
        }
    }

    /// Whether `attribute` (any spelling) names a column of this category
    pub fn has_attribute(self, attribute: &str) -> bool {
        let key = normalize_name(attribute);
        self.columns().iter().any(|c| normalize_name(c) == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a field/attribute name: lowercase, separators removed
///
/// `word_audio`, `WordAudio` and `word-audio` all become `wordaudio`.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// One unvalidated source row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    /// Values in the category's column order
    Positional(Vec<String>),
    /// Values by column name (keys normalized with [`normalize_name`])
    Keyed(HashMap<String, String>),
}

impl RawRow {
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (normalize_name(k.as_ref()), v.into()))
                .collect(),
        )
    }
}

/// Column accessor shared by the per-category validators
pub(crate) struct FieldReader<'a> {
    row: &'a RawRow,
    columns: &'static [&'static str],
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(row: &'a RawRow, columns: &'static [&'static str]) -> Self {
        Self { row, columns }
    }

    fn raw(&self, column: &'static str) -> Option<&'a str> {
        match self.row {
            RawRow::Positional(values) => {
                let index = self.columns.iter().position(|c| *c == column)?;
                values.get(index).map(String::as_str)
            }
            RawRow::Keyed(map) => map.get(&normalize_name(column)).map(String::as_str),
        }
    }

    /// Required column: present and non-blank after trimming
    pub(crate) fn required(&self, column: &'static str) -> Result<String, ValidationError> {
        let value = self
            .raw(column)
            .ok_or(ValidationError::MissingField { field: column })?
            .trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyField { field: column });
        }
        Ok(value.to_string())
    }

    /// Optional column: absent or blank both mean `None`
    pub(crate) fn optional(&self, column: &'static str) -> Option<String> {
        self.raw(column)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Look a value up in a table of accepted spellings
pub(crate) fn parse_enum<T: Copy>(
    field: &'static str,
    value: &str,
    table: &[(&str, T)],
    allowed: &'static [&'static str],
) -> Result<T, ValidationError> {
    let key = normalize_name(value);
    table
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| ValidationError::InvalidEnum {
            field,
            value: value.to_string(),
            allowed,
        })
}

const BOOL_LABELS: &[&str] = &["true", "false", "yes", "no", "ja", "nein", "1", "0", "y", "n"];

/// Boolean coercion used for flag columns
pub fn parse_bool(field: &'static str, value: &str) -> Result<bool, ValidationError> {
    const TABLE: &[(&str, bool)] = &[
        ("true", true),
        ("yes", true),
        ("ja", true),
        ("1", true),
        ("y", true),
        ("j", true),
        ("false", false),
        ("no", false),
        ("nein", false),
        ("0", false),
        ("n", false),
    ];
    parse_enum(field, value, TABLE, BOOL_LABELS)
}

/// Grammar value parsed during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarFeature {
    /// Noun article (fixes gender)
    Article(Article),
    /// Case governed by a preposition
    Case(GrammaticalCase),
    /// Verb separability
    Separable(bool),
}

/// Read-only attribute access shared by all records
pub trait RecordFields {
    fn category(&self) -> Category;

    /// Typed grammar value, for categories that carry one
    fn grammar(&self) -> Option<GrammarFeature> {
        None
    }

    /// The word being learned
    fn headword(&self) -> &str;

    /// English gloss
    fn english(&self) -> &str;

    /// Look up a column by name (any spelling accepted by [`normalize_name`])
    ///
    /// `None` when the category has no such column, `Some(None)` when the
    /// column exists but this optional value was not supplied.
    fn attribute(&self, key: &str) -> Option<Option<&str>>;
}

/// Validated vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Noun(NounRecord),
    Verb(VerbRecord),
    Adjective(AdjectiveRecord),
    Adverb(AdverbRecord),
    Preposition(PrepositionRecord),
    Phrase(PhraseRecord),
    Negation(NegationRecord),
}

impl Record {
    fn fields(&self) -> &dyn RecordFields {
        match self {
            Self::Noun(r) => r,
            Self::Verb(r) => r,
            Self::Adjective(r) => r,
            Self::Adverb(r) => r,
            Self::Preposition(r) => r,
            Self::Phrase(r) => r,
            Self::Negation(r) => r,
        }
    }
}

impl RecordFields for Record {
    fn category(&self) -> Category {
        self.fields().category()
    }

    fn headword(&self) -> &str {
        self.fields().headword()
    }

    fn english(&self) -> &str {
        self.fields().english()
    }

    fn attribute(&self, key: &str) -> Option<Option<&str>> {
        self.fields().attribute(key)
    }
}

/// Validate one raw row for `category`
///
/// Pure function of its inputs; fails fast on the first offending field.
pub fn validate(category: Category, row: &RawRow) -> Result<Record, ValidationError> {
    Ok(match category {
        Category::Noun => Record::Noun(NounRecord::from_row(row)?),
        Category::Verb => Record::Verb(VerbRecord::from_row(row)?),
        Category::Adjective => Record::Adjective(AdjectiveRecord::from_row(row)?),
        Category::Adverb => Record::Adverb(AdverbRecord::from_row(row)?),
        Category::Preposition => Record::Preposition(PrepositionRecord::from_row(row)?),
        Category::Phrase => Record::Phrase(PhraseRecord::from_row(row)?),
        Category::Negation => Record::Negation(NegationRecord::from_row(row)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("noun").unwrap(), Category::Noun);
        assert_eq!(Category::parse(" Nouns ").unwrap(), Category::Noun);
        assert_eq!(Category::parse("PREPOSITIONS").unwrap(), Category::Preposition);
        assert_eq!(Category::parse("phrase").unwrap(), Category::Phrase);

        let err = Category::parse("interjection").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidEnum { field: "category", .. }
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("word_audio"), "wordaudio");
        assert_eq!(normalize_name("WordAudio"), "wordaudio");
        assert_eq!(normalize_name(" present-er "), "presenter");
    }

    #[test]
    fn test_has_attribute() {
        assert!(Category::Verb.has_attribute("PresentIch"));
        assert!(Category::Noun.has_attribute("article"));
        assert!(!Category::Noun.has_attribute("separable"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("separable", "Ja").unwrap());
        assert!(parse_bool("separable", "TRUE").unwrap());
        assert!(!parse_bool("separable", "0").unwrap());
        assert!(!parse_bool("separable", "nein").unwrap());
        assert!(matches!(
            parse_bool("separable", "maybe"),
            Err(ValidationError::InvalidEnum { field: "separable", .. })
        ));
    }

    #[test]
    fn test_keyed_and_positional_rows_validate_identically() {
        let positional = RawRow::positional(["Haus", "das", "house", "", "Das Haus ist groß."]);
        let keyed = RawRow::keyed([
            ("Noun", "Haus"),
            ("Article", "das"),
            ("English", "house"),
            ("Example", "Das Haus ist groß."),
        ]);

        assert_eq!(
            validate(Category::Noun, &positional).unwrap(),
            validate(Category::Noun, &keyed).unwrap()
        );
    }

    #[test]
    fn test_short_positional_row_reports_first_missing_column() {
        let row = RawRow::positional(["Haus", "das", "house"]);
        assert_eq!(
            validate(Category::Noun, &row).unwrap_err(),
            ValidationError::MissingField { field: "example" }
        );
    }

    #[test]
    fn test_record_fields_delegate() {
        let row = RawRow::positional(["schnell", "fast", "Das Auto ist schnell."]);
        let record = validate(Category::Adjective, &row).unwrap();

        assert_eq!(record.category(), Category::Adjective);
        assert_eq!(record.headword(), "schnell");
        assert_eq!(record.english(), "fast");
        assert_eq!(record.attribute("comparative"), Some(None));
        assert_eq!(record.attribute("article"), None);
    }
}
