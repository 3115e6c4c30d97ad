//! Noun records

use super::{normalize_name, parse_enum, Category, FieldReader, GrammarFeature, RawRow, RecordFields};
use crate::error::ValidationError;

/// Definite article, which fixes the grammatical gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Article {
    Der,
    Die,
    Das,
}

const ARTICLE_LABELS: &[&str] = &["der", "die", "das"];

impl Article {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Der => "der",
            Self::Die => "die",
            Self::Das => "das",
        }
    }

    pub fn gender(self) -> &'static str {
        match self {
            Self::Der => "masculine",
            Self::Die => "feminine",
            Self::Das => "neuter",
        }
    }

    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        const TABLE: &[(&str, Article)] = &[
            ("der", Article::Der),
            ("die", Article::Die),
            ("das", Article::Das),
        ];
        parse_enum(field, value, TABLE, ARTICLE_LABELS)
    }
}

/// Strip a leading definite article (`der Tisch` → `Tisch`)
pub fn strip_article(text: &str) -> Option<&str> {
    let text = text.trim();
    let (first, rest) = text.split_once(char::is_whitespace)?;
    ARTICLE_LABELS
        .iter()
        .any(|a| first.eq_ignore_ascii_case(a))
        .then(|| rest.trim_start())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounRecord {
    pub noun: String,
    pub article: String,
    pub article_kind: Article,
    pub english: String,
    pub plural: Option<String>,
    pub example: String,
    pub related: Option<String>,
}

impl NounRecord {
    pub const COLUMNS: &'static [&'static str] =
        &["noun", "article", "english", "plural", "example", "related"];

    pub fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(row, Self::COLUMNS);

        let noun = reader.required("noun")?;
        let article = reader.required("article")?;
        let article_kind = Article::parse("article", &article)?;
        let english = reader.required("english")?;
        let plural = reader.optional("plural");
        let example = reader.required("example")?;
        let related = reader.optional("related");

        if let Some(plural) = &plural {
            if strip_article(plural).is_some() {
                return Err(ValidationError::StructuralRuleViolation {
                    field: "plural",
                    rule: format!("plural '{}' must not repeat the article", plural),
                });
            }
        }

        Ok(Self {
            noun,
            article,
            article_kind,
            english,
            plural,
            example,
            related,
        })
    }
}

impl RecordFields for NounRecord {
    fn category(&self) -> Category {
        Category::Noun
    }

    fn grammar(&self) -> Option<GrammarFeature> {
        Some(GrammarFeature::Article(self.article_kind))
    }

    fn headword(&self) -> &str {
        &self.noun
    }

    fn english(&self) -> &str {
        &self.english
    }

    fn attribute(&self, key: &str) -> Option<Option<&str>> {
        match normalize_name(key).as_str() {
            "noun" => Some(Some(&self.noun)),
            "article" => Some(Some(&self.article)),
            "english" => Some(Some(&self.english)),
            "plural" => Some(self.plural.as_deref()),
            "example" => Some(Some(&self.example)),
            "related" => Some(self.related.as_deref()),
            _ => None,
        }
    }
}
