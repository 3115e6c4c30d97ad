//! Nouns, adjectives and phrases

use super::{gloss_query, join_segments, VocabularyEntity};
use crate::records::{AdjectiveRecord, NounRecord, PhraseRecord, RecordFields};
use crate::types::ImageStrategy;

/// Suffixes marking abstract German nouns (Freiheit, Möglichkeit, Zeitung, ...)
///
/// Compared case-insensitively against the end of the noun.
pub const ABSTRACT_NOUN_SUFFIXES: &[&str] = &[
    "heit", "keit", "ung", "schaft", "tät", "ismus", "tion", "nis",
];

const ARTICLE_FILLERS: &[&str] = &["the ", "an ", "a "];

#[derive(Debug, Clone)]
pub struct NounEntity {
    record: NounRecord,
}

impl NounEntity {
    pub fn new(record: NounRecord) -> Self {
        Self { record }
    }

    pub fn is_abstract(&self) -> bool {
        let noun = self.record.noun.to_lowercase();
        ABSTRACT_NOUN_SUFFIXES
            .iter()
            .any(|suffix| noun.ends_with(suffix))
    }
}

impl VocabularyEntity for NounEntity {
    fn fields(&self) -> &dyn RecordFields {
        &self.record
    }

    fn combined_pronunciation_text(&self) -> String {
        let with_article = format!("{} {}", self.record.article, self.record.noun);
        join_segments([with_article.as_str(), self.record.example.as_str()])
    }

    fn image_search_strategy(&self) -> ImageStrategy {
        if self.is_abstract() {
            return ImageStrategy::Suppressed;
        }
        gloss_query(&self.record.english, ARTICLE_FILLERS)
    }
}

#[derive(Debug, Clone)]
pub struct AdjectiveEntity {
    record: AdjectiveRecord,
}

impl AdjectiveEntity {
    pub fn new(record: AdjectiveRecord) -> Self {
        Self { record }
    }
}

impl VocabularyEntity for AdjectiveEntity {
    fn fields(&self) -> &dyn RecordFields {
        &self.record
    }

    fn combined_pronunciation_text(&self) -> String {
        let r = &self.record;
        join_segments([
            r.word.as_str(),
            r.comparative.as_deref().unwrap_or_default(),
            r.superlative.as_deref().unwrap_or_default(),
            r.example.as_str(),
        ])
    }

    fn image_search_strategy(&self) -> ImageStrategy {
        gloss_query(&self.record.english, &[])
    }
}

#[derive(Debug, Clone)]
pub struct PhraseEntity {
    record: PhraseRecord,
}

impl PhraseEntity {
    pub fn new(record: PhraseRecord) -> Self {
        Self { record }
    }
}

impl VocabularyEntity for PhraseEntity {
    fn fields(&self) -> &dyn RecordFields {
        &self.record
    }

    fn combined_pronunciation_text(&self) -> String {
        join_segments([self.record.phrase.as_str()])
    }

    fn image_search_strategy(&self) -> ImageStrategy {
        gloss_query(&self.record.english, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RawRow;

    fn noun(noun: &str, article: &str, english: &str, example: &str) -> NounEntity {
        NounEntity::new(
            NounRecord::from_row(&RawRow::positional([noun, article, english, "", example])).unwrap(),
        )
    }

    #[test]
    fn test_concrete_noun() {
        let entity = noun("Haus", "das", "house", "Das Haus ist groß.");
        assert_eq!(
            entity.combined_pronunciation_text(),
            "das Haus. Das Haus ist groß."
        );
        assert_eq!(
            entity.image_search_strategy(),
            ImageStrategy::Query("house".to_string())
        );
    }

    #[test]
    fn test_abstract_nouns_suppressed() {
        for (word, article, english) in [
            ("Freiheit", "die", "freedom"),
            ("Möglichkeit", "die", "possibility"),
            ("Erfahrung", "die", "experience"),
            ("Freundschaft", "die", "friendship"),
            ("Realität", "die", "reality"),
            ("Ergebnis", "das", "result"),
            ("Information", "die", "information"),
        ] {
            let entity = noun(word, article, english, "Ein Satz.");
            assert!(
                entity.image_search_strategy().is_suppressed(),
                "{word} should be treated as abstract"
            );
        }
    }

    #[test]
    fn test_noun_gloss_article_stripped() {
        let entity = noun("Tisch", "der", "the table", "Der Tisch ist neu.");
        assert_eq!(
            entity.image_search_strategy(),
            ImageStrategy::Query("table".to_string())
        );
    }

    #[test]
    fn test_adjective_includes_comparison_forms() {
        let entity = AdjectiveEntity::new(
            AdjectiveRecord::from_row(&RawRow::positional([
                "groß",
                "big, tall",
                "Das Haus ist groß.",
                "größer",
                "am größten",
            ]))
            .unwrap(),
        );
        assert_eq!(
            entity.combined_pronunciation_text(),
            "groß. größer. am größten. Das Haus ist groß."
        );
        assert_eq!(
            entity.image_search_strategy(),
            ImageStrategy::Query("big".to_string())
        );
    }

    #[test]
    fn test_phrase_pronounced_alone() {
        let entity = PhraseEntity::new(
            PhraseRecord::from_row(&RawRow::positional(["Guten Morgen!", "good morning", "greeting"]))
                .unwrap(),
        );
        assert_eq!(entity.combined_pronunciation_text(), "Guten Morgen!");
        assert_eq!(
            entity.image_search_strategy(),
            ImageStrategy::Query("good morning".to_string())
        );
    }
}
