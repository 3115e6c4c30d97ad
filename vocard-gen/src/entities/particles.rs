//! Adverbs, prepositions and negations

use super::{gloss_query, join_segments, VocabularyEntity};
use crate::records::{AdverbRecord, NegationRecord, PrepositionRecord, RecordFields};
use crate::types::ImageStrategy;

#[derive(Debug, Clone)]
pub struct AdverbEntity {
    record: AdverbRecord,
}

impl AdverbEntity {
    pub fn new(record: AdverbRecord) -> Self {
        Self { record }
    }
}

impl VocabularyEntity for AdverbEntity {
    fn fields(&self) -> &dyn RecordFields {
        &self.record
    }

    fn combined_pronunciation_text(&self) -> String {
        join_segments([self.record.word.as_str(), self.record.example.as_str()])
    }

    fn image_search_strategy(&self) -> ImageStrategy {
        if self.record.kind.is_abstract() {
            return ImageStrategy::Suppressed;
        }
        gloss_query(&self.record.english, &[])
    }
}

/// Prepositions are pure grammar: pronounced with their examples, never illustrated
#[derive(Debug, Clone)]
pub struct PrepositionEntity {
    record: PrepositionRecord,
}

impl PrepositionEntity {
    pub fn new(record: PrepositionRecord) -> Self {
        Self { record }
    }
}

impl VocabularyEntity for PrepositionEntity {
    fn fields(&self) -> &dyn RecordFields {
        &self.record
    }

    fn combined_pronunciation_text(&self) -> String {
        let r = &self.record;
        join_segments([
            r.preposition.as_str(),
            r.example1.as_str(),
            r.example2.as_deref().unwrap_or_default(),
        ])
    }

    fn image_search_strategy(&self) -> ImageStrategy {
        ImageStrategy::Suppressed
    }
}

#[derive(Debug, Clone)]
pub struct NegationEntity {
    record: NegationRecord,
}

impl NegationEntity {
    pub fn new(record: NegationRecord) -> Self {
        Self { record }
    }
}

impl VocabularyEntity for NegationEntity {
    fn fields(&self) -> &dyn RecordFields {
        &self.record
    }

    fn combined_pronunciation_text(&self) -> String {
        join_segments([self.record.word.as_str(), self.record.example.as_str()])
    }

    fn image_search_strategy(&self) -> ImageStrategy {
        ImageStrategy::Suppressed
    }
}
