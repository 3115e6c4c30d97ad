//! Domain entities
//!
//! Each category wraps its record in an entity implementing
//! [`VocabularyEntity`], the single capability the enrichment engine and the
//! card assembler work against. The concrete entity is picked once, in
//! [`entity_for`]; nothing downstream branches on category to decide how to
//! pronounce or illustrate a word.

mod nominal;
mod particles;
mod verbal;

pub use nominal::{AdjectiveEntity, NounEntity, PhraseEntity, ABSTRACT_NOUN_SUFFIXES};
pub use particles::{AdverbEntity, NegationEntity, PrepositionEntity};
pub use verbal::{VerbEntity, MODAL_VERBS};

use crate::records::{Category, GrammarFeature, Record, RecordFields};
use crate::types::ImageStrategy;
use std::fmt;

/// Category-specific behavior of one validated record
///
/// All methods are total over a valid record and never call external services.
pub trait VocabularyEntity: Send + Sync + fmt::Debug {
    /// Read-only view of the wrapped record
    fn fields(&self) -> &dyn RecordFields;

    /// Text sent to the audio generator; never empty
    fn combined_pronunciation_text(&self) -> String;

    /// Query for the image generator, or `Suppressed`
    fn image_search_strategy(&self) -> ImageStrategy;

    fn category(&self) -> Category {
        self.fields().category()
    }

    fn headword(&self) -> &str {
        self.fields().headword()
    }

    /// See [`RecordFields::attribute`]
    fn attribute(&self, name: &str) -> Option<Option<&str>> {
        self.fields().attribute(name)
    }

    fn grammar(&self) -> Option<GrammarFeature> {
        self.fields().grammar()
    }
}

pub type BoxedEntity = Box<dyn VocabularyEntity>;

/// Wrap a record in the entity for its category
pub fn entity_for(record: Record) -> BoxedEntity {
    match record {
        Record::Noun(r) => Box::new(NounEntity::new(r)),
        Record::Verb(r) => Box::new(VerbEntity::new(r)),
        Record::Adjective(r) => Box::new(AdjectiveEntity::new(r)),
        Record::Adverb(r) => Box::new(AdverbEntity::new(r)),
        Record::Preposition(r) => Box::new(PrepositionEntity::new(r)),
        Record::Phrase(r) => Box::new(PhraseEntity::new(r)),
        Record::Negation(r) => Box::new(NegationEntity::new(r)),
    }
}

/// Join pronunciation segments into one utterance
///
/// Blank segments are dropped; every segment but the last ends with sentence
/// punctuation so the speech engine pauses between them.
pub(crate) fn join_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let parts: Vec<&str> = segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut text = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(part);
        if i + 1 < parts.len() && !part.ends_with(['.', '!', '?']) {
            text.push('.');
        }
    }
    text
}

/// Build an image query from an English gloss
///
/// Keeps the first sense (`,`/`;` separated), drops parenthesized notes and
/// strips one leading filler word such as `the ` or `to `.
pub(crate) fn gloss_query(english: &str, strip_prefixes: &[&str]) -> ImageStrategy {
    let first_sense = english.split([',', ';']).next().unwrap_or_default();

    let mut cleaned = String::with_capacity(first_sense.len());
    let mut depth = 0usize;
    for c in first_sense.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => cleaned.push(c),
            _ => {}
        }
    }

    let mut query = cleaned.trim();
    for prefix in strip_prefixes {
        let matches = query
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            query = query[prefix.len()..].trim_start();
            break;
        }
    }

    let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        ImageStrategy::Suppressed
    } else {
        ImageStrategy::Query(query)
    }
}
