//! Verbs

use super::{gloss_query, join_segments, VocabularyEntity};
use crate::records::{RecordFields, VerbRecord};
use crate::types::ImageStrategy;

/// Modal verbs have no picturable meaning of their own
pub const MODAL_VERBS: &[&str] = &[
    "können", "müssen", "dürfen", "sollen", "wollen", "mögen", "möchten",
];

const THIRD_PERSON_PRONOUNS: &[&str] = &["er", "sie", "es"];

#[derive(Debug, Clone)]
pub struct VerbEntity {
    record: VerbRecord,
}

impl VerbEntity {
    pub fn new(record: VerbRecord) -> Self {
        Self { record }
    }

    pub fn is_modal(&self) -> bool {
        let verb = self.record.verb.to_lowercase();
        MODAL_VERBS.contains(&verb.as_str())
    }
}

/// Prefix a conjugated form with `er` unless it already names its subject
fn third_person(form: &str) -> String {
    let form = form.trim();
    let has_pronoun = form
        .split_whitespace()
        .next()
        .is_some_and(|first| {
            THIRD_PERSON_PRONOUNS
                .iter()
                .any(|p| first.eq_ignore_ascii_case(p))
        });
    if has_pronoun {
        form.to_string()
    } else {
        format!("er {}", form)
    }
}

impl VocabularyEntity for VerbEntity {
    fn fields(&self) -> &dyn RecordFields {
        &self.record
    }

    /// Infinitive, third-person present, third-person perfect, example
    fn combined_pronunciation_text(&self) -> String {
        let r = &self.record;
        let present = third_person(&r.present_er);
        let perfect = third_person(&r.perfect);
        join_segments([
            r.verb.as_str(),
            present.as_str(),
            perfect.as_str(),
            r.example.as_str(),
        ])
    }

    fn image_search_strategy(&self) -> ImageStrategy {
        if self.is_modal() {
            return ImageStrategy::Suppressed;
        }
        gloss_query(&self.record.english, &["to "])
    }
}
