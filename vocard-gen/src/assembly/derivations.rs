//! Generated field values
//!
//! Pure functions of an entity. A derivation is either available for a
//! category or not; [`derive`] returns `None` for the latter so the assembler
//! can report it.

use crate::entities::VocabularyEntity;
use crate::records::{normalize_name, strip_article, Category, GrammarFeature};

/// Derivation names accepted in templates
pub const DERIVATIONS: &[&str] = &[
    "full_noun",
    "bare_headword",
    "gender",
    "case_label",
    "separability",
    "pronunciation_text",
    "image_query",
];

/// Whether `derivation` (any spelling) is available for `category`
pub fn is_supported(category: Category, derivation: &str) -> bool {
    match normalize_name(derivation).as_str() {
        "fullnoun" | "gender" => category == Category::Noun,
        "caselabel" => category == Category::Preposition,
        "separability" => category == Category::Verb,
        "bareheadword" | "pronunciationtext" | "imagequery" => true,
        _ => false,
    }
}

/// Compute `derivation` for `entity`
///
/// `None` when the derivation is unknown for the entity's category,
/// `Some(None)` when it applies but yields no value.
pub fn derive(entity: &dyn VocabularyEntity, derivation: &str) -> Option<Option<String>> {
    if !is_supported(entity.category(), derivation) {
        return None;
    }

    let value = match normalize_name(derivation).as_str() {
        "fullnoun" => {
            let article = column(entity, "article")?;
            let noun = column(entity, "noun")?;
            Some(format!("{} {}", article, noun))
        }
        "bareheadword" => Some(bare_headword(entity.headword()).to_string()),
        "gender" | "caselabel" | "separability" => entity.grammar().map(grammar_label),
        "pronunciationtext" => Some(entity.combined_pronunciation_text()),
        "imagequery" => entity.image_search_strategy().query().map(str::to_string),
        _ => return None,
    };
    Some(value)
}

fn grammar_label(feature: GrammarFeature) -> String {
    match feature {
        GrammarFeature::Article(article) => article.gender(),
        GrammarFeature::Case(case) => case.label(),
        GrammarFeature::Separable(true) => "trennbar",
        GrammarFeature::Separable(false) => "untrennbar",
    }
    .to_string()
}

fn column<'a>(entity: &'a dyn VocabularyEntity, name: &str) -> Option<&'a str> {
    entity.attribute(name).flatten()
}

/// Headword without a leading article or reflexive `sich`
fn bare_headword(headword: &str) -> &str {
    let headword = headword.trim();
    if let Some(rest) = strip_article(headword) {
        return rest;
    }
    match headword.split_once(char::is_whitespace) {
        Some((first, rest)) if first.eq_ignore_ascii_case("sich") => rest.trim_start(),
        _ => headword,
    }
}
