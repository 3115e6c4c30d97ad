//! Card Assembly
//!
//! Resolves every field of a template descriptor against an entity and its
//! enriched media, producing the ordered field values of one note.

pub mod derivations;
pub mod template;

pub use template::{
    FieldSource, FieldSpec, MediaRender, TemplateError, TemplateFieldDescriptor, TemplateRegistry,
};

use crate::enrichment::EnrichedDataBag;
use crate::entities::VocabularyEntity;
use crate::error::FieldAssemblyError;
use crate::records::Category;
use serde::{Deserialize, Serialize};

/// One finished note: field values in descriptor order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledCard {
    pub schema_id: String,
    pub category: Category,
    pub fields: Vec<String>,
}

/// Stateless field resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct CardAssembler;

impl CardAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the card for `entity` using `descriptor`
    ///
    /// The output has exactly one value per descriptor field, in order.
    /// Optional fields without a value become `""`.
    pub fn assemble(
        &self,
        entity: &dyn VocabularyEntity,
        bag: &EnrichedDataBag,
        descriptor: &TemplateFieldDescriptor,
    ) -> Result<AssembledCard, FieldAssemblyError> {
        if descriptor.category != entity.category() {
            return Err(FieldAssemblyError::CategoryMismatch {
                expected: descriptor.category,
                actual: entity.category(),
            });
        }

        let fields = descriptor
            .fields
            .iter()
            .map(|field| self.resolve_field(entity, bag, field))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AssembledCard {
            schema_id: descriptor.schema_id.clone(),
            category: descriptor.category,
            fields,
        })
    }

    fn resolve_field(
        &self,
        entity: &dyn VocabularyEntity,
        bag: &EnrichedDataBag,
        field: &FieldSpec,
    ) -> Result<String, FieldAssemblyError> {
        let value = match &field.source {
            FieldSource::Record { attribute } => {
                let attribute = attribute.as_deref().unwrap_or(&field.name);
                entity
                    .attribute(attribute)
                    .ok_or_else(|| FieldAssemblyError::UnknownAttribute {
                        field: field.name.clone(),
                        attribute: attribute.to_string(),
                        category: entity.category(),
                    })?
                    .map(str::to_string)
            }
            FieldSource::Media { asset, render } => {
                bag.get(*asset).map(|r| render.render(r.as_str()))
            }
            FieldSource::Generated { derivation } => derivations::derive(entity, derivation)
                .ok_or_else(|| FieldAssemblyError::UnknownDerivation {
                    field: field.name.clone(),
                    derivation: derivation.clone(),
                    category: entity.category(),
                })?,
        };

        match value {
            Some(value) => Ok(value),
            None if field.required => Err(FieldAssemblyError::MissingRequired {
                field: field.name.clone(),
                origin: field.source.origin(),
            }),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::entity_for;
    use crate::records::{validate, RawRow};
    use crate::types::{AssetKind, AssetRef};

    fn haus() -> crate::BoxedEntity {
        entity_for(
            validate(
                Category::Noun,
                &RawRow::positional(["Haus", "das", "house", "", "Das Haus ist groß."]),
            )
            .unwrap(),
        )
    }

    fn full_bag() -> EnrichedDataBag {
        let mut bag = EnrichedDataBag::new();
        bag.insert(AssetKind::Audio, AssetRef::new("audio_1.wav"));
        bag.insert(AssetKind::Image, AssetRef::new("image_1.jpg"));
        bag
    }

    #[test]
    fn test_noun_card_fields() {
        let registry = TemplateRegistry::builtin();
        let card = CardAssembler::new()
            .assemble(haus().as_ref(), &full_bag(), registry.get(Category::Noun).unwrap())
            .unwrap();

        assert_eq!(card.schema_id, "vocard-noun");
        assert_eq!(
            card.fields,
            [
                "Haus",
                "das",
                "house",
                "",
                "Das Haus ist groß.",
                "",
                "das Haus",
                "<img src=\"image_1.jpg\">",
                "[sound:audio_1.wav]",
            ]
        );
    }

    #[test]
    fn test_optional_media_absent_is_empty() {
        let mut bag = EnrichedDataBag::new();
        bag.insert(AssetKind::Audio, AssetRef::new("audio_1.wav"));
        let registry = TemplateRegistry::builtin();

        let card = CardAssembler::new()
            .assemble(haus().as_ref(), &bag, registry.get(Category::Noun).unwrap())
            .unwrap();
        assert_eq!(card.fields[7], "");
        assert_eq!(card.fields.len(), 9);
    }

    #[test]
    fn test_required_media_absent_fails() {
        let registry = TemplateRegistry::builtin();
        let err = CardAssembler::new()
            .assemble(
                haus().as_ref(),
                &EnrichedDataBag::new(),
                registry.get(Category::Noun).unwrap(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            FieldAssemblyError::MissingRequired {
                field: "WordAudio".to_string(),
                origin: "media"
            }
        );
    }

    #[test]
    fn test_unknown_attribute_and_category_mismatch() {
        let descriptor = TemplateFieldDescriptor {
            schema_id: "hand-built".to_string(),
            category: Category::Noun,
            fields: vec![FieldSpec::record("Separable", true)],
        };
        let err = CardAssembler::new()
            .assemble(haus().as_ref(), &full_bag(), &descriptor)
            .unwrap_err();
        assert!(matches!(err, FieldAssemblyError::UnknownAttribute { .. }));

        let registry = TemplateRegistry::builtin();
        let err = CardAssembler::new()
            .assemble(haus().as_ref(), &full_bag(), registry.get(Category::Verb).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            FieldAssemblyError::CategoryMismatch {
                expected: Category::Verb,
                actual: Category::Noun
            }
        );
    }

    #[test]
    fn test_unknown_derivation() {
        let descriptor = TemplateFieldDescriptor {
            schema_id: "hand-built".to_string(),
            category: Category::Noun,
            fields: vec![FieldSpec::generated("Case", "case_label")],
        };
        let err = CardAssembler::new()
            .assemble(haus().as_ref(), &full_bag(), &descriptor)
            .unwrap_err();
        assert!(matches!(err, FieldAssemblyError::UnknownDerivation { .. }));
    }
}
