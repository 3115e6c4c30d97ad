//! Card templates
//!
//! A [`TemplateFieldDescriptor`] lists the fields of one note type in order,
//! each drawing its value from the record, the media bag or a derivation.
//! The registry starts from built-in descriptors for every category; a TOML
//! file may replace any of them.
//!
//! ```toml
//! [[template]]
//! schema_id = "my-noun"
//! category = "noun"
//!
//! [[template.fields]]
//! name = "Noun"
//! source = "record"
//!
//! [[template.fields]]
//! name = "WordAudio"
//! source = "media"
//! asset = "audio"
//! render = "sound"
//! ```

use super::derivations;
use crate::records::{normalize_name, Category};
use crate::types::AssetKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// How a media reference is written into a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaRender {
    /// Reference verbatim
    Raw,
    /// `[sound:{ref}]`
    Sound,
    /// `<img src="{ref}">`
    Image,
}

impl MediaRender {
    pub fn render(self, reference: &str) -> String {
        match self {
            Self::Raw => reference.to_string(),
            Self::Sound => format!("[sound:{}]", reference),
            Self::Image => format!("<img src=\"{}\">", reference),
        }
    }

    fn default_for(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Audio => Self::Sound,
            AssetKind::Image => Self::Image,
        }
    }
}

/// Where a field's value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Record attribute; `None` means the field name itself
    Record { attribute: Option<String> },
    /// Asset from the enrichment bag
    Media { asset: AssetKind, render: MediaRender },
    /// Derived value
    Generated { derivation: String },
}

impl FieldSource {
    pub fn origin(&self) -> &'static str {
        match self {
            Self::Record { .. } => "record",
            Self::Media { .. } => "media",
            Self::Generated { .. } => "generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub source: FieldSource,
}

impl FieldSpec {
    pub fn record(name: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            required,
            source: FieldSource::Record { attribute: None },
        }
    }

    pub fn generated(name: &str, derivation: &str) -> Self {
        Self {
            name: name.to_string(),
            required: true,
            source: FieldSource::Generated {
                derivation: derivation.to_string(),
            },
        }
    }

    pub fn media(name: &str, asset: AssetKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            required,
            source: FieldSource::Media {
                asset,
                render: MediaRender::default_for(asset),
            },
        }
    }
}

/// Ordered field layout of one note type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFieldDescriptor {
    pub schema_id: String,
    pub category: Category,
    pub fields: Vec<FieldSpec>,
}

impl TemplateFieldDescriptor {
    /// Check the descriptor is usable for its category
    ///
    /// Rejects empty layouts, duplicate field names (after normalization),
    /// unknown record attributes and derivations the category lacks.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let invalid = |message: String| TemplateError::Invalid {
            schema_id: self.schema_id.clone(),
            message,
        };

        if self.fields.is_empty() {
            return Err(invalid("template has no fields".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(normalize_name(&field.name)) {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
            match &field.source {
                FieldSource::Record { attribute } => {
                    let attribute = attribute.as_deref().unwrap_or(&field.name);
                    if !self.category.has_attribute(attribute) {
                        return Err(invalid(format!(
                            "field '{}': {} records have no attribute '{}'",
                            field.name, self.category, attribute
                        )));
                    }
                }
                FieldSource::Generated { derivation } => {
                    if !derivations::is_supported(self.category, derivation) {
                        return Err(invalid(format!(
                            "field '{}': derivation '{}' is not available for {}",
                            field.name, derivation, self.category
                        )));
                    }
                }
                FieldSource::Media { .. } => {}
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse template file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Template '{schema_id}' is invalid: {message}")]
    Invalid { schema_id: String, message: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawSourceKind {
    Record,
    Media,
    Generated,
}

#[derive(Debug, Deserialize)]
struct RawFieldSpec {
    name: String,
    source: RawSourceKind,
    #[serde(default = "default_required")]
    required: bool,
    attribute: Option<String>,
    derivation: Option<String>,
    asset: Option<AssetKind>,
    render: Option<MediaRender>,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    schema_id: String,
    category: String,
    #[serde(default)]
    fields: Vec<RawFieldSpec>,
}

#[derive(Debug, Deserialize)]
struct RawTemplateFile {
    #[serde(default)]
    template: Vec<RawTemplate>,
}

impl RawTemplate {
    fn into_descriptor(self) -> Result<TemplateFieldDescriptor, TemplateError> {
        let schema_id = self.schema_id;
        let invalid = |message: String| TemplateError::Invalid {
            schema_id: schema_id.clone(),
            message,
        };

        let category = Category::parse(&self.category).map_err(|e| invalid(e.to_string()))?;

        let mut fields = Vec::with_capacity(self.fields.len());
        for raw in self.fields {
            let source = match raw.source {
                RawSourceKind::Record => FieldSource::Record {
                    attribute: raw.attribute,
                },
                RawSourceKind::Generated => FieldSource::Generated {
                    derivation: raw.derivation.ok_or_else(|| {
                        invalid(format!("field '{}' needs a derivation", raw.name))
                    })?,
                },
                RawSourceKind::Media => {
                    let asset = raw.asset.ok_or_else(|| {
                        invalid(format!("field '{}' needs an asset kind", raw.name))
                    })?;
                    FieldSource::Media {
                        asset,
                        render: raw.render.unwrap_or(MediaRender::default_for(asset)),
                    }
                }
            };
            fields.push(FieldSpec {
                name: raw.name,
                required: raw.required,
                source,
            });
        }

        let descriptor = TemplateFieldDescriptor {
            schema_id: schema_id.clone(),
            category,
            fields,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

/// Descriptor per category
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<Category, TemplateFieldDescriptor>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    /// Registry with no templates
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Built-in descriptors for every category
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for category in Category::ALL {
            registry
                .templates
                .insert(category, builtin_descriptor(category));
        }
        registry
    }

    /// Built-ins overridden by the templates in `text`
    pub fn from_toml_str(text: &str) -> Result<Self, TemplateError> {
        let file: RawTemplateFile = toml::from_str(text)?;
        let mut registry = Self::builtin();
        for raw in file.template {
            registry.insert(raw.into_descriptor()?)?;
        }
        Ok(registry)
    }

    /// Built-ins overridden by the template file at `path`
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&text)?;
        info!("Loaded templates from {}", path.display());
        Ok(registry)
    }

    /// Register (or replace) the descriptor for its category
    pub fn insert(&mut self, descriptor: TemplateFieldDescriptor) -> Result<(), TemplateError> {
        descriptor.validate()?;
        self.templates.insert(descriptor.category, descriptor);
        Ok(())
    }

    pub fn remove(&mut self, category: Category) -> Option<TemplateFieldDescriptor> {
        self.templates.remove(&category)
    }

    pub fn get(&self, category: Category) -> Option<&TemplateFieldDescriptor> {
        self.templates.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateFieldDescriptor> {
        self.templates.values()
    }
}

fn builtin_descriptor(category: Category) -> TemplateFieldDescriptor {
    use FieldSpec as F;

    let mut fields = match category {
        Category::Noun => vec![
            F::record("Noun", true),
            F::record("Article", true),
            F::record("English", true),
            F::record("Plural", false),
            F::record("Example", true),
            F::record("Related", false),
            F::generated("FullNoun", "full_noun"),
        ],
        Category::Verb => vec![
            F::record("Verb", true),
            F::record("English", true),
            F::record("PresentIch", true),
            F::record("PresentDu", true),
            F::record("PresentEr", true),
            F::record("Perfect", true),
            F::record("Example", true),
            F::generated("Separability", "separability"),
        ],
        Category::Adjective => vec![
            F::record("Word", true),
            F::record("English", true),
            F::record("Example", true),
            F::record("Comparative", false),
            F::record("Superlative", false),
        ],
        Category::Adverb => vec![
            F::record("Word", true),
            F::record("English", true),
            F::record("Type", true),
            F::record("Example", true),
        ],
        Category::Preposition => vec![
            F::record("Preposition", true),
            F::record("English", true),
            F::record("Case", true),
            F::generated("CaseLabel", "case_label"),
            F::record("Example1", true),
            F::record("Example2", false),
        ],
        Category::Phrase => vec![
            F::record("Phrase", true),
            F::record("English", true),
            F::record("Context", false),
            F::record("Related", false),
        ],
        Category::Negation => vec![
            F::record("Word", true),
            F::record("English", true),
            F::record("Type", true),
            F::record("Example", true),
        ],
    };
    fields.push(F::media("Image", AssetKind::Image, false));
    fields.push(F::media("WordAudio", AssetKind::Audio, true));

    TemplateFieldDescriptor {
        schema_id: format!("vocard-{}", category),
        category,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_noun_layout() {
        let registry = TemplateRegistry::builtin();
        let noun = registry.get(Category::Noun).unwrap();

        assert_eq!(noun.schema_id, "vocard-noun");
        let names: Vec<&str> = noun.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Noun", "Article", "English", "Plural", "Example", "Related", "FullNoun", "Image",
                "WordAudio"
            ]
        );
    }

    #[test]
    fn test_every_builtin_validates() {
        let registry = TemplateRegistry::builtin();
        for category in Category::ALL {
            let descriptor = registry.get(category).unwrap();
            descriptor.validate().unwrap();
            assert_eq!(descriptor.category, category);
        }
    }

    #[test]
    fn test_toml_override_replaces_builtin() {
        let registry = TemplateRegistry::from_toml_str(
            r#"
            [[template]]
            schema_id = "mini-phrase"
            category = "phrases"

            [[template.fields]]
            name = "Front"
            source = "record"
            attribute = "phrase"

            [[template.fields]]
            name = "Back"
            source = "record"
            attribute = "english"

            [[template.fields]]
            name = "Audio"
            source = "media"
            asset = "audio"
            render = "raw"
            required = false
            "#,
        )
        .unwrap();

        let phrase = registry.get(Category::Phrase).unwrap();
        assert_eq!(phrase.schema_id, "mini-phrase");
        assert_eq!(phrase.fields.len(), 3);
        assert_eq!(
            phrase.fields[2].source,
            FieldSource::Media {
                asset: AssetKind::Audio,
                render: MediaRender::Raw
            }
        );
        assert!(!phrase.fields[2].required);
        assert_eq!(registry.get(Category::Noun).unwrap().schema_id, "vocard-noun");
    }

    #[test]
    fn test_invalid_templates_rejected() {
        let duplicate = r#"
            [[template]]
            schema_id = "dup"
            category = "noun"
            [[template.fields]]
            name = "Noun"
            source = "record"
            [[template.fields]]
            name = "noun"
            source = "record"
        "#;
        assert!(matches!(
            TemplateRegistry::from_toml_str(duplicate),
            Err(TemplateError::Invalid { .. })
        ));

        let empty = r#"
            [[template]]
            schema_id = "empty"
            category = "verb"
        "#;
        assert!(matches!(
            TemplateRegistry::from_toml_str(empty),
            Err(TemplateError::Invalid { .. })
        ));

        let wrong_derivation = r#"
            [[template]]
            schema_id = "bad"
            category = "verb"
            [[template.fields]]
            name = "Gender"
            source = "generated"
            derivation = "gender"
        "#;
        assert!(matches!(
            TemplateRegistry::from_toml_str(wrong_derivation),
            Err(TemplateError::Invalid { .. })
        ));
    }

    #[test]
    fn test_media_render() {
        assert_eq!(MediaRender::Sound.render("a.wav"), "[sound:a.wav]");
        assert_eq!(MediaRender::Image.render("b.jpg"), "<img src=\"b.jpg\">");
        assert_eq!(MediaRender::Raw.render("c"), "c");
    }
}
