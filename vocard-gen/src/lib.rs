//! vocard-gen library interface
//!
//! Turns category-typed vocabulary rows into assembled flashcards:
//! records (validation) → entities (category behavior) → enrichment (media)
//! → assembly (template fields).

pub mod assembly;
pub mod enrichment;
pub mod entities;
pub mod error;
pub mod providers;
pub mod records;
pub mod sources;
pub mod store;
pub mod types;
pub mod workflow;

pub use crate::assembly::{AssembledCard, CardAssembler, TemplateFieldDescriptor, TemplateRegistry};
pub use crate::enrichment::{EnrichedDataBag, MediaEnricher};
pub use crate::entities::{entity_for, BoxedEntity, VocabularyEntity};
pub use crate::error::{
    FieldAssemblyError, MediaGenerationError, PipelineError, PipelineErrorKind, ValidationError,
};
pub use crate::records::{validate, Category, GrammarFeature, RawRow, Record};
pub use crate::types::{AssetKind, AssetRef, CacheKey, ImageStrategy};
pub use crate::workflow::{Pipeline, PipelineEvent};
