//! Error types for vocard-gen
//!
//! Every error is local to one row/entity. The pipeline wraps them in
//! [`PipelineError`] together with the row position so a batch caller can
//! report which inputs failed without losing the rest.

use crate::records::Category;
use crate::sources::RowSourceError;
use crate::types::{AssetKind, GenerationError, StoreError};
use thiserror::Error;

/// Record validation failure, naming the offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Column not supplied by the row (absent key or row too short)
    #[error("Missing field '{field}'")]
    MissingField { field: &'static str },

    /// Required value blank after trimming
    #[error("Field '{field}' is empty")]
    EmptyField { field: &'static str },

    /// Value outside the closed set accepted for the field
    #[error("Invalid value '{value}' for field '{field}' (expected one of: {})", .allowed.join(", "))]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Category-specific rule broken
    #[error("Field '{field}' violates rule: {rule}")]
    StructuralRuleViolation { field: &'static str, rule: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::EmptyField { field }
            | Self::InvalidEnum { field, .. }
            | Self::StructuralRuleViolation { field, .. } => field,
        }
    }
}

/// Enrichment failure for a hard-fail asset kind
#[derive(Debug, Error)]
pub enum MediaGenerationError {
    /// Capability call failed
    #[error("{kind} generation via {provider} failed: {cause}")]
    Generation {
        kind: AssetKind,
        provider: &'static str,
        #[source]
        cause: GenerationError,
    },

    /// Asset store lookup or write failed
    #[error("Asset store failed for {kind}: {cause}")]
    Store {
        kind: AssetKind,
        #[source]
        cause: StoreError,
    },

    /// Batch was cancelled before this entity started
    #[error("Enrichment cancelled")]
    Cancelled,
}

impl MediaGenerationError {
    pub fn asset_kind(&self) -> Option<AssetKind> {
        match self {
            Self::Generation { kind, .. } | Self::Store { kind, .. } => Some(*kind),
            Self::Cancelled => None,
        }
    }
}

/// Card assembly failure (fatal for one entity only)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAssemblyError {
    /// Descriptor belongs to another category
    #[error("Template for '{expected}' applied to a '{actual}' entity")]
    CategoryMismatch { expected: Category, actual: Category },

    /// Record attribute does not exist for the category
    #[error("Field '{field}': '{category}' records have no attribute '{attribute}'")]
    UnknownAttribute {
        field: String,
        attribute: String,
        category: Category,
    },

    /// Derivation does not exist for the category
    #[error("Field '{field}': derivation '{derivation}' is not available for '{category}'")]
    UnknownDerivation {
        field: String,
        derivation: String,
        category: Category,
    },

    /// Required field resolved to nothing
    #[error("Required field '{field}' has no {origin} value")]
    MissingRequired { field: String, origin: &'static str },
}

/// Per-row failure surfaced to the batch caller
#[derive(Debug, Error)]
#[error("Row {position} ({}): {kind}", .category.map(Category::as_str).unwrap_or("unknown category"))]
pub struct PipelineError {
    /// Zero-based position of the row in the source
    pub position: usize,
    /// Category, once the tag was parsed
    pub category: Option<Category>,
    #[source]
    pub kind: PipelineErrorKind,
}

impl PipelineError {
    pub fn new(position: usize, category: Option<Category>, kind: impl Into<PipelineErrorKind>) -> Self {
        Self {
            position,
            category,
            kind: kind.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.kind,
            PipelineErrorKind::Cancelled | PipelineErrorKind::Media(MediaGenerationError::Cancelled)
        )
    }
}

/// What went wrong for one row
#[derive(Debug, Error)]
pub enum PipelineErrorKind {
    #[error("Row source error: {0}")]
    Source(#[from] RowSourceError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No template registered for category '{0}'")]
    MissingTemplate(Category),

    #[error("Media generation failed: {0}")]
    Media(#[from] MediaGenerationError),

    #[error("Card assembly failed: {0}")]
    Assembly(#[from] FieldAssemblyError),

    #[error("Cancelled before processing")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_message_lists_allowed_values() {
        let err = ValidationError::InvalidEnum {
            field: "article",
            value: "dem".to_string(),
            allowed: &["der", "die", "das"],
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'dem' for field 'article' (expected one of: der, die, das)"
        );
        assert_eq!(err.field(), "article");
    }

    #[test]
    fn test_pipeline_error_display_carries_position_and_category() {
        let err = PipelineError::new(
            3,
            Some(Category::Noun),
            ValidationError::MissingField { field: "example" },
        );
        assert_eq!(
            err.to_string(),
            "Row 3 (noun): Validation failed: Missing field 'example'"
        );

        let unknown = PipelineError::new(0, None, PipelineErrorKind::Cancelled);
        assert!(unknown.to_string().contains("unknown category"));
        assert!(unknown.is_cancelled());
    }
}
