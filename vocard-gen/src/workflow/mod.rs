//! Batch workflow
//!
//! [`Pipeline`] drives rows through validation, entity construction,
//! enrichment and assembly, isolating failures per row. Progress is reported
//! as [`PipelineEvent`]s over an optional channel.

pub mod pipeline;

pub use pipeline::Pipeline;

use crate::enrichment::EnrichmentStats;
use crate::records::Category;
use crate::types::{AssetKind, AssetRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline progress events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    /// Run started
    BatchStarted {
        run_id: Uuid,
        started_at: DateTime<Utc>,
    },

    /// Row picked up by a worker
    RowStarted { position: usize },

    /// Asset found in the store, no generator call
    AssetReused {
        position: usize,
        kind: AssetKind,
        asset: AssetRef,
    },

    /// Asset generated and stored
    AssetGenerated {
        position: usize,
        kind: AssetKind,
        asset: AssetRef,
    },

    /// No asset of this kind on the card (suppressed or soft failure)
    AssetSkipped {
        position: usize,
        kind: AssetKind,
        reason: String,
    },

    /// Card assembled
    RowCompleted {
        position: usize,
        category: Category,
        schema_id: String,
    },

    /// Row failed; the rest of the batch continues
    RowFailed {
        position: usize,
        category: Option<Category>,
        error: String,
    },

    /// Run finished
    BatchCompleted { summary: BatchSummary },
}

/// Totals for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failed rows that never started because the run was cancelled
    pub cancelled: usize,
    /// Engine totals at the end of the run (cumulative across runs)
    pub enrichment: EnrichmentStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = PipelineEvent::AssetSkipped {
            position: 2,
            kind: AssetKind::Image,
            reason: "suppressed".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "AssetSkipped");
        assert_eq!(json["position"], 2);
        assert_eq!(json["kind"], "image");
    }
}
