//! Pipeline Orchestrator
//!
//! Runs every row through the same stages:
//! 1. Category tag → [`Category`]
//! 2. Validation → [`Record`](crate::records::Record)
//! 3. Entity construction
//! 4. Media enrichment
//! 5. Card assembly against the category's template
//!
//! # Error Handling
//! - Per-row isolation: a failing row yields a [`PipelineError`] at its
//!   position and the batch continues
//! - [`Pipeline::run_all_or_nothing`] cancels the remaining rows on the first
//!   failure instead
//! - Cancellation is cooperative: rows not yet started fail with
//!   `Cancelled`, rows in flight finish
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(enricher, TemplateRegistry::builtin());
//! let results = pipeline.run(CsvRowSource::open(path, None)?).await;
//! ```

use super::{BatchSummary, PipelineEvent};
use crate::assembly::{AssembledCard, CardAssembler, TemplateRegistry};
use crate::enrichment::{AssetOutcome, MediaEnricher};
use crate::entities::entity_for;
use crate::error::{PipelineError, PipelineErrorKind};
use crate::records::{validate, Category};
use crate::sources::{RowSourceError, SourceRow};
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Row-to-card orchestrator
pub struct Pipeline {
    enricher: MediaEnricher,
    templates: TemplateRegistry,
    assembler: CardAssembler,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(enricher: MediaEnricher, templates: TemplateRegistry) -> Self {
        Self {
            enricher,
            templates,
            assembler: CardAssembler::new(),
            event_tx: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Report progress on `event_tx`
    pub fn with_events(mut self, event_tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Token cancelling every current and future run of this pipeline
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn enricher(&self) -> &MediaEnricher {
        &self.enricher
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Process all rows, one result per row in input order
    pub async fn run<I>(&self, rows: I) -> Vec<Result<AssembledCard, PipelineError>>
    where
        I: IntoIterator<Item = Result<SourceRow, RowSourceError>>,
    {
        self.run_inner(rows, false).await
    }

    /// Process all rows or none
    ///
    /// The first failure cancels the rows not yet started and is returned.
    pub async fn run_all_or_nothing<I>(&self, rows: I) -> Result<Vec<AssembledCard>, PipelineError>
    where
        I: IntoIterator<Item = Result<SourceRow, RowSourceError>>,
    {
        let results = self.run_inner(rows, true).await;

        let mut cards = Vec::with_capacity(results.len());
        let mut first_cancelled = None;
        for result in results {
            match result {
                Ok(card) => cards.push(card),
                Err(e) if e.is_cancelled() => {
                    first_cancelled.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        match first_cancelled {
            Some(e) => Err(e),
            None => Ok(cards),
        }
    }

    async fn run_inner<I>(&self, rows: I, fail_fast: bool) -> Vec<Result<AssembledCard, PipelineError>>
    where
        I: IntoIterator<Item = Result<SourceRow, RowSourceError>>,
    {
        let run_id = Uuid::new_v4();
        let started_at = chrono::Utc::now();
        let token = self.cancel.child_token();
        let token_ref = &token;
        let workers = self.enricher.settings().max_concurrent_entities.max(1);

        info!(run_id = %run_id, workers = workers, fail_fast = fail_fast, "Pipeline run started");
        self.emit_event(PipelineEvent::BatchStarted { run_id, started_at })
            .await;

        let results: Vec<Result<AssembledCard, PipelineError>> =
            stream::iter(rows.into_iter().enumerate())
                .map(|(position, row)| async move {
                    let result = self.process_row(position, row, token_ref).await;
                    match &result {
                        Ok(card) => {
                            self.emit_event(PipelineEvent::RowCompleted {
                                position,
                                category: card.category,
                                schema_id: card.schema_id.clone(),
                            })
                            .await;
                        }
                        Err(e) => {
                            if e.is_cancelled() {
                                debug!(position = position, "Row skipped (cancelled)");
                            } else {
                                warn!(position = position, error = %e, "Row failed");
                                if fail_fast {
                                    token_ref.cancel();
                                }
                            }
                            self.emit_event(PipelineEvent::RowFailed {
                                position,
                                category: e.category,
                                error: e.to_string(),
                            })
                            .await;
                        }
                    }
                    result
                })
                .buffered(workers)
                .collect()
                .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        let cancelled = results
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_cancelled()))
            .count();
        let summary = BatchSummary {
            run_id,
            started_at,
            finished_at: chrono::Utc::now(),
            total_rows: results.len(),
            succeeded: results.len() - failed,
            failed,
            cancelled,
            enrichment: self.enricher.stats(),
        };

        info!(
            run_id = %run_id,
            total = summary.total_rows,
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Pipeline run complete"
        );
        self.emit_event(PipelineEvent::BatchCompleted { summary }).await;

        results
    }

    async fn process_row(
        &self,
        position: usize,
        row: Result<SourceRow, RowSourceError>,
        cancel: &CancellationToken,
    ) -> Result<AssembledCard, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::new(position, None, PipelineErrorKind::Cancelled));
        }
        self.emit_event(PipelineEvent::RowStarted { position }).await;

        let source = row.map_err(|e| PipelineError::new(position, None, e))?;
        let category =
            Category::parse(&source.category).map_err(|e| PipelineError::new(position, None, e))?;
        let fail = |kind: PipelineErrorKind| PipelineError::new(position, Some(category), kind);

        let record = validate(category, &source.row).map_err(|e| fail(e.into()))?;
        let entity = entity_for(record);
        let descriptor = self
            .templates
            .get(category)
            .ok_or_else(|| fail(PipelineErrorKind::MissingTemplate(category)))?;

        debug!(position = position, category = %category, headword = %entity.headword(), "Enriching");
        let report = self
            .enricher
            .enrich_with_report(entity.as_ref())
            .await
            .map_err(|e| fail(e.into()))?;

        for (kind, outcome) in report.outcomes {
            let event = match outcome {
                AssetOutcome::Reused { asset, .. } => PipelineEvent::AssetReused { position, kind, asset },
                AssetOutcome::Generated { asset, .. } => {
                    PipelineEvent::AssetGenerated { position, kind, asset }
                }
                AssetOutcome::Suppressed => PipelineEvent::AssetSkipped {
                    position,
                    kind,
                    reason: "suppressed".to_string(),
                },
                AssetOutcome::Failed { provider, message } => PipelineEvent::AssetSkipped {
                    position,
                    kind,
                    reason: format!("{} failed: {}", provider, message),
                },
            };
            self.emit_event(event).await;
        }

        self.assembler
            .assemble(entity.as_ref(), &report.bag, descriptor)
            .map_err(|e| fail(e.into()))
    }

    /// Emit event (if channel configured)
    async fn emit_event(&self, event: PipelineEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }
}
