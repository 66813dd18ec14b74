//! EvidenceEngine, the operation surface (analyze, batch, report, reset).

use std::sync::Arc;

use tracing::{info, warn};

use evidence_core::types::{AnalysisRequest, Evidence};
use evidence_core::{AnalysisError, EvidenceConfig, EvidenceErrorCode};
use evidence_session::{SessionRecord, SessionStore};

use crate::batch::{self, BatchOutcome};
use crate::procedures::{self, ProcedureParams};
use crate::report::{ReportRenderer, ReportStyle};
use crate::selector;

/// Statistical evidence engine over an injected session store.
///
/// Engines sharing one `Arc<SessionStore>` see each other's sessions;
/// separate stores give isolated state.
pub struct EvidenceEngine {
    config: EvidenceConfig,
    store: Arc<SessionStore>,
    renderer: ReportRenderer,
}

impl EvidenceEngine {
    pub fn new(config: EvidenceConfig, store: Arc<SessionStore>) -> Self {
        let renderer = ReportRenderer::new(config.report.effective_decimal_places());
        Self {
            config,
            store,
            renderer,
        }
    }

    /// Compiled defaults and a fresh store.
    pub fn with_defaults() -> Self {
        Self::new(EvidenceConfig::default(), Arc::new(SessionStore::new()))
    }

    pub fn config(&self) -> &EvidenceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Select and run the procedure for one request without recording it.
    pub fn evaluate(&self, request: &AnalysisRequest) -> Result<Evidence, AnalysisError> {
        let params = ProcedureParams::resolve(&self.config.analysis, request)?;
        let choice = selector::select(request)?;
        procedures::run(&choice, &params)
    }

    /// Analyze one request and append the result to the session.
    pub fn analyze(
        &self,
        session_id: &str,
        request: AnalysisRequest,
    ) -> Result<Evidence, AnalysisError> {
        match self.evaluate(&request) {
            Ok(evidence) => {
                info!(
                    session_id,
                    method = evidence.method.name(),
                    test = %evidence.test_name,
                    p_value = evidence.p_value,
                    significant = evidence.significant,
                    "analysis complete"
                );
                self.store.append(session_id, request, evidence.clone());
                Ok(evidence)
            }
            Err(e) => {
                warn!(session_id, code = e.error_code(), error = %e, "analysis failed");
                Err(e)
            }
        }
    }

    /// Analyze every sub-request independently; failures stay at their position.
    pub fn batch_analyze(
        &self,
        session_id: &str,
        requests: Vec<AnalysisRequest>,
    ) -> Vec<BatchOutcome> {
        batch::run(
            &self.store,
            session_id,
            requests,
            self.config.batch.effective_parallel(),
            |request| self.evaluate(request),
        )
    }

    /// Batch over raw wire items. Items that do not decode fail in place
    /// without affecting the rest.
    pub fn batch_analyze_values(
        &self,
        session_id: &str,
        items: Vec<serde_json::Value>,
    ) -> Vec<BatchOutcome> {
        batch::run_decoded(
            &self.store,
            session_id,
            batch::decode_requests(items),
            self.config.batch.effective_parallel(),
            |request| self.evaluate(request),
        )
    }

    pub fn render_report(&self, session_id: &str, style: ReportStyle) -> String {
        let records = self.store.evidence(session_id);
        self.renderer.render(session_id, &records, style)
    }

    /// Clear a session. Returns how many records were dropped.
    pub fn reset(&self, session_id: &str) -> usize {
        let dropped = self.store.reset(session_id);
        info!(session_id, dropped, "session reset");
        dropped
    }

    pub fn history(&self, session_id: &str) -> Vec<SessionRecord> {
        self.store.get_all(session_id)
    }
}

impl Default for EvidenceEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
