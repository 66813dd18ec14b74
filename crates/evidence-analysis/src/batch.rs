//! Batch coordination: independent sub-requests, positional outcomes.
//!
//! Computation may fan out over the rayon pool; outcomes and session
//! appends always follow input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use evidence_core::types::{AnalysisRequest, Evidence};
use evidence_core::{AnalysisError, AnalysisFailure, EvidenceErrorCode};
use evidence_session::SessionStore;

/// Result of one sub-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchResult {
    Evidence(Box<Evidence>),
    Failure(AnalysisFailure),
}

/// A sub-request's outcome at its input position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub index: usize,
    #[serde(flatten)]
    pub result: BatchResult,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self.result, BatchResult::Evidence(_))
    }

    pub fn evidence(&self) -> Option<&Evidence> {
        match &self.result {
            BatchResult::Evidence(e) => Some(e),
            BatchResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AnalysisFailure> {
        match &self.result {
            BatchResult::Failure(f) => Some(f),
            BatchResult::Evidence(_) => None,
        }
    }
}

/// Decode a wire batch one item at a time. An item that does not decode
/// becomes an `INVALID_PARAMETER` failure at its own position.
pub fn decode_requests(items: Vec<serde_json::Value>) -> Vec<Result<AnalysisRequest, AnalysisError>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                AnalysisError::invalid_parameter(format!("requests[{index}]"), e.to_string())
            })
        })
        .collect()
}

/// Evaluate every sub-request, preserving input order in the result.
pub fn compute_all<F>(
    requests: &[Result<AnalysisRequest, AnalysisError>],
    parallel: bool,
    evaluate: F,
) -> Vec<Result<Evidence, AnalysisError>>
where
    F: Fn(&AnalysisRequest) -> Result<Evidence, AnalysisError> + Sync,
{
    let one = |item: &Result<AnalysisRequest, AnalysisError>| match item {
        Ok(request) => evaluate(request),
        Err(e) => Err(e.clone()),
    };
    if parallel {
        requests.par_iter().map(one).collect()
    } else {
        requests.iter().map(one).collect()
    }
}

/// Run a batch under one session: compute, then append successes in input order.
pub fn run<F>(
    store: &SessionStore,
    session_id: &str,
    requests: Vec<AnalysisRequest>,
    parallel: bool,
    evaluate: F,
) -> Vec<BatchOutcome>
where
    F: Fn(&AnalysisRequest) -> Result<Evidence, AnalysisError> + Sync,
{
    run_decoded(
        store,
        session_id,
        requests.into_iter().map(Ok).collect(),
        parallel,
        evaluate,
    )
}

/// Like [`run`], over items that may already have failed to decode.
///
/// Successes are appended with one `append_many`, so a concurrent reader sees
/// the batch whole or not at all.
pub fn run_decoded<F>(
    store: &SessionStore,
    session_id: &str,
    items: Vec<Result<AnalysisRequest, AnalysisError>>,
    parallel: bool,
    evaluate: F,
) -> Vec<BatchOutcome>
where
    F: Fn(&AnalysisRequest) -> Result<Evidence, AnalysisError> + Sync,
{
    let results = compute_all(&items, parallel, evaluate);

    let mut outcomes = Vec::with_capacity(results.len());
    let mut recorded = Vec::new();
    for (index, (item, result)) in items.into_iter().zip(results).enumerate() {
        let result = match (item, result) {
            (Ok(request), Ok(evidence)) => {
                recorded.push((request, evidence.clone()));
                BatchResult::Evidence(Box::new(evidence))
            }
            (_, Err(e)) | (Err(e), _) => {
                warn!(
                    session_id,
                    index,
                    code = e.error_code(),
                    error = %e,
                    "batch sub-request failed"
                );
                BatchResult::Failure(AnalysisFailure::from(e))
            }
        };
        outcomes.push(BatchOutcome { index, result });
    }

    let succeeded = recorded.len();
    if succeeded > 0 {
        store.append_many(session_id, recorded);
    }
    info!(
        session_id,
        total = outcomes.len(),
        failed = outcomes.len() - succeeded,
        parallel,
        "batch complete"
    );
    outcomes
}
