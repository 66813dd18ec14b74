//! SessionStore: concurrent per-session history via DashMap.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use evidence_core::{AnalysisRequest, Evidence};

use crate::context::{SessionContext, SessionRecord};

/// Thread-safe evidence store keyed by caller-supplied session id.
///
/// Each append runs under the shard lock of its session id, so concurrent
/// appends to one session are serialized and never interleave.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Append a record, creating the session on first use. Returns the new length.
    pub fn append(&self, session_id: &str, request: AnalysisRequest, evidence: Evidence) -> usize {
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionContext::new(session_id.to_string()));
        entry.push(request, evidence);
        let len = entry.len();
        debug!(session_id, records = len, "evidence appended");
        len
    }

    /// Append a batch of records under a single entry lock, so readers see
    /// either none or all of them. Returns the new length.
    pub fn append_many(
        &self,
        session_id: &str,
        records: Vec<(AnalysisRequest, Evidence)>,
    ) -> usize {
        let added = records.len();
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionContext::new(session_id.to_string()));
        entry.extend(records);
        let len = entry.len();
        debug!(session_id, added, records = len, "evidence batch appended");
        len
    }

    /// Cloned snapshot of a session's records in insertion order.
    /// Unknown ids yield an empty history.
    pub fn get_all(&self, session_id: &str) -> Vec<SessionRecord> {
        self.sessions
            .get(session_id)
            .map(|s| s.records().to_vec())
            .unwrap_or_default()
    }

    /// Evidence only, in insertion order.
    pub fn evidence(&self, session_id: &str) -> Vec<Evidence> {
        self.sessions
            .get(session_id)
            .map(|s| s.evidence().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of the whole session context, if it exists.
    pub fn get_session(&self, session_id: &str) -> Option<SessionContext> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// Clear a session's history. Returns how many records were dropped.
    pub fn reset(&self, session_id: &str) -> usize {
        let dropped = self
            .sessions
            .remove(session_id)
            .map(|(_, ctx)| ctx.len())
            .unwrap_or(0);
        debug!(session_id, dropped, "session reset");
        dropped
    }

    /// Number of records in one session.
    pub fn len(&self, session_id: &str) -> usize {
        self.sessions.get(session_id).map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|r| r.key().clone()).collect()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
