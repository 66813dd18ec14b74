//! SessionContext: ordered evidence history for one session id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use evidence_core::{AnalysisRequest, Evidence};

/// One successful analyze call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub request: AnalysisRequest,
    pub evidence: Evidence,
    pub recorded_at: DateTime<Utc>,
}

/// Per-session state. Records only ever grow until an explicit reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    records: Vec<SessionRecord>,
}

impl SessionContext {
    pub fn new(session_id: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            created_at: now,
            last_activity: now,
            records: Vec::new(),
        }
    }

    /// Append a record at the end of the history.
    pub fn push(&mut self, request: AnalysisRequest, evidence: Evidence) {
        let now = Utc::now();
        self.records.push(SessionRecord {
            request,
            evidence,
            recorded_at: now,
        });
        self.last_activity = now;
    }

    /// Append several records under one timestamp.
    pub fn extend(&mut self, records: impl IntoIterator<Item = (AnalysisRequest, Evidence)>) {
        let now = Utc::now();
        self.records
            .extend(records.into_iter().map(|(request, evidence)| SessionRecord {
                request,
                evidence,
                recorded_at: now,
            }));
        self.last_activity = now;
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn evidence(&self) -> impl Iterator<Item = &Evidence> {
        self.records.iter().map(|r| &r.evidence)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
