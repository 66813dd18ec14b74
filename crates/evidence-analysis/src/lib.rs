//! # evidence-analysis
//!
//! Infers the statistical procedure that fits a request, runs it, and
//! records the resulting `Evidence` in a session.
//!
//! Flow: request → [`selector::select`] → [`procedures::run`] → `Evidence`
//! → `SessionStore::append` → [`report::ReportRenderer`].

pub mod batch;
pub mod engine;
pub mod interpretation;
pub mod procedures;
pub mod report;
pub mod selector;

pub use batch::{BatchOutcome, BatchResult};
pub use engine::EvidenceEngine;
pub use procedures::ProcedureParams;
pub use report::{ReportRenderer, ReportStyle};
pub use selector::{select, MethodChoice};
