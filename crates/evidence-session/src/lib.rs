//! # evidence-session
//!
//! Keyed, in-memory accumulation of (request, evidence) pairs.

pub mod context;
pub mod store;

pub use context::{SessionContext, SessionRecord};
pub use store::SessionStore;
