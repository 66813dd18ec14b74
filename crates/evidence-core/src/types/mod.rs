//! Data model shared by the selector, procedures, store, and renderer.

pub mod evidence;
pub mod method;
pub mod observations;
pub mod request;

pub use evidence::{
    CategoryCount, ConfidenceInterval, ContingencyTable, DegreesOfFreedom, EffectMagnitude,
    EffectSize, EffectSizeKind, Evidence, EvidenceBuilder, FrequencySummary, StatisticKind,
    TestStatistic, VariableSummary,
};
pub use method::{MethodKind, Tail};
pub use observations::{ObservationSet, RawValue, Variable};
pub use request::AnalysisRequest;
