//! Audience-specific rendering of a session's evidence history.

pub mod notation;
pub mod renderer;
pub mod style;

pub use renderer::ReportRenderer;
pub use style::ReportStyle;
