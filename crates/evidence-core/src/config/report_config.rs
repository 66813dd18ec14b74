//! Report configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places for statistics in academic output. Default: 3.
    pub decimal_places: Option<usize>,
}

impl ReportConfig {
    pub fn effective_decimal_places(&self) -> usize {
        self.decimal_places
            .unwrap_or(constants::DEFAULT_DECIMAL_PLACES)
    }
}
