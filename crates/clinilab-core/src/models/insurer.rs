//! Insurer (convênio) activity models.

use serde::{Deserialize, Serialize};

/// Aggregated activity for one insurer over the report period.
///
/// Participation percentages and totals are derived from these rows by the
/// report module; they are never stored alongside them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsurerActivity {
    /// Insurer name
    pub name: String,
    /// Number of service requests
    pub requests: u32,
    /// Number of exams performed
    pub exams: u32,
    /// Total billed value
    pub total_value: f64,
}

impl InsurerActivity {
    pub fn new(name: impl Into<String>, requests: u32, exams: u32, total_value: f64) -> Self {
        Self {
            name: name.into(),
            requests,
            exams,
            total_value,
        }
    }
}
