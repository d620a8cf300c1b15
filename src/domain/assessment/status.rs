//! Assessment lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Status of an assessment.
///
/// ```text
/// Pending ──► Submitted ──► Interpreted
///                 ▲   │
///                 │   ▼
///                 Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    #[default]
    Pending,
    Submitted,
    Interpreted,
    Failed,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::Pending => "pending",
            AssessmentStatus::Submitted => "submitted",
            AssessmentStatus::Interpreted => "interpreted",
            AssessmentStatus::Failed => "failed",
        }
    }

    /// Interpreted or failed. A failed assessment can still be retried.
    pub fn is_finished(&self) -> bool {
        matches!(self, AssessmentStatus::Interpreted | AssessmentStatus::Failed)
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for AssessmentStatus {
    fn valid_transitions(&self) -> &'static [Self] {
        use AssessmentStatus::*;
        match self {
            Pending => &[Submitted],
            Submitted => &[Interpreted, Failed],
            Failed => &[Submitted],
            Interpreted => &[],
        }
    }
}
