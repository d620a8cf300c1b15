//! Transition tables for lifecycle status enums.

use super::ValidationError;

/// A status enum whose legal moves are a fixed table.
///
/// Implementors only list the targets reachable from each state; checking
/// and performing a transition come from the table.
///
/// ```ignore
/// let next = AssessmentStatus::Pending.transition_to(AssessmentStatus::Submitted)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + 'static {
    /// States reachable in one step from `self`.
    fn valid_transitions(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// # Errors
    ///
    /// `InvalidFormat` on field `status` when the table has no such move.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "status",
                format!("no transition from {:?} to {:?}", self, target),
            ));
        }
        Ok(target)
    }

    /// No way out.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
