use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_status")]
pub enum IssueStatus {
    Submitted,
    InProgress,
    Resolved,
    Rejected,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Submitted => "Submitted",
            IssueStatus::InProgress => "InProgress",
            IssueStatus::Resolved => "Resolved",
            IssueStatus::Rejected => "Rejected",
        }
    }

    /// Resolved and Rejected reports are closed
    pub fn is_final(&self) -> bool {
        matches!(self, IssueStatus::Resolved | IssueStatus::Rejected)
    }

    /// Whether an official may move a report from `self` to `next`.
    /// Closed reports stay closed and nothing moves back to Submitted.
    pub fn can_transition_to(&self, next: IssueStatus) -> bool {
        !self.is_final() && *self != next && next != IssueStatus::Submitted
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use IssueStatus::*;

        assert!(Submitted.can_transition_to(InProgress));
        assert!(Submitted.can_transition_to(Rejected));
        assert!(InProgress.can_transition_to(Resolved));

        assert!(!InProgress.can_transition_to(Submitted));
        assert!(!Submitted.can_transition_to(Submitted));
        assert!(!Resolved.can_transition_to(InProgress));
        assert!(!Rejected.can_transition_to(Resolved));
    }

    #[test]
    fn test_final_states() {
        assert!(IssueStatus::Resolved.is_final());
        assert!(IssueStatus::Rejected.is_final());
        assert!(!IssueStatus::Submitted.is_final());
        assert!(!IssueStatus::InProgress.is_final());
    }
}
