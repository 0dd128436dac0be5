use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Pending,
    Approved,
}

impl ApprovalState {
    pub fn from_flag(approved: bool) -> Self {
        if approved {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }

    pub fn is_approved(self) -> bool {
        self == ApprovalState::Approved
    }
}

/// Approval columns after a review decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalChange {
    pub state: ApprovalState,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Pending → Approved stamps `now`; Approved → Pending clears the stamp.
/// Repeating the current state keeps the existing stamp.
pub fn transition(
    current: ApprovalState,
    current_at: Option<DateTime<Utc>>,
    requested: ApprovalState,
    now: DateTime<Utc>,
) -> ApprovalChange {
    let approved_at = match (current, requested) {
        (ApprovalState::Pending, ApprovalState::Approved) => Some(now),
        (ApprovalState::Approved, ApprovalState::Pending) => None,
        (ApprovalState::Approved, ApprovalState::Approved) => current_at.or(Some(now)),
        (ApprovalState::Pending, ApprovalState::Pending) => None,
    };

    ApprovalChange {
        state: requested,
        approved_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_initial_state_is_pending() {
        assert_eq!(ApprovalState::from_flag(false), ApprovalState::Pending);
        assert!(!ApprovalState::from_flag(false).is_approved());
    }

    #[test]
    fn test_approve_stamps_now() {
        let change = transition(ApprovalState::Pending, None, ApprovalState::Approved, t0());
        assert_eq!(change.state, ApprovalState::Approved);
        assert_eq!(change.approved_at, Some(t0()));
    }

    #[test]
    fn test_unapprove_clears_stamp() {
        let change = transition(
            ApprovalState::Approved,
            Some(t0()),
            ApprovalState::Pending,
            t0() + Duration::hours(1),
        );
        assert_eq!(change.state, ApprovalState::Pending);
        assert_eq!(change.approved_at, None);
    }

    #[test]
    fn test_reapprove_keeps_original_stamp() {
        let later = t0() + Duration::days(3);
        let change = transition(ApprovalState::Approved, Some(t0()), ApprovalState::Approved, later);
        assert_eq!(change.approved_at, Some(t0()));
    }

    #[test]
    fn test_pending_stays_unstamped() {
        let change = transition(ApprovalState::Pending, None, ApprovalState::Pending, t0());
        assert_eq!(change.approved_at, None);
    }
}
