//! Blog status state machine.
//!
//! Pure decision logic: given the current status and a requested one, decide
//! whether anything should be written. The store applies the result with a
//! compare-and-set on `from`.

use chrono::{DateTime, Utc};

use super::errors::BlogError;
use super::models::BlogStatus;
use crate::common::utils::non_blank;

/// Column values for an applied status change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Status the row must still be in for the update to apply
    pub from: BlogStatus,
    pub to: BlogStatus,
    pub rejection_reason: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Apply(StatusUpdate),
    /// Already in the requested status
    Unchanged,
}

/// Decide a status change.
///
/// | from     | to       | result                             |
/// |----------|----------|------------------------------------|
/// | PENDING  | APPROVED | publish now, clear reason          |
/// | PENDING  | REJECTED | needs a non-blank reason           |
/// | X        | X        | unchanged                          |
/// | other    | other    | `InvalidTransition`                |
///
/// A blank reason on a reject request is a validation error whatever the
/// current status is.
pub fn plan_transition(
    current: BlogStatus,
    target: BlogStatus,
    reason: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Transition, BlogError> {
    let reason = non_blank(reason).map(str::to_string);

    if target == BlogStatus::Rejected && reason.is_none() {
        return Err(BlogError::Validation(
            "Rejection reason is required".to_string(),
        ));
    }

    if current == target {
        return Ok(Transition::Unchanged);
    }

    match (current, target) {
        (BlogStatus::Pending, BlogStatus::Approved) => Ok(Transition::Apply(StatusUpdate {
            from: current,
            to: target,
            rejection_reason: None,
            published_at: Some(now),
        })),
        (BlogStatus::Pending, BlogStatus::Rejected) => Ok(Transition::Apply(StatusUpdate {
            from: current,
            to: target,
            rejection_reason: reason,
            published_at: None,
        })),
        (from, to) => Err(BlogError::InvalidTransition { from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_pending_publishes() {
        let now = Utc::now();
        let result = plan_transition(BlogStatus::Pending, BlogStatus::Approved, None, now).unwrap();

        assert_eq!(
            result,
            Transition::Apply(StatusUpdate {
                from: BlogStatus::Pending,
                to: BlogStatus::Approved,
                rejection_reason: None,
                published_at: Some(now),
            })
        );
    }

    #[test]
    fn test_approve_ignores_stray_reason() {
        let result = plan_transition(
            BlogStatus::Pending,
            BlogStatus::Approved,
            Some("leftover"),
            Utc::now(),
        )
        .unwrap();

        match result {
            Transition::Apply(update) => assert!(update.rejection_reason.is_none()),
            Transition::Unchanged => panic!("expected an applied transition"),
        }
    }

    #[test]
    fn test_reject_pending_keeps_reason() {
        let result = plan_transition(
            BlogStatus::Pending,
            BlogStatus::Rejected,
            Some("  off-topic "),
            Utc::now(),
        )
        .unwrap();

        match result {
            Transition::Apply(update) => {
                assert_eq!(update.to, BlogStatus::Rejected);
                assert_eq!(update.rejection_reason.as_deref(), Some("off-topic"));
                assert!(update.published_at.is_none());
            }
            Transition::Unchanged => panic!("expected an applied transition"),
        }
    }

    #[test]
    fn test_reject_requires_reason() {
        for reason in [None, Some(""), Some("   ")] {
            let err = plan_transition(BlogStatus::Pending, BlogStatus::Rejected, reason, Utc::now())
                .unwrap_err();
            assert!(matches!(err, BlogError::Validation(_)));
        }
    }

    #[test]
    fn test_reason_checked_before_table() {
        let err = plan_transition(BlogStatus::Approved, BlogStatus::Rejected, None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));
    }

    #[test]
    fn test_same_status_is_unchanged() {
        assert_eq!(
            plan_transition(BlogStatus::Approved, BlogStatus::Approved, None, Utc::now()).unwrap(),
            Transition::Unchanged
        );
        assert_eq!(
            plan_transition(BlogStatus::Pending, BlogStatus::Pending, None, Utc::now()).unwrap(),
            Transition::Unchanged
        );
        assert_eq!(
            plan_transition(BlogStatus::Rejected, BlogStatus::Rejected, Some("again"), Utc::now())
                .unwrap(),
            Transition::Unchanged
        );
    }

    #[test]
    fn test_terminal_states_cannot_move() {
        let cases = [
            (BlogStatus::Rejected, BlogStatus::Approved, None),
            (BlogStatus::Approved, BlogStatus::Rejected, Some("late")),
            (BlogStatus::Approved, BlogStatus::Pending, None),
            (BlogStatus::Rejected, BlogStatus::Pending, None),
        ];

        for (from, to, reason) in cases {
            let err = plan_transition(from, to, reason, Utc::now()).unwrap_err();
            assert!(
                matches!(err, BlogError::InvalidTransition { from: f, to: t } if f == from && t == to),
                "{} -> {} should be rejected",
                from,
                to
            );
        }
    }
}
