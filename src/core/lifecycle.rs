use thiserror::Error;
use crate::models::RequestStatus;

/// What a donor can do with a request addressed to them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Accept,
    Reject,
}

impl RequestAction {
    pub fn target_status(self) -> RequestStatus {
        match self {
            RequestAction::Accept => RequestStatus::Accepted,
            RequestAction::Reject => RequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("request has already been {0}")]
    AlreadyResolved(RequestStatus),
}

impl RequestStatus {
    /// Accepted and rejected requests never change again
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Apply a donor action, returning the new status
    ///
    /// Only `pending` requests can move. Repeating an action on a resolved
    /// request is an error rather than a no-op.
    pub fn apply(self, action: RequestAction) -> Result<RequestStatus, LifecycleError> {
        match self {
            RequestStatus::Pending => Ok(action.target_status()),
            resolved => Err(LifecycleError::AlreadyResolved(resolved)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert_eq!(
            RequestStatus::Pending.apply(RequestAction::Accept),
            Ok(RequestStatus::Accepted)
        );
        assert_eq!(
            RequestStatus::Pending.apply(RequestAction::Reject),
            Ok(RequestStatus::Rejected)
        );
    }

    #[test]
    fn test_terminal_states_reject_actions() {
        for status in [RequestStatus::Accepted, RequestStatus::Rejected] {
            assert!(status.is_terminal());
            for action in [RequestAction::Accept, RequestAction::Reject] {
                assert_eq!(status.apply(action), Err(LifecycleError::AlreadyResolved(status)));
            }
        }
    }

    #[test]
    fn test_error_message() {
        let err = RequestStatus::Accepted.apply(RequestAction::Accept).unwrap_err();
        assert_eq!(err.to_string(), "request has already been accepted");
    }
}
