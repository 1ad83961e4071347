use thiserror::Error;
use uuid::Uuid;

use crate::models::status::{RequestStatus, Role};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The request is not in the source state the action requires.
    #[error("request must be in state {required} before {action}")]
    Precondition {
        required: RequestStatus,
        actual: RequestStatus,
        action: &'static str,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    /// The external service refused or failed the call. The message is shown to the user verbatim.
    #[error("{0}")]
    Remote(String),

    #[error("role {role} may not {action}")]
    Unauthorized { role: Role, action: &'static str },

    #[error("a submission for request {0} is already in progress")]
    SubmissionPending(Uuid),

    #[error("Request not found: {0}")]
    NotFound(Uuid),

    #[error("no active session")]
    NoSession,
}

impl WorkflowError {
    /// True for errors raised locally, before anything is sent to the external service.
    pub fn is_local(&self) -> bool {
        !matches!(self, WorkflowError::Remote(_))
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
