use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use records_core::lifecycle::Action;
use records_core::session::SessionToken;
use records_core::{DocumentRequest, NewDocumentRequest, WorkflowError};

/// A failed call to the external records service. `message` is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteFailure {
    pub message: String,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<RemoteFailure> for WorkflowError {
    fn from(failure: RemoteFailure) -> Self {
        WorkflowError::Remote(failure.message)
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteFailure>;

/// The external records service. Each call is one atomic remote operation that either
/// returns the record as the service now holds it, or fails with a message.
#[async_trait]
pub trait RequestGateway: Send + Sync {
    async fn list(&self, token: &SessionToken) -> RemoteResult<Vec<DocumentRequest>>;

    async fn get(&self, token: &SessionToken, id: Uuid) -> RemoteResult<DocumentRequest>;

    async fn create(&self, token: &SessionToken, request: NewDocumentRequest) -> RemoteResult<DocumentRequest>;

    /// The service re-checks the transition against its own copy; stale submissions fail here.
    async fn submit_transition(
        &self,
        token: &SessionToken,
        id: Uuid,
        action: Action,
    ) -> RemoteResult<DocumentRequest>;
}
