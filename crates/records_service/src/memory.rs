use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use records_core::lifecycle::{self, Action};
use records_core::session::{Session, SessionToken};
use records_core::validation::{intake_validator, Intake};
use records_core::{DocumentRequest, NewDocumentRequest, Role};

use crate::gateway::{RemoteFailure, RemoteResult, RequestGateway};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Default)]
struct StoreState {
    requests: Vec<DocumentRequest>,
    sessions: HashMap<String, Role>,
    // Calls to let through before failing, and the failure message.
    fail_after: Option<(usize, String)>,
}

/// An in-process stand-in for the records service.
///
/// Applies the same transition table the service enforces, so a stale or
/// out-of-order submission fails here exactly as it would remotely.
pub struct InMemoryGateway {
    state: Mutex<StoreState>,
    clock: Clock,
    latency: Option<Duration>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock: Box::new(Utc::now),
            latency: None,
        }
    }

    pub fn with_requests(requests: Vec<DocumentRequest>) -> Self {
        let gateway = Self::new();
        gateway.lock().requests = requests;
        gateway
    }

    pub fn seed(&self, request: DocumentRequest) {
        self.lock().requests.push(request);
    }

    /// Swaps in a fresh copy of the records. Sessions and armed failures are kept.
    pub fn replace_all(&self, requests: Vec<DocumentRequest>) {
        self.lock().requests = requests;
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Every call waits this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Accepts `session`'s token from now on.
    pub fn register_session(&self, session: &Session) {
        self.lock()
            .sessions
            .insert(session.token.expose().to_string(), session.role);
    }

    /// The next call fails with `message` and changes nothing.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.fail_after(0, message);
    }

    /// Lets `calls` calls through, then fails the one after with `message`.
    pub fn fail_after(&self, calls: usize, message: impl Into<String>) {
        self.lock().fail_after = Some((calls, message.into()));
    }

    pub fn snapshot(&self) -> Vec<DocumentRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // A poisoned lock only means another test thread panicked mid-call; the data is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn round_trip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn authorize(state: &mut StoreState, token: &SessionToken) -> RemoteResult<Role> {
        match state.fail_after.take() {
            Some((0, message)) => return Err(RemoteFailure::new(message)),
            Some((calls, message)) => state.fail_after = Some((calls - 1, message)),
            None => {}
        }
        state
            .sessions
            .get(token.expose())
            .copied()
            .ok_or_else(|| RemoteFailure::new("Your session has expired. Please log in again."))
    }
}

#[async_trait]
impl RequestGateway for InMemoryGateway {
    async fn list(&self, token: &SessionToken) -> RemoteResult<Vec<DocumentRequest>> {
        self.round_trip().await;
        let mut state = self.lock();
        let role = Self::authorize(&mut state, token)?;

        debug!(role = %role, count = state.requests.len(), "list requests");
        Ok(state.requests.clone())
    }

    async fn get(&self, token: &SessionToken, id: Uuid) -> RemoteResult<DocumentRequest> {
        self.round_trip().await;
        let mut state = self.lock();
        Self::authorize(&mut state, token)?;

        state
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| RemoteFailure::new(format!("Request {} not found", id)))
    }

    async fn create(&self, token: &SessionToken, request: NewDocumentRequest) -> RemoteResult<DocumentRequest> {
        self.round_trip().await;
        let mut state = self.lock();
        let role = Self::authorize(&mut state, token)?;

        intake_validator()
            .enforce(&Intake { request: &request, role })
            .map_err(|e| RemoteFailure::new(e.to_string()))?;

        let created = DocumentRequest::open(request, (self.clock)());
        state.requests.push(created.clone());
        Ok(created)
    }

    async fn submit_transition(
        &self,
        token: &SessionToken,
        id: Uuid,
        action: Action,
    ) -> RemoteResult<DocumentRequest> {
        self.round_trip().await;
        let mut state = self.lock();
        let role = Self::authorize(&mut state, token)?;

        let slot = state
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RemoteFailure::new(format!("Request {} not found", id)))?;

        let updated = lifecycle::transition(slot, role, action, (self.clock)())
            .map_err(|e| RemoteFailure::new(e.to_string()))?;
        *slot = updated.clone();
        Ok(updated)
    }
}
