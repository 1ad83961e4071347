pub mod gateway;
pub mod memory;
pub mod requests;
pub mod transitions;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use records_core::session::{Session, SessionStore};
use records_core::validation::{intake_validator, ValidationEngine};
use records_core::{DocumentRequest, Result};
use tracing::info;
use uuid::Uuid;

use crate::gateway::RequestGateway;

pub use transitions::{Notice, NoticeLevel, TransitionOutcome};

/// Workflow front end for the records queue.
///
/// Owns the session, a cached copy of the request list, and the set of
/// requests with a submission in flight. The external service stays the
/// source of truth: the cache only changes from what the service returns.
pub struct RecordsService {
    gateway: Arc<dyn RequestGateway>,
    session: RwLock<SessionStore>,
    queue: Mutex<Vec<DocumentRequest>>,
    in_flight: Mutex<HashSet<Uuid>>,
    intake: ValidationEngine,
}

impl RecordsService {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            gateway,
            session: RwLock::new(SessionStore::new()),
            queue: Mutex::new(Vec::new()),
            in_flight: Mutex::new(HashSet::new()),
            intake: intake_validator(),
        }
    }

    pub fn login(&self, session: Session) {
        info!(user = %session.user_id, role = %session.role, "session started");
        let mut store = self.session.write().unwrap_or_else(|p| p.into_inner());
        store.login(session);
    }

    /// Ends the session and forgets everything fetched under it.
    pub fn logout(&self) -> Option<Session> {
        let ended = self.session.write().unwrap_or_else(|p| p.into_inner()).logout();
        self.queue_mut().clear();
        if let Some(session) = &ended {
            info!(user = %session.user_id, "session ended");
        }
        ended
    }

    /// A copy of the current session; fails with `NoSession` when logged out.
    pub fn session(&self) -> Result<Session> {
        let store = self.session.read().unwrap_or_else(|p| p.into_inner());
        store.current().cloned()
    }

    fn queue_mut(&self) -> MutexGuard<'_, Vec<DocumentRequest>> {
        self.queue.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn in_flight(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        self.in_flight.lock().unwrap_or_else(|p| p.into_inner())
    }
}
