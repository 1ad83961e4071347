use tracing::{info, warn};
use uuid::Uuid;

use records_core::filter::filter_requests;
use records_core::lifecycle::{available_actions, ActionAvailability};
use records_core::release::release_date_label;
use records_core::validation::{Intake, ValidationIssue};
use records_core::{DocumentRequest, NewDocumentRequest, Result, WorkflowError};

use crate::RecordsService;

impl RecordsService {
    /// Re-fetches the whole list and replaces the cache. Returns the number of requests.
    pub async fn refresh(&self) -> Result<usize> {
        let session = self.session()?;

        let requests = self.gateway.list(&session.token).await.map_err(|failure| {
            warn!(error = %failure, "request list refresh failed");
            WorkflowError::from(failure)
        })?;

        let count = requests.len();
        *self.queue_mut() = requests;
        Ok(count)
    }

    /// The cached queue narrowed by `query`, in list order.
    pub fn queue(&self, query: &str) -> Vec<DocumentRequest> {
        let queue = self.queue_mut();
        filter_requests(&queue, query).into_iter().cloned().collect()
    }

    pub fn cached(&self, id: Uuid) -> Result<DocumentRequest> {
        self.queue_mut()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(WorkflowError::NotFound(id))
    }

    /// Fetches one request from the service and updates it in the cache.
    pub async fn reload(&self, id: Uuid) -> Result<DocumentRequest> {
        let session = self.session()?;
        let request = self.gateway.get(&session.token, id).await?;
        self.replace_cached(request.clone());
        Ok(request)
    }

    /// What the current role can do with request `id`. Everything is disabled
    /// while a submission for that request is still in flight.
    pub fn actions_for(&self, id: Uuid) -> Result<Vec<ActionAvailability>> {
        let session = self.session()?;
        let request = self.cached(id)?;
        let busy = self.is_pending(id);

        Ok(available_actions(request.status, session.role)
            .into_iter()
            .map(|mut availability| {
                availability.enabled &= !busy;
                availability
            })
            .collect())
    }

    pub fn release_date_of(&self, id: Uuid) -> Result<String> {
        self.cached(id).map(|request| release_date_label(&request))
    }

    /// Validates and submits a new request, then reloads the list.
    /// Returns the created record and any non-blocking warnings.
    pub async fn create(&self, request: NewDocumentRequest) -> Result<(DocumentRequest, Vec<ValidationIssue>)> {
        let session = self.session()?;
        let warnings = self.intake.enforce(&Intake { request: &request, role: session.role })?;

        let created = self.gateway.create(&session.token, request).await.map_err(|failure| {
            warn!(error = %failure, "request creation failed");
            WorkflowError::from(failure)
        })?;
        info!(request_id = %created.id, document_type = %created.document_type, "request created");

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "list refresh after create failed");
            self.queue_mut().push(created.clone());
        }
        Ok((created, warnings))
    }

    pub(crate) fn replace_cached(&self, request: DocumentRequest) {
        let mut queue = self.queue_mut();
        match queue.iter_mut().find(|r| r.id == request.id) {
            Some(slot) => *slot = request,
            None => queue.push(request),
        }
    }
}
