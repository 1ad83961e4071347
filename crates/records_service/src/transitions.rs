use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use records_core::lifecycle::{self, Action, Effect, TransitionPlan};
use records_core::{DocumentRequest, Result, WorkflowError};

use crate::RecordsService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn from_error(error: &WorkflowError) -> Self {
        let level = if error.is_local() { NoticeLevel::Warning } else { NoticeLevel::Error };
        Self { level, message: error.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    /// The record as the service returned it.
    pub request: DocumentRequest,
    pub plan: TransitionPlan,
    pub notice: Notice,
    /// False if the post-mutation list reload failed; the record above is still current.
    pub refreshed: bool,
}

impl TransitionOutcome {
    pub fn opens_editor(&self) -> bool {
        self.plan.effects.contains(&Effect::OpenEditor)
    }
}

// Marks a request busy for as long as it lives.
struct PendingGuard<'a> {
    service: &'a RecordsService,
    id: Uuid,
}

impl<'a> PendingGuard<'a> {
    fn acquire(service: &'a RecordsService, id: Uuid) -> Result<Self> {
        if !service.in_flight().insert(id) {
            return Err(WorkflowError::SubmissionPending(id));
        }
        Ok(Self { service, id })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.service.in_flight().remove(&self.id);
    }
}

impl RecordsService {
    /// True while a transition for `id` is waiting on the service.
    pub fn is_pending(&self, id: Uuid) -> bool {
        self.in_flight().contains(&id)
    }

    /// Checks the transition locally without sending anything.
    pub fn preview(&self, id: Uuid, action: Action) -> Result<TransitionPlan> {
        let session = self.session()?;
        let request = self.cached(id)?;
        lifecycle::plan(&request, session.role, action)
    }

    /// Runs `action` on request `id`.
    ///
    /// Precondition, role and input errors come back before anything is sent.
    /// The cached record only changes after the service acknowledges the
    /// transition, and the list is reloaded in full afterwards.
    pub async fn perform(&self, id: Uuid, action: Action) -> Result<TransitionOutcome> {
        let session = self.session()?;
        let request = self.cached(id)?;

        let plan = lifecycle::plan(&request, session.role, action).map_err(|e| {
            warn!(request_id = %id, error = %e, "transition blocked locally");
            e
        })?;

        let _guard = PendingGuard::acquire(self, id)?;

        info!(
            request_id = %id,
            action = plan.action.kind().as_str(),
            from = %plan.from,
            to = %plan.to,
            "submitting transition"
        );

        let updated = self
            .gateway
            .submit_transition(&session.token, id, plan.action.clone())
            .await
            .map_err(|failure| {
                warn!(request_id = %id, error = %failure, "transition refused by records service");
                WorkflowError::from(failure)
            })?;

        self.replace_cached(updated.clone());

        let refreshed = match self.refresh().await {
            Ok(_) => true,
            Err(e) => {
                warn!(request_id = %id, error = %e, "list refresh after transition failed");
                false
            }
        };

        let notice = Notice {
            level: NoticeLevel::Success,
            message: success_message(&updated, &plan),
        };

        Ok(TransitionOutcome {
            request: updated,
            plan,
            notice,
            refreshed,
        })
    }
}

fn success_message(request: &DocumentRequest, plan: &TransitionPlan) -> String {
    let who = request.student.full_name();
    match &plan.action {
        Action::SetAmount { amount } => format!("Amount of {} recorded for {}.", amount, who),
        Action::ApprovePayment { receipt_number } => {
            format!("Payment approved under receipt {}. {} has been notified.", receipt_number, who)
        }
        Action::Approve => format!("{}'s {} request approved.", who, request.document_type),
        Action::Reject { .. } => format!("{}'s request rejected. The student has been notified.", who),
        Action::Print => format!("{} is ready for pick-up. {} has been notified.", request.document_type, who),
        Action::Reprint => format!("Reprinting {} for {}.", request.document_type, who),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryGateway;
    use crate::testing::*;
    use records_core::{RequestStatus, Role};
    use rust_decimal::Decimal;
    use std::time::Duration;

    #[tokio::test]
    async fn test_set_amount_scenario() {
        let pending = request("Maria", "Santos", RequestStatus::Pending);
        let id = pending.id;
        let (service, gateway) = service_with(Role::Accounting, vec![pending], InMemoryGateway::new()).await;

        let outcome = service
            .perform(id, Action::SetAmount { amount: Decimal::new(500, 0) })
            .await
            .unwrap();

        assert_eq!(outcome.request.status, RequestStatus::PaymentRequired);
        assert_eq!(outcome.request.amount, Some(Decimal::new(500, 0)));
        assert_eq!(outcome.notice.level, NoticeLevel::Success);
        assert!(outcome.refreshed);
        assert_eq!(service.cached(id).unwrap().status, RequestStatus::PaymentRequired);
        assert_eq!(gateway.snapshot()[0].status, RequestStatus::PaymentRequired);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_acknowledged_record() {
        let pending = request("Maria", "Santos", RequestStatus::Pending);
        let id = pending.id;
        let (service, gateway) = service_with(Role::Accounting, vec![pending], InMemoryGateway::new()).await;

        // The transition goes through; the list reload right after it does not.
        gateway.fail_after(1, "Records service is under maintenance");
        let outcome = service
            .perform(id, Action::SetAmount { amount: Decimal::new(500, 0) })
            .await
            .unwrap();

        assert!(!outcome.refreshed);
        assert_eq!(outcome.notice.level, NoticeLevel::Success);
        assert_eq!(outcome.request.status, RequestStatus::PaymentRequired);
        assert_eq!(service.cached(id).unwrap().status, RequestStatus::PaymentRequired);
        assert_eq!(gateway.snapshot()[0].status, RequestStatus::PaymentRequired);
        assert!(!service.is_pending(id));
    }

    #[tokio::test]
    async fn test_print_stamps_action_time() {
        let approved = request("Maria", "Santos", RequestStatus::Approved);
        let id = approved.id;
        let gateway = InMemoryGateway::new().with_clock(|| at(15));
        let (service, _) = service_with(Role::Registrar, vec![approved], gateway).await;

        let outcome = service.perform(id, Action::Print).await.unwrap();

        assert_eq!(outcome.request.status, RequestStatus::ReadyForPickup);
        assert_eq!(outcome.request.printed_at, Some(at(15)));
        assert_eq!(service.release_date_of(id).unwrap(), "2024-03-04");
    }

    #[tokio::test]
    async fn test_approve_opens_editor() {
        let mut paid = request("Maria", "Santos", RequestStatus::PaymentApproved);
        paid.amount = Some(Decimal::new(500, 0));
        let id = paid.id;
        let (service, _) = service_with(Role::Admin, vec![paid], InMemoryGateway::new()).await;

        let outcome = service.perform(id, Action::Approve).await.unwrap();
        assert_eq!(outcome.request.status, RequestStatus::Approved);
        assert!(outcome.opens_editor());
    }

    #[tokio::test]
    async fn test_local_errors_never_reach_the_service() {
        let paid = request("Maria", "Santos", RequestStatus::PaymentApproved);
        let id = paid.id;
        let (service, gateway) = service_with(Role::Registrar, vec![paid], InMemoryGateway::new()).await;

        // Anything that reaches the gateway would consume this failure.
        gateway.fail_next("should not be called");

        let err = service.perform(id, Action::Reject { note: String::new() }).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(Notice::from_error(&err).level, NoticeLevel::Warning);

        let err = service.perform(id, Action::Print).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Precondition { .. }));

        assert_eq!(service.cached(id).unwrap().status, RequestStatus::PaymentApproved);

        // The injected failure is still armed.
        assert!(service.refresh().await.is_err());
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_cache_untouched() {
        let paid = request("Maria", "Santos", RequestStatus::PaymentApproved);
        let id = paid.id;
        let (service, gateway) = service_with(Role::Registrar, vec![paid], InMemoryGateway::new()).await;

        gateway.fail_next("Records service is under maintenance");
        let err = service
            .perform(id, Action::Reject { note: "missing form".to_string() })
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::Remote("Records service is under maintenance".to_string()));
        assert_eq!(Notice::from_error(&err).message, "Records service is under maintenance");
        let cached = service.cached(id).unwrap();
        assert_eq!(cached.status, RequestStatus::PaymentApproved);
        assert!(cached.notes.is_none());
        assert!(!service.is_pending(id));

        let outcome = service
            .perform(id, Action::Reject { note: "missing form".to_string() })
            .await
            .unwrap();
        assert_eq!(outcome.request.status, RequestStatus::Rejected);
        assert_eq!(outcome.request.notes.as_deref(), Some("missing form"));
    }

    #[tokio::test]
    async fn test_stale_transition_is_refused_by_the_service() {
        let paid = request("Maria", "Santos", RequestStatus::PaymentApproved);
        let id = paid.id;
        let (first, gateway) = service_with(Role::Registrar, vec![paid], InMemoryGateway::new()).await;

        // A second staff member loaded the same list before the first one acted.
        let second = RecordsService::new(gateway.clone());
        second.login(session(Role::Admin));
        second.refresh().await.unwrap();

        first.perform(id, Action::Approve).await.unwrap();

        let err = second
            .perform(id, Action::Reject { note: "duplicate".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Remote(ref m) if m.contains("must be in state payment_approved")));
    }

    #[tokio::test]
    async fn test_double_submit_is_blocked_while_pending() {
        let approved = request("Maria", "Santos", RequestStatus::Approved);
        let id = approved.id;
        let gateway = InMemoryGateway::new().with_latency(Duration::from_millis(50));
        let (service, _) = service_with(Role::Registrar, vec![approved], gateway).await;

        let (first, second) = tokio::join!(
            service.perform(id, Action::Print),
            async {
                tokio::task::yield_now().await;
                let busy = service.is_pending(id);
                let disabled = service.actions_for(id).unwrap().iter().all(|a| !a.enabled);
                (busy, disabled, service.perform(id, Action::Print).await)
            }
        );

        assert_eq!(first.unwrap().request.status, RequestStatus::ReadyForPickup);
        let (busy, disabled, second) = second;
        assert!(busy);
        assert!(disabled);
        assert_eq!(second.unwrap_err(), WorkflowError::SubmissionPending(id));
        assert!(!service.is_pending(id));
    }
}
