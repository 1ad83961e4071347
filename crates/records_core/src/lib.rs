pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod models;
pub mod receipt;
pub mod release;
pub mod session;
pub mod validation;

pub use error::{Result, WorkflowError};
pub use lifecycle::{Action, ActionKind, Effect, TransitionPlan};
pub use models::{DocumentRequest, InitiatedBy, NewDocumentRequest, RequestStatus, Role, StudentRef};

/// Human label for a status as the queue shows it.
pub fn status_label(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "Pending",
        RequestStatus::PaymentRequired => "Payment Required",
        RequestStatus::PaymentApproved => "Payment Approved",
        RequestStatus::Approved => "Approved",
        RequestStatus::Rejected => "Rejected",
        RequestStatus::ReadyForPickup => "Ready for Pick-up",
    }
}
