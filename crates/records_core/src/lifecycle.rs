//! The request status state machine.
//!
//! Every status change a staff member can make is one row of [`TRANSITIONS`].
//! Callers ask [`available_actions`] what to show, [`plan`] before they send
//! anything to the external service, and [`apply`] only to build the record
//! the authoritative store ends up with.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, WorkflowError};
use crate::models::{DocumentRequest, RequestStatus, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SetAmount,
    ApprovePayment,
    Approve,
    Reject,
    Print,
    Reprint,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::SetAmount,
        ActionKind::ApprovePayment,
        ActionKind::Approve,
        ActionKind::Reject,
        ActionKind::Print,
        ActionKind::Reprint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SetAmount => "set amount",
            ActionKind::ApprovePayment => "approve payment",
            ActionKind::Approve => "approve",
            ActionKind::Reject => "reject",
            ActionKind::Print => "print",
            ActionKind::Reprint => "reprint",
        }
    }
}

/// An action together with the input it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SetAmount { amount: Decimal },
    ApprovePayment { receipt_number: String },
    Approve,
    Reject { note: String },
    Print,
    Reprint,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SetAmount { .. } => ActionKind::SetAmount,
            Action::ApprovePayment { .. } => ActionKind::ApprovePayment,
            Action::Approve => ActionKind::Approve,
            Action::Reject { .. } => ActionKind::Reject,
            Action::Print => ActionKind::Print,
            Action::Reprint => ActionKind::Reprint,
        }
    }
}

/// What the caller has to do once the external service acknowledges a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    RecordAmount,
    StampReceipt,
    StoreNote,
    SetPrintedAt,
    NotifyStudent,
    /// Open the document editing / print step for the request.
    OpenEditor,
    RefreshList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub action: ActionKind,
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub actors: &'static [Role],
    pub effects: &'static [Effect],
}

impl TransitionRule {
    pub fn permits(&self, role: Role) -> bool {
        self.actors.contains(&role)
    }
}

const CASHIERS: &[Role] = &[Role::Accounting, Role::Registrar];
const ACCOUNTING: &[Role] = &[Role::Accounting];
const RELEASING: &[Role] = &[Role::Registrar, Role::Admin];

pub static TRANSITIONS: [TransitionRule; 6] = [
    TransitionRule {
        action: ActionKind::SetAmount,
        from: RequestStatus::Pending,
        to: RequestStatus::PaymentRequired,
        actors: CASHIERS,
        effects: &[Effect::RecordAmount, Effect::RefreshList],
    },
    TransitionRule {
        action: ActionKind::ApprovePayment,
        from: RequestStatus::PaymentRequired,
        to: RequestStatus::PaymentApproved,
        actors: ACCOUNTING,
        effects: &[Effect::StampReceipt, Effect::NotifyStudent, Effect::RefreshList],
    },
    TransitionRule {
        action: ActionKind::Approve,
        from: RequestStatus::PaymentApproved,
        to: RequestStatus::Approved,
        actors: RELEASING,
        effects: &[Effect::OpenEditor, Effect::RefreshList],
    },
    TransitionRule {
        action: ActionKind::Reject,
        from: RequestStatus::PaymentApproved,
        to: RequestStatus::Rejected,
        actors: RELEASING,
        effects: &[Effect::StoreNote, Effect::NotifyStudent, Effect::RefreshList],
    },
    TransitionRule {
        action: ActionKind::Print,
        from: RequestStatus::Approved,
        to: RequestStatus::ReadyForPickup,
        actors: RELEASING,
        effects: &[Effect::SetPrintedAt, Effect::NotifyStudent, Effect::RefreshList],
    },
    TransitionRule {
        action: ActionKind::Reprint,
        from: RequestStatus::ReadyForPickup,
        to: RequestStatus::ReadyForPickup,
        actors: RELEASING,
        effects: &[Effect::OpenEditor, Effect::RefreshList],
    },
];

pub fn rule_for(action: ActionKind) -> &'static TransitionRule {
    // Every ActionKind has exactly one row.
    match action {
        ActionKind::SetAmount => &TRANSITIONS[0],
        ActionKind::ApprovePayment => &TRANSITIONS[1],
        ActionKind::Approve => &TRANSITIONS[2],
        ActionKind::Reject => &TRANSITIONS[3],
        ActionKind::Print => &TRANSITIONS[4],
        ActionKind::Reprint => &TRANSITIONS[5],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionAvailability {
    pub action: ActionKind,
    pub target: RequestStatus,
    /// False when the control is shown but the role may not use it.
    pub enabled: bool,
}

/// Actions that leave `status`, as a staff member with `role` should see them.
///
/// Students get nothing: the queue views are staff-only.
pub fn available_actions(status: RequestStatus, role: Role) -> Vec<ActionAvailability> {
    if !role.is_staff() {
        return Vec::new();
    }

    TRANSITIONS
        .iter()
        .filter(|rule| rule.from == status)
        .map(|rule| ActionAvailability {
            action: rule.action,
            target: rule.to,
            enabled: rule.permits(role),
        })
        .collect()
}

/// A checked, not yet executed, transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionPlan {
    pub request_id: Uuid,
    pub action: Action,
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub effects: Vec<Effect>,
    /// Prompt the caller shows before submitting.
    pub confirmation: String,
}

/// Checks source state, role and input for `action` on `request`. Does not mutate.
pub fn plan(request: &DocumentRequest, role: Role, action: Action) -> Result<TransitionPlan> {
    let rule = rule_for(action.kind());

    if request.status != rule.from {
        return Err(WorkflowError::Precondition {
            required: rule.from,
            actual: request.status,
            action: rule.action.as_str(),
        });
    }

    if !rule.permits(role) {
        return Err(WorkflowError::Unauthorized {
            role,
            action: rule.action.as_str(),
        });
    }

    let action = validate_input(request, action)?;
    let confirmation = confirmation_for(request, &action);

    Ok(TransitionPlan {
        request_id: request.id,
        action,
        from: rule.from,
        to: rule.to,
        effects: rule.effects.to_vec(),
        confirmation,
    })
}

// Normalises free text on the way through so the stored values are trimmed.
fn validate_input(request: &DocumentRequest, action: Action) -> Result<Action> {
    match action {
        Action::SetAmount { amount } => {
            if amount < Decimal::ZERO {
                return Err(WorkflowError::Validation(format!(
                    "amount must not be negative (got {})",
                    amount
                )));
            }
            Ok(Action::SetAmount { amount })
        }
        Action::ApprovePayment { receipt_number } => {
            match request.amount {
                Some(amount) if amount >= Decimal::ZERO => {}
                _ => {
                    return Err(WorkflowError::Validation(
                        "amount must be set before the payment can be approved".to_string(),
                    ))
                }
            }
            let receipt_number = receipt_number.trim();
            if receipt_number.is_empty() {
                return Err(WorkflowError::Validation("a receipt number is required".to_string()));
            }
            Ok(Action::ApprovePayment {
                receipt_number: receipt_number.to_string(),
            })
        }
        Action::Reject { note } => {
            let note = note.trim();
            if note.is_empty() {
                return Err(WorkflowError::Validation("a rejection note is required".to_string()));
            }
            Ok(Action::Reject { note: note.to_string() })
        }
        other => Ok(other),
    }
}

fn confirmation_for(request: &DocumentRequest, action: &Action) -> String {
    let who = request.student.full_name();
    match action {
        Action::SetAmount { amount } => {
            format!("Charge {} for {}'s {}?", amount, who, request.document_type)
        }
        Action::ApprovePayment { receipt_number } => {
            format!("Confirm payment from {} under receipt {}?", who, receipt_number)
        }
        Action::Approve => format!("Approve {}'s {} request?", who, request.document_type),
        Action::Reject { .. } => format!("Reject {}'s {} request?", who, request.document_type),
        Action::Print => format!("Mark {}'s {} as printed and ready for pick-up?", who, request.document_type),
        Action::Reprint => format!("Reprint {}'s {}?", who, request.document_type),
    }
}

/// The record after `plan` has taken effect at `now`.
///
/// Reprint leaves the record as it was, `printedAt` included.
pub fn apply(request: &DocumentRequest, plan: &TransitionPlan, now: DateTime<Utc>) -> DocumentRequest {
    let mut next = request.clone();

    match &plan.action {
        Action::SetAmount { amount } => next.amount = Some(*amount),
        Action::ApprovePayment { receipt_number } => next.receipt_number = Some(receipt_number.clone()),
        Action::Approve => {}
        Action::Reject { note } => next.notes = Some(note.clone()),
        Action::Print => next.printed_at = Some(now),
        Action::Reprint => return next,
    }

    next.status = plan.to;
    next.updated_at = now;
    next
}

/// `plan` followed by `apply`.
pub fn transition(
    request: &DocumentRequest,
    role: Role,
    action: Action,
    now: DateTime<Utc>,
) -> Result<DocumentRequest> {
    let plan = plan(request, role, action)?;
    Ok(apply(request, &plan, now))
}
