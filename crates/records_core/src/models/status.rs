use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorkflowError;

// ---------------------------------------------------------------------------
// Request status
// The wire strings are shared with the external service and must match exactly.
// `ready for pick-up` keeps its space-separated spelling.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "payment_required")]
    PaymentRequired,
    #[serde(rename = "payment_approved")]
    PaymentApproved,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "ready for pick-up")]
    ReadyForPickup,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        RequestStatus::Pending,
        RequestStatus::PaymentRequired,
        RequestStatus::PaymentApproved,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::ReadyForPickup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::PaymentRequired => "payment_required",
            RequestStatus::PaymentApproved => "payment_approved",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::ReadyForPickup => "ready for pick-up",
        }
    }

    /// Rejected and released requests are kept for history but accept no further status change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::ReadyForPickup)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Operators type the underscore form on the command line; accept it for pick-up too.
        match s.trim() {
            "ready_for_pickup" => Ok(RequestStatus::ReadyForPickup),
            other => RequestStatus::ALL
                .into_iter()
                .find(|status| status.as_str() == other)
                .ok_or_else(|| WorkflowError::Validation(format!("unknown request status '{}'", s))),
        }
    }
}

// ---------------------------------------------------------------------------
// Actor role, supplied by the session. Never derived from the request.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accounting,
    Registrar,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accounting => "accounting",
            Role::Registrar => "registrar",
            Role::Student => "student",
        }
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Student)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "accounting" => Ok(Role::Accounting),
            "registrar" => Ok(Role::Registrar),
            "student" => Ok(Role::Student),
            _ => Err(WorkflowError::Validation(format!("unknown role '{}'", s))),
        }
    }
}

/// Who opened the request. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitiatedBy {
    Student,
    Registrar,
}

impl InitiatedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitiatedBy::Student => "student",
            InitiatedBy::Registrar => "registrar",
        }
    }
}

impl fmt::Display for InitiatedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        let json = serde_json::to_string(&RequestStatus::ReadyForPickup).unwrap();
        assert_eq!(json, "\"ready for pick-up\"");

        let parsed: RequestStatus = serde_json::from_str("\"payment_required\"").unwrap();
        assert_eq!(parsed, RequestStatus::PaymentRequired);

        // The underscore spelling is not a wire value.
        assert!(serde_json::from_str::<RequestStatus>("\"ready_for_pickup\"").is_err());
    }

    #[test]
    fn test_status_from_str_accepts_cli_spelling() {
        assert_eq!("ready_for_pickup".parse::<RequestStatus>().unwrap(), RequestStatus::ReadyForPickup);
        assert_eq!("ready for pick-up".parse::<RequestStatus>().unwrap(), RequestStatus::ReadyForPickup);
        assert!("shipped".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Accounting".parse::<Role>().unwrap(), Role::Accounting);
        assert!("janitor".parse::<Role>().is_err());
        assert!(!Role::Student.is_staff());
    }
}
