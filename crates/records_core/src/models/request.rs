use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::status::{InitiatedBy, RequestStatus};

// ---------------------------------------------------------------------------
// Student snapshot
// Owned by the student registry; a request only keeps a read-only copy.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
}

impl StudentRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ---------------------------------------------------------------------------
// Document request
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub id: Uuid,

    #[serde(rename = "studentRef")]
    pub student: StudentRef,

    pub document_type: String,
    pub purpose: String,

    // Required from payment_required onwards.
    #[serde(default)]
    pub amount: Option<Decimal>,

    pub status: RequestStatus,
    pub initiated_by: InitiatedBy,

    #[serde(default)]
    pub file_path: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Only ever set by the print transition.
    #[serde(default)]
    pub printed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub receipt_number: Option<String>,
}

impl DocumentRequest {
    /// Opens a new request in the `pending` state.
    pub fn open(new: NewDocumentRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            student: new.student,
            document_type: new.document_type.trim().to_string(),
            purpose: new.purpose.trim().to_string(),
            amount: None,
            status: RequestStatus::Pending,
            initiated_by: new.initiated_by,
            file_path: new.file_path,
            created_at: now,
            updated_at: now,
            printed_at: None,
            notes: None,
            receipt_number: None,
        }
    }

    /// The text the queue search runs against: name, id number, document type and wire status.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.student.first_name,
            self.student.last_name,
            self.student.id_number,
            self.document_type,
            self.status.as_str()
        )
    }
}

/// Intake payload for a new request, before it has an id or a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocumentRequest {
    #[serde(rename = "studentRef")]
    pub student: StudentRef,
    pub document_type: String,
    pub purpose: String,
    pub initiated_by: InitiatedBy,
    #[serde(default)]
    pub file_path: Vec<String>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_open_starts_pending() {
        let request = request_in(RequestStatus::Pending);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.created_at, request.updated_at);
        assert!(request.amount.is_none());
        assert!(request.printed_at.is_none());
    }

    #[test]
    fn test_parse_backend_record() {
        let json = r#"{
            "id": "6f1c9f8e-3a52-4b8e-9d0a-1b2c3d4e5f60",
            "studentRef": { "idNumber": "2020-11111", "firstName": "Jose", "lastName": "Rizal" },
            "documentType": "Certificate",
            "purpose": "Employment",
            "amount": "150.00",
            "status": "ready for pick-up",
            "initiatedBy": "registrar",
            "filePath": ["uploads/a.pdf", "uploads/b.pdf"],
            "createdAt": "2024-03-01T08:00:00Z",
            "updatedAt": "2024-03-02T09:30:00Z",
            "printedAt": "2024-03-02T09:30:00Z"
        }"#;

        let request: DocumentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, RequestStatus::ReadyForPickup);
        assert_eq!(request.initiated_by, InitiatedBy::Registrar);
        assert_eq!(request.amount, Some(Decimal::new(15000, 2)));
        assert_eq!(request.file_path, vec!["uploads/a.pdf", "uploads/b.pdf"]);
        assert!(request.notes.is_none());
        assert_eq!(request.student.full_name(), "Jose Rizal");
    }
}
