use crate::models::{InitiatedBy, Role};
use crate::validation::{Intake, Severity, ValidationIssue, ValidationRule};

fn error(code: &str, field: &str, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        code: code.to_string(),
        severity: Severity::Error,
        message: message.into(),
        field: Some(field.to_string()),
    }
}

// =========================================================================
// RULE: REQ-001
// "Document type is required"
// =========================================================================
pub struct RequireDocumentType;

impl ValidationRule for RequireDocumentType {
    fn rule_id(&self) -> &'static str { "REQ-001" }

    fn check(&self, intake: &Intake<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if intake.request.document_type.trim().is_empty() {
            issues.push(error(self.rule_id(), "documentType", "document type is required"));
        }
        issues
    }
}

// =========================================================================
// RULE: REQ-002
// "Purpose is required"
// A purpose shorter than four characters is almost always a placeholder.
// =========================================================================
pub struct RequirePurpose;

impl ValidationRule for RequirePurpose {
    fn rule_id(&self) -> &'static str { "REQ-002" }

    fn check(&self, intake: &Intake<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let purpose = intake.request.purpose.trim();

        if purpose.is_empty() {
            issues.push(error(self.rule_id(), "purpose", "purpose is required"));
        } else if purpose.chars().count() < 4 {
            issues.push(ValidationIssue {
                code: self.rule_id().to_string(),
                severity: Severity::Warning,
                message: format!("purpose '{}' looks incomplete", purpose),
                field: Some("purpose".to_string()),
            });
        }
        issues
    }
}

// =========================================================================
// RULE: REQ-003
// "Student id number and name are required"
// =========================================================================
pub struct RequireStudentIdentity;

impl ValidationRule for RequireStudentIdentity {
    fn rule_id(&self) -> &'static str { "REQ-003" }

    fn check(&self, intake: &Intake<'_>) -> Vec<ValidationIssue> {
        let student = &intake.request.student;
        let mut issues = Vec::new();

        if student.id_number.trim().is_empty() {
            issues.push(error(self.rule_id(), "studentRef.idNumber", "student id number is required"));
        }
        if student.first_name.trim().is_empty() || student.last_name.trim().is_empty() {
            issues.push(error(self.rule_id(), "studentRef", "student first and last name are required"));
        }
        issues
    }
}

// =========================================================================
// RULE: REQ-004
// "Attachment references must not be blank"
// =========================================================================
pub struct AttachmentReferences;

impl ValidationRule for AttachmentReferences {
    fn rule_id(&self) -> &'static str { "REQ-004" }

    fn check(&self, intake: &Intake<'_>) -> Vec<ValidationIssue> {
        intake
            .request
            .file_path
            .iter()
            .enumerate()
            .filter(|(_, path)| path.trim().is_empty())
            .map(|(index, _)| {
                error(
                    self.rule_id(),
                    "filePath",
                    format!("attachment #{} has an empty reference", index + 1),
                )
            })
            .collect()
    }
}

// =========================================================================
// RULE: REQ-005
// "Requests are opened by the student, or by the registrar on their behalf"
// =========================================================================
pub struct InitiatorMatchesRole;

impl ValidationRule for InitiatorMatchesRole {
    fn rule_id(&self) -> &'static str { "REQ-005" }

    fn check(&self, intake: &Intake<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let allowed = matches!(
            (intake.role, intake.request.initiated_by),
            (Role::Student, InitiatedBy::Student) | (Role::Registrar, InitiatedBy::Registrar)
        );

        if !allowed {
            issues.push(error(
                self.rule_id(),
                "initiatedBy",
                format!(
                    "role {} cannot open a request initiated by {}",
                    intake.role, intake.request.initiated_by
                ),
            ));
        }
        issues
    }
}
