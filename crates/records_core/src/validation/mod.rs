use crate::error::{Result, WorkflowError};
use crate::models::{NewDocumentRequest, Role};
use serde::Serialize;

pub mod rules;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

// The structure of a failure
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: String,     // e.g., "REQ-002"
    pub severity: Severity,
    pub message: String,
    pub field: Option<String>, // Which input failed?
}

/// What a rule sees: the intake payload and the role submitting it.
pub struct Intake<'a> {
    pub request: &'a NewDocumentRequest,
    pub role: Role,
}

// The contract every intake rule must fulfill
pub trait ValidationRule: Send + Sync {
    fn check(&self, intake: &Intake<'_>) -> Vec<ValidationIssue>;
    fn rule_id(&self) -> &'static str;
}

// The registry of all rules
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule<R: ValidationRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn run(&self, intake: &Intake<'_>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            let mut rule_issues = rule.check(intake);
            issues.append(&mut rule_issues);
        }
        issues
    }

    /// Runs every rule and turns the first `Error` into a `WorkflowError::Validation`.
    /// Warnings are returned for the caller to show.
    pub fn enforce(&self, intake: &Intake<'_>) -> Result<Vec<ValidationIssue>> {
        let issues = self.run(intake);
        if let Some(blocking) = issues.iter().find(|i| i.severity == Severity::Error) {
            return Err(WorkflowError::Validation(format!("{} ({})", blocking.message, blocking.code)));
        }
        Ok(issues)
    }
}

pub fn intake_validator() -> ValidationEngine {
    ValidationEngine::new()
        .add_rule(rules::RequireDocumentType)
        .add_rule(rules::RequirePurpose)
        .add_rule(rules::RequireStudentIdentity)
        .add_rule(rules::AttachmentReferences)
        .add_rule(rules::InitiatorMatchesRole)
}
