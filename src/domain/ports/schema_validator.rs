//! SchemaValidator port
//!
//! Validates a JSON document against a versioned schema reference.

use serde::Serialize;

/// Outcome of validating a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Build a report; valid exactly when there are no errors
    pub fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

pub trait SchemaValidator: Send + Sync {
    fn validate(&self, document: &serde_json::Value, schema_ref: &str) -> ValidationReport;
}
