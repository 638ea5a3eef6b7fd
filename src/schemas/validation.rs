//! Validation summary supplied by the content provider

use serde::{Deserialize, Serialize};

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingLevel {
    Error,
    Warning,
    Info,
}

/// One validation marker on a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub level: FindingLevel,

    #[serde(default)]
    pub message: String,

    /// Field path the finding refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationFinding {
    pub fn error(message: impl Into<String>) -> Self {
        ValidationFinding {
            level: FindingLevel::Error,
            message: message.into(),
            path: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        ValidationFinding {
            level: FindingLevel::Warning,
            message: message.into(),
            path: None,
        }
    }
}

/// Whether validation is still running for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Validating,
    #[default]
    Settled,
}

/// Validation state of one document at the moment of a decision
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    #[serde(default)]
    pub status: ValidationStatus,

    #[serde(default)]
    pub findings: Vec<ValidationFinding>,
}

impl ValidationSummary {
    /// A settled summary with no findings
    pub fn clean() -> Self {
        ValidationSummary::default()
    }

    /// A summary for a document whose validation is still in flight
    pub fn validating() -> Self {
        ValidationSummary {
            status: ValidationStatus::Validating,
            findings: Vec::new(),
        }
    }

    pub fn settled(findings: Vec<ValidationFinding>) -> Self {
        ValidationSummary {
            status: ValidationStatus::Settled,
            findings,
        }
    }

    pub fn is_validating(&self) -> bool {
        self.status == ValidationStatus::Validating
    }

    /// Settled with at least one error-level finding. Warnings never count.
    pub fn has_errors(&self) -> bool {
        !self.is_validating() && self.findings.iter().any(|f| f.level == FindingLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let summary = ValidationSummary::settled(vec![ValidationFinding::warning("short title")]);
        assert!(!summary.has_errors());
    }

    #[test]
    fn test_errors_only_count_once_settled() {
        let mut summary = ValidationSummary::settled(vec![ValidationFinding::error("required")]);
        assert!(summary.has_errors());
        summary.status = ValidationStatus::Validating;
        assert!(!summary.has_errors());
        assert!(summary.is_validating());
    }

    #[test]
    fn test_deserialize_defaults_to_settled() {
        let summary: ValidationSummary =
            serde_json::from_str(r#"{"findings": [{"level": "error"}]}"#).unwrap();
        assert_eq!(summary.status, ValidationStatus::Settled);
        assert!(summary.has_errors());
    }
}
