use serde::Serialize;
use statute_structure::structure::{DocumentStats, ValidationOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub source_file: String,
    pub output_file: Option<String>,
    pub conversion_time: String,
    pub status: String,
    pub message: Option<String>,
    pub validation: Option<ValidationOutcome>,
    pub verification: VerificationSummary,
    pub document_statistics: DocumentStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationSummary {
    pub status: String,
    pub issues: Vec<String>,
}

impl VerificationSummary {
    pub fn skipped() -> Self {
        Self {
            status: "skipped".to_string(),
            issues: Vec::new(),
        }
    }

    pub fn from_issues(issues: Vec<String>) -> Self {
        let status = if issues.is_empty() { "passed" } else { "warning" };
        Self {
            status: status.to_string(),
            issues,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub generated_at: String,
    pub converted: usize,
    pub warnings: usize,
    pub failed: usize,
    pub reports: Vec<String>,
}
