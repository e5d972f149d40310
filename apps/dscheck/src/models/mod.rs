//! Shared data models: contracts, marker rules, outcomes and reports.

pub mod contract;
pub mod report;
pub mod rules;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a single outcome. Only `Error` affects the exit code.
pub enum Severity {
    Pass,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl Severity {
    /// Display rank inside a category: errors first, passes last.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Pass => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Pass => "pass",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Which rule produced an outcome.
pub enum RuleKind {
    Presence,
    Default,
    AllowedValues,
    DesignToken,
    Marker,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One evaluated rule.
pub struct Outcome {
    pub severity: Severity,
    pub category: String,
    pub rule: RuleKind,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Outcome {
    pub fn new(
        severity: Severity,
        category: &str,
        rule: RuleKind,
        subject: &str,
        message: impl Into<String>,
    ) -> Self {
        Outcome {
            severity,
            category: category.to_string(),
            rule,
            subject: subject.to_string(),
            message: message.into(),
            recommendation: None,
        }
    }

    pub fn recommend(mut self, text: impl Into<String>) -> Self {
        self.recommendation = Some(text.into());
        self
    }

    pub fn with_recommendation(mut self, text: Option<String>) -> Self {
        self.recommendation = text;
        self
    }
}
