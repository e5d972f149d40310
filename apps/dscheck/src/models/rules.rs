//! Marker rule sets applied per component family.

use super::Severity;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
/// Structural/accessibility expectations shared by one component family.
pub struct RuleSet {
    #[serde(default)]
    pub markers: Vec<MarkerRule>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Deserialize)]
/// Passes when any of `any` occurs in the source (case-insensitive).
pub struct MarkerRule {
    pub category: String,
    pub any: Vec<String>,
    #[serde(default = "default_marker_severity")]
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
/// Something that has to be checked by hand; always reported as info.
pub struct Note {
    #[serde(default = "default_note_category")]
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub recommendation: Option<String>,
}

fn default_marker_severity() -> Severity {
    Severity::Warning
}

fn default_note_category() -> String {
    "Manual Verification".to_string()
}

impl MarkerRule {
    pub fn new(category: &str, any: &[&str], severity: Severity, message: &str) -> Self {
        MarkerRule {
            category: category.to_string(),
            any: any.iter().map(|s| s.to_string()).collect(),
            severity,
            message: message.to_string(),
            recommendation: None,
        }
    }

    pub fn recommend(mut self, text: &str) -> Self {
        self.recommendation = Some(text.to_string());
        self
    }
}

impl Note {
    pub fn new(message: &str, recommendation: &str) -> Self {
        Note {
            category: default_note_category(),
            message: message.to_string(),
            recommendation: Some(recommendation.to_string()),
        }
    }
}
