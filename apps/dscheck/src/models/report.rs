//! Report aggregation: severity counts and the pass/fail decision.

use super::{Outcome, Severity};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Severity counts for one run.
pub struct Summary {
    pub total: usize,
    pub passes: usize,
    pub infos: usize,
    pub warnings: usize,
    pub errors: usize,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Outcomes of validating one component plus the derived summary.
pub struct Report {
    pub component: String,
    pub contract_version: String,
    pub contract: String,
    pub source: String,
    pub outcomes: Vec<Outcome>,
    pub summary: Summary,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let count = |sev: Severity| outcomes.iter().filter(|o| o.severity == sev).count();
        let errors = count(Severity::Error);
        Summary {
            total: outcomes.len(),
            passes: count(Severity::Pass),
            infos: count(Severity::Info),
            warnings: count(Severity::Warning),
            errors,
            passed: errors == 0,
        }
    }
}

impl Report {
    pub fn new(
        component: String,
        contract_version: String,
        contract: String,
        source: String,
        outcomes: Vec<Outcome>,
    ) -> Self {
        let summary = Summary::from_outcomes(&outcomes);
        Report {
            component,
            contract_version,
            contract,
            source,
            outcomes,
            summary,
        }
    }

    pub fn passed(&self) -> bool {
        self.summary.passed
    }

    /// 0 when no error outcome exists (warnings allowed), else 1.
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// Categories in first-appearance order, each with its outcomes sorted
    /// errors, warnings, infos, passes (stable within a severity).
    pub fn grouped(&self) -> Vec<(&str, Vec<&Outcome>)> {
        let mut groups: Vec<(&str, Vec<&Outcome>)> = Vec::new();
        for o in &self.outcomes {
            match groups.iter_mut().find(|(cat, _)| *cat == o.category) {
                Some((_, items)) => items.push(o),
                None => groups.push((o.category.as_str(), vec![o])),
            }
        }
        for (_, items) in groups.iter_mut() {
            items.sort_by_key(|o| o.severity.rank());
        }
        groups
    }
}
