//! Configuration errors: everything that stops a run before any rule is
//! evaluated.
//!
//! These are reported on stderr with exit code 2 so CI can tell "could not
//! run" apart from "component failed validation".

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("contract not found for component '{component}' (looked at {})", display_paths(.looked_at))]
    ContractNotFound {
        component: String,
        looked_at: Vec<PathBuf>,
    },

    #[error("failed to read contract {path}: {source}")]
    ContractRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("contract {path} is malformed: {reason}")]
    ContractParse { path: PathBuf, reason: String },

    #[error("contract {path} is invalid:\n  - {}", .violations.join("\n  - "))]
    InvalidContract {
        path: PathBuf,
        violations: Vec<String>,
    },

    #[error("unsupported contract format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("failed to read source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },

    #[error("unknown output mode '{0}' (expected human|json)")]
    UnknownOutput(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_contract_lists_every_violation() {
        let err = ConfigError::InvalidContract {
            path: PathBuf::from("button.contract.json"),
            violations: vec!["a".into(), "b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("button.contract.json"));
        assert!(msg.contains("  - a\n  - b"));
    }

    #[test]
    fn test_contract_not_found_names_candidates() {
        let err = ConfigError::ContractNotFound {
            component: "badge".into(),
            looked_at: vec![PathBuf::from("x.json"), PathBuf::from("x.yaml")],
        };
        assert_eq!(
            err.to_string(),
            "contract not found for component 'badge' (looked at x.json, x.yaml)"
        );
    }
}
