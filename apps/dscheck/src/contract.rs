//! Contract loading: parse by extension, then enforce the contract's own
//! invariants before any source is looked at.

use crate::error::{ConfigError, Result};
use crate::models::contract::Contract;
use std::fs;
use std::path::Path;

pub const CONTRACT_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Load and check a contract document.
///
/// Missing, unreadable, malformed and invariant-violating contracts are all
/// configuration errors; they never turn into validation outcomes.
pub fn load_contract(path: &Path) -> Result<Contract> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !CONTRACT_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ConfigError::UnsupportedFormat(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::ContractRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: std::result::Result<Contract, String> = if ext == "json" {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    };
    let contract = parsed.map_err(|reason| ConfigError::ContractParse {
        path: path.to_path_buf(),
        reason,
    })?;
    let violations = contract.violations();
    if !violations.is_empty() {
        return Err(ConfigError::InvalidContract {
            path: path.to_path_buf(),
            violations,
        });
    }
    tracing::debug!(
        path = %path.display(),
        component = %contract.component,
        version = contract.version_label(),
        properties = contract.properties.len(),
        tokens = contract.design_tokens.len(),
        "loaded contract"
    );
    Ok(contract)
}
