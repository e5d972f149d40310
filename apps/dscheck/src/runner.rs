//! Runner: resolves the contract and source for a named component and
//! drives load -> scan -> evaluate -> report.

use crate::config::{normalize_component, Effective};
use crate::contract::{load_contract, CONTRACT_EXTENSIONS};
use crate::error::{ConfigError, Result};
use crate::evaluate::evaluate;
use crate::models::report::Report;
use crate::rules;
use crate::scan::{read_source, SourceFacts};
use glob::glob;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where one component's inputs live and which marker family applies.
pub struct ComponentPaths {
    pub name: String,
    pub contract: PathBuf,
    pub source: PathBuf,
    pub family: String,
}

/// Contract candidates for a component, in lookup order.
fn contract_candidates(eff: &Effective, name: &str) -> Vec<PathBuf> {
    match eff
        .components
        .get(name)
        .and_then(|c| c.contract.as_ref())
    {
        Some(p) => vec![eff.repo_root.join(p)],
        None => CONTRACT_EXTENSIONS
            .iter()
            .map(|ext| eff.contracts_dir.join(format!("{}.contract.{}", name, ext)))
            .collect(),
    }
}

/// Resolve contract, source and family for `component`.
///
/// Fails with `ContractNotFound` when no contract candidate exists; the
/// source path is returned as configured and checked when it is read.
pub fn resolve_component(eff: &Effective, component: &str) -> Result<ComponentPaths> {
    let name = normalize_component(component);
    let cfg = eff.components.get(&name);
    let candidates = contract_candidates(eff, &name);
    let contract = candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::ContractNotFound {
            component: name.clone(),
            looked_at: candidates.clone(),
        })?;
    let source = match cfg.and_then(|c| c.source.as_ref()) {
        Some(p) => eff.repo_root.join(p),
        None => eff.sources_dir.join(&name).join(format!("{}.ts", name)),
    };
    let family = cfg
        .and_then(|c| c.family.clone())
        .unwrap_or_else(|| name.clone());
    tracing::debug!(
        component = %name,
        contract = %contract.display(),
        source = %source.display(),
        family = %family,
        "resolved component"
    );
    Ok(ComponentPaths {
        name,
        contract,
        source,
        family,
    })
}

/// Validate one component end to end.
///
/// Any `Err` is a configuration problem and no outcomes exist for it.
pub fn run_validation(eff: &Effective, component: &str) -> Result<Report> {
    let paths = resolve_component(eff, component)?;
    let contract = load_contract(&paths.contract)?;
    let text = read_source(&paths.source)?;
    let rule_set = rules::resolve(&paths.family, &eff.families);
    let facts = SourceFacts::scan(&text, &contract, &rule_set, &eff.decorator);
    let outcomes = evaluate(&contract, &facts, &rule_set);
    Ok(Report::new(
        contract.component.clone(),
        contract.version_label().to_string(),
        display_path(&eff.repo_root, &paths.contract),
        display_path(&eff.repo_root, &paths.source),
        outcomes,
    ))
}

/// Component names that have a contract in the contracts directory, plus
/// those configured explicitly under `[components]`.
pub fn list_components(eff: &Effective) -> Vec<String> {
    let mut names: BTreeSet<String> = BTreeSet::new();
    for ext in CONTRACT_EXTENSIONS {
        let pattern = eff
            .contracts_dir
            .join(format!("*.contract.{}", ext))
            .to_string_lossy()
            .to_string();
        let Ok(paths) = glob(&pattern) else {
            tracing::warn!(pattern = %pattern, "invalid contracts glob");
            continue;
        };
        for path in paths.flatten() {
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();
            if let Some(stem) = file.strip_suffix(&format!(".contract.{}", ext)) {
                names.insert(normalize_component(stem));
            }
        }
    }
    for (name, cfg) in &eff.components {
        if cfg.contract.is_some() {
            names.insert(name.clone());
        }
    }
    names.into_iter().collect()
}

/// Path relative to the repository root when possible.
pub fn display_path(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|p| !p.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}
