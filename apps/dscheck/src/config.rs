//! Configuration discovery and effective settings resolution.
//!
//! dscheck reads `dscheck.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `contracts`: `.figma/contracts`
//! - `sources`: `src/components`
//! - `output`: `human`
//! - `color`: true (also disabled by `NO_COLOR` or JSON output)
//! - `show_passes`: true
//! - `decorator`: `property`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{ConfigError, Result};
use crate::models::rules::RuleSet;
use crate::scan::DEFAULT_DECORATOR;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONTRACTS_DIR: &str = ".figma/contracts";
pub const DEFAULT_SOURCES_DIR: &str = "src/components";

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `dscheck.toml|yaml`.
pub struct DscheckConfig {
    pub contracts: Option<String>,
    pub sources: Option<String>,
    pub output: Option<String>,
    pub color: Option<bool>,
    pub show_passes: Option<bool>,
    pub decorator: Option<String>,
    #[serde(default)]
    pub components: HashMap<String, ComponentCfg>, // [components.<name>]
    #[serde(default)]
    pub families: HashMap<String, RuleSet>, // [families.<name>]
}

impl DscheckConfig {
    /// A marker rule with no markers can never pass.
    fn check_families(&self) -> std::result::Result<(), String> {
        let mut names: Vec<&String> = self.families.keys().collect();
        names.sort();
        for name in names {
            for (i, rule) in self.families[name].markers.iter().enumerate() {
                if rule.any.iter().all(|m| m.trim().is_empty()) {
                    return Err(format!(
                        "families.{}.markers[{}] ({}): `any` must list at least one marker",
                        name, i, rule.category
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-component path and family overrides.
pub struct ComponentCfg {
    pub contract: Option<String>,
    pub source: Option<String>,
    pub family: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub contracts_dir: PathBuf,
    pub sources_dir: PathBuf,
    pub output: String,
    pub color: bool,
    pub show_passes: bool,
    pub decorator: String,
    pub components: HashMap<String, ComponentCfg>,
    pub families: HashMap<String, RuleSet>,
}

#[derive(Debug, Default, Clone)]
/// CLI-provided overrides; `None` falls through to config, then defaults.
pub struct CliOverrides<'a> {
    pub repo_root: Option<&'a str>,
    pub contracts: Option<&'a str>,
    pub sources: Option<&'a str>,
    pub output: Option<&'a str>,
    pub no_color: bool,
    pub quiet: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `dscheck.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if config_candidates(cur).iter().any(|p| p.exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

fn config_candidates(root: &Path) -> [PathBuf; 3] {
    [
        root.join("dscheck.toml"),
        root.join("dscheck.yaml"),
        root.join("dscheck.yml"),
    ]
}

/// Load `DscheckConfig` from `dscheck.toml` or `dscheck.yaml|yml` if present.
///
/// A present but unparsable file is an error rather than silently ignored.
pub fn load_config(root: &Path) -> Result<Option<DscheckConfig>> {
    let bad = |path: &Path, reason: String| ConfigError::ConfigFile {
        path: path.to_path_buf(),
        reason,
    };
    let toml_path = root.join("dscheck.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).map_err(|e| bad(&toml_path, e.to_string()))?;
        let cfg: DscheckConfig = toml::from_str(&s).map_err(|e| bad(&toml_path, e.to_string()))?;
        cfg.check_families().map_err(|e| bad(&toml_path, e))?;
        return Ok(Some(cfg));
    }
    for yml in ["dscheck.yaml", "dscheck.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).map_err(|e| bad(&p, e.to_string()))?;
            let cfg: DscheckConfig = serde_yaml::from_str(&s).map_err(|e| bad(&p, e.to_string()))?;
            cfg.check_families().map_err(|e| bad(&p, e))?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let contracts = cli
        .contracts
        .map(|s| s.to_string())
        .or(cfg.contracts)
        .unwrap_or_else(|| DEFAULT_CONTRACTS_DIR.to_string());
    let sources = cli
        .sources
        .map(|s| s.to_string())
        .or(cfg.sources)
        .unwrap_or_else(|| DEFAULT_SOURCES_DIR.to_string());
    let output = cli
        .output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(ConfigError::UnknownOutput(output));
    }
    let color = !cli.no_color
        && cfg.color.unwrap_or(true)
        && std::env::var_os("NO_COLOR").is_none();
    let show_passes = !cli.quiet && cfg.show_passes.unwrap_or(true);
    let decorator = cfg
        .decorator
        .unwrap_or_else(|| DEFAULT_DECORATOR.to_string());

    // Component keys are matched in normalized form.
    let components = cfg
        .components
        .into_iter()
        .map(|(k, v)| (normalize_component(&k), v))
        .collect();

    Ok(Effective {
        contracts_dir: repo_root.join(contracts),
        sources_dir: repo_root.join(sources),
        repo_root,
        config_found,
        output,
        color,
        show_passes,
        decorator,
        components,
        families: cfg.families,
    })
}

/// `Button Group` / `button_group` / `ButtonGroup` -> `button-group`.
pub fn normalize_component(name: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in name.trim().chars() {
        if c == ' ' || c == '_' || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_ascii_uppercase() {
            if prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out.trim_end_matches('-').to_string()
}
