//! Source scanner: text heuristics that turn a component implementation
//! into `SourceFacts`.
//!
//! This is string/regex matching, not a parser. Constructs the patterns do
//! not recognize are simply absent from the facts; the evaluator then
//! reports them as missing.

use crate::error::{ConfigError, Result};
use crate::models::contract::Contract;
use crate::models::rules::RuleSet;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

pub const DEFAULT_DECORATOR: &str = "property";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A property declaration found in the source.
pub struct DeclaredProperty {
    pub inferred_type: String,
    pub default_literal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Everything the evaluator needs to know about one source text.
pub struct SourceFacts {
    pub declared_properties: BTreeMap<String, DeclaredProperty>,
    pub type_unions: BTreeMap<String, Vec<String>>,
    pub token_presence: BTreeSet<String>,
    pub marker_presence: BTreeSet<String>,
    /// Allowed values that occur as quoted literals anywhere in the text.
    pub literal_presence: BTreeSet<String>,
}

impl SourceFacts {
    /// Scan `text` for everything `contract` and `rules` will ask about.
    pub fn scan(text: &str, contract: &Contract, rules: &RuleSet, decorator: &str) -> Self {
        let declared_properties = extract_properties(text, decorator);

        let mut type_unions: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut literal_presence = BTreeSet::new();
        for (name, spec) in &contract.properties {
            if spec.allowed_values.is_none() {
                continue;
            }
            let declared = declared_properties.get(name);
            for candidate in union_candidates(name, spec.type_name.as_deref(), declared) {
                if type_unions.contains_key(&candidate) {
                    continue;
                }
                let values = extract_type_union(text, &candidate);
                if !values.is_empty() {
                    type_unions.insert(candidate, values);
                }
            }
            for value in spec.allowed_literals() {
                if literal_occurs(text, &value) {
                    literal_presence.insert(value);
                }
            }
        }

        let token_candidates: Vec<String> = contract
            .design_tokens
            .iter()
            .map(|(_, v)| crate::models::contract::literal(v))
            .collect();
        let markers: Vec<&str> = rules
            .markers
            .iter()
            .flat_map(|m| m.any.iter().map(String::as_str))
            .collect();

        let facts = SourceFacts {
            declared_properties,
            type_unions,
            token_presence: extract_token_presence(text, &token_candidates),
            marker_presence: extract_marker_presence(text, &markers),
            literal_presence,
        };
        tracing::debug!(
            properties = facts.declared_properties.len(),
            unions = facts.type_unions.len(),
            tokens = facts.token_presence.len(),
            markers = facts.marker_presence.len(),
            "scanned source"
        );
        facts
    }
}

/// Read the source file, failing fast when it does not exist.
pub fn read_source(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ConfigError::SourceNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| ConfigError::SourceRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Type alias names worth looking up for a property, most specific first:
/// the contract's `typeName`, the identifiers in the declared annotation
/// (`Size`, `Size | undefined`), then the PascalCase property name.
pub fn union_candidates(
    name: &str,
    type_name: Option<&str>,
    declared: Option<&DeclaredProperty>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: String| {
        if !s.is_empty() && !out.contains(&s) {
            out.push(s);
        }
    };
    if let Some(t) = type_name {
        push(t.trim().to_string());
    }
    if let Some(d) = declared {
        for member in annotation_members(&d.inferred_type) {
            if is_identifier(member) {
                push(member.to_string());
            }
        }
    }
    push(pascal_case(name));
    out
}

/// Members of a type annotation split on `|`, trimmed, without `undefined`
/// and `null`.
pub fn annotation_members(annotation: &str) -> Vec<&str> {
    annotation
        .split('|')
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != "undefined" && *m != "null")
        .collect()
}

/// Extract decorated property declarations such as
/// `@property({ type: String, reflect: true }) size: Size = 'md';`.
///
/// The first declaration of a name wins.
pub fn extract_properties(text: &str, decorator: &str) -> BTreeMap<String, DeclaredProperty> {
    let mut out = BTreeMap::new();
    let pattern = format!(
        r"(?m)@{}\s*\(((?:[^()]|\([^()]*\))*)\)\s*(?:(?:public|private|protected|readonly|declare|override|accessor|static)\s+)*([A-Za-z_$][\w$]*)[ \t]*[?!]?[ \t]*(?::[ \t]*([^=;\n]+?))?[ \t]*(?:=[ \t]*([^;\n]+?))?[ \t]*(?:;|$)",
        regex::escape(decorator)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return out;
    };
    let Ok(type_opt) = Regex::new(r"\btype\s*:\s*([A-Za-z]+)") else {
        return out;
    };
    for cap in re.captures_iter(text) {
        let name = cap[2].to_string();
        if out.contains_key(&name) {
            continue;
        }
        let annotation = cap.get(3).map(|m| m.as_str().trim().to_string());
        let raw_default = cap.get(4).map(|m| m.as_str().trim());
        let inferred_type = match annotation {
            Some(t) if !t.is_empty() => t,
            _ => type_opt
                .captures(&cap[1])
                .map(|c| c[1].to_ascii_lowercase())
                .or_else(|| raw_default.map(infer_literal_type))
                .unwrap_or_else(|| "unknown".to_string()),
        };
        out.insert(
            name,
            DeclaredProperty {
                inferred_type,
                default_literal: raw_default.map(strip_quotes),
            },
        );
    }
    out
}

/// Values of `type <type_name> = A | B | C`, in order, unquoted, without
/// empty tokens. Empty when the alias is not found.
pub fn extract_type_union(text: &str, type_name: &str) -> Vec<String> {
    let pattern = format!(r"\btype\s+{}\s*=\s*", regex::escape(type_name));
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    re.find(text)
        .map(|m| parse_union(union_body(&text[m.end()..])))
        .unwrap_or_default()
}

/// The alias body following `=`. It ends at `;`, or at a line break unless
/// the union continues with a trailing or leading `|`.
fn union_body(rest: &str) -> &str {
    let mut end = 0;
    let mut open = false;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim();
        if end > 0 && !open && !trimmed.starts_with('|') {
            break;
        }
        if let Some(i) = line.find(';') {
            return &rest[..end + i];
        }
        open = trimmed.ends_with('|');
        end += line.len();
    }
    &rest[..end]
}

/// Split a union expression on `|`, trimming whitespace and quotes.
pub fn parse_union(expr: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tok in expr.split('|') {
        let v = strip_quotes(tok);
        if !v.is_empty() && !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// Candidates that occur verbatim in the text.
pub fn extract_token_presence(text: &str, candidates: &[String]) -> BTreeSet<String> {
    candidates
        .iter()
        .filter(|c| !c.is_empty() && text.contains(c.as_str()))
        .cloned()
        .collect()
}

/// Markers that occur in the text, compared case-insensitively.
pub fn extract_marker_presence(text: &str, markers: &[&str]) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    markers
        .iter()
        .filter(|m| !m.is_empty() && lower.contains(&m.to_lowercase()))
        .map(|m| m.to_string())
        .collect()
}

/// Whether `value` occurs as a quoted literal (`'v'`, `"v"` or `` `v` ``).
pub fn literal_occurs(text: &str, value: &str) -> bool {
    ['\'', '"', '`']
        .iter()
        .any(|q| text.contains(&format!("{q}{value}{q}")))
}

pub fn strip_quotes(s: &str) -> String {
    s.trim()
        .trim_matches(|c| c == '\'' || c == '"' || c == '`')
        .trim()
        .to_string()
}

fn infer_literal_type(raw: &str) -> String {
    let raw = raw.trim();
    let kind = if raw.starts_with(&['\'', '"', '`'][..]) {
        "string"
    } else if raw == "true" || raw == "false" {
        "boolean"
    } else if raw.parse::<f64>().is_ok() {
        "number"
    } else if raw.starts_with('[') {
        "array"
    } else if raw.starts_with('{') {
        "object"
    } else {
        "unknown"
    };
    kind.to_string()
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `icon-position` / `icon_position` / `iconPosition` -> `IconPosition`.
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut cs = p.chars();
            match cs.next() {
                Some(f) => f.to_ascii_uppercase().to_string() + cs.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
