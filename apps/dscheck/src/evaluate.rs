//! Rule evaluator: applies one contract and one family rule set to the
//! scanned source facts.
//!
//! Every rule runs regardless of earlier results so a single run lists the
//! complete set of defects. Output order is fixed: contract properties in
//! declaration order (presence, default, allowed values), then design
//! tokens in declaration order, then markers, then notes.

use crate::models::contract::{literal, Contract, PropertySpec};
use crate::models::rules::RuleSet;
use crate::models::{Outcome, RuleKind, Severity};
use crate::scan::{self, SourceFacts};

const CAT_PRESENCE: &str = "Properties";
const CAT_DEFAULT: &str = "Default Values";
const CAT_ALLOWED: &str = "Allowed Values";
const CAT_TOKENS: &str = "Design Tokens";

/// Evaluate every rule and return the outcomes in a deterministic order.
pub fn evaluate(contract: &Contract, facts: &SourceFacts, rules: &RuleSet) -> Vec<Outcome> {
    let mut out = Vec::new();
    for (name, spec) in &contract.properties {
        out.push(check_presence(name, spec, facts));
        if let Some(o) = check_default(name, spec, facts) {
            out.push(o);
        }
        out.extend(check_allowed_values(name, spec, facts));
    }
    for (token, value) in &contract.design_tokens {
        out.push(check_token(token, &literal(value), facts));
    }
    for rule in &rules.markers {
        let found = rule.any.iter().any(|m| facts.marker_presence.contains(m));
        let subject = rule.any.join(" | ");
        let outcome = if found {
            Outcome::new(
                Severity::Pass,
                &rule.category,
                RuleKind::Marker,
                &subject,
                rule.message.clone(),
            )
        } else {
            Outcome::new(
                rule.severity,
                &rule.category,
                RuleKind::Marker,
                &subject,
                format!("missing: {} (expected one of: {})", rule.message, subject),
            )
            .with_recommendation(rule.recommendation.clone())
        };
        out.push(outcome);
    }
    for note in &rules.notes {
        out.push(
            Outcome::new(
                Severity::Info,
                &note.category,
                RuleKind::Note,
                "",
                note.message.clone(),
            )
            .with_recommendation(note.recommendation.clone()),
        );
    }
    out
}

/// Error when a required expectation fails, warning otherwise.
fn failing(spec: &PropertySpec) -> Severity {
    if spec.required {
        Severity::Error
    } else {
        Severity::Warning
    }
}

/// Trimmed, unquoted, ASCII-lowercased form used for default comparison.
pub fn normalize(value: &str) -> String {
    scan::strip_quotes(value).to_ascii_lowercase()
}

fn check_presence(name: &str, spec: &PropertySpec, facts: &SourceFacts) -> Outcome {
    match facts.declared_properties.get(name) {
        Some(d) => Outcome::new(
            Severity::Pass,
            CAT_PRESENCE,
            RuleKind::Presence,
            name,
            format!("`{}` declared ({})", name, d.inferred_type),
        ),
        None => {
            let kind = if spec.required { "required" } else { "optional" };
            Outcome::new(
                failing(spec),
                CAT_PRESENCE,
                RuleKind::Presence,
                name,
                format!("{} property `{}` is not declared", kind, name),
            )
            .recommend(match spec.default_literal() {
                Some(def) => format!("declare `@property() {} = '{}'`", name, def),
                None => format!("declare `@property() {}`", name),
            })
        }
    }
}

fn check_default(name: &str, spec: &PropertySpec, facts: &SourceFacts) -> Option<Outcome> {
    let declared = facts.declared_properties.get(name)?;
    let expected = spec.default_literal()?;
    let outcome = match declared.default_literal.as_deref() {
        Some(actual) if normalize(actual) == normalize(&expected) => Outcome::new(
            Severity::Pass,
            CAT_DEFAULT,
            RuleKind::Default,
            name,
            format!("`{}` defaults to {}", name, expected),
        ),
        Some(actual) => Outcome::new(
            failing(spec),
            CAT_DEFAULT,
            RuleKind::Default,
            name,
            format!("`{}`: expected {}, got {}", name, expected, actual),
        )
        .recommend(format!("initialize `{}` to {}", name, expected)),
        None => Outcome::new(
            Severity::Warning,
            CAT_DEFAULT,
            RuleKind::Default,
            name,
            format!(
                "`{}` has no default in its declaration; expected {} (cannot verify)",
                name, expected
            ),
        )
        .recommend(format!(
            "initialize `{}` to {} at the declaration so the {} default can be checked",
            name,
            expected,
            if spec.required { "required" } else { "optional" }
        )),
    };
    Some(outcome)
}

/// Locate the union for a property: contract `typeName`, declared
/// annotation (alias or inline union), then PascalCase name.
fn resolve_union(name: &str, spec: &PropertySpec, facts: &SourceFacts) -> Option<(String, Vec<String>)> {
    let declared = facts.declared_properties.get(name);
    if let Some(d) = declared {
        let t = d.inferred_type.trim();
        if t == "boolean" {
            return Some((t.to_string(), vec!["true".into(), "false".into()]));
        }
        if t.contains('|') {
            let values = expand_annotation(t, facts);
            if !values.is_empty() {
                return Some((t.to_string(), values));
            }
        }
    }
    scan::union_candidates(name, spec.type_name.as_deref(), declared)
        .into_iter()
        .find_map(|c| facts.type_unions.get(&c).map(|vs| (c, vs.clone())))
}

/// Values admitted by an inline union annotation. Aliases expand through
/// the scanned unions; identifiers that resolve to nothing are dropped.
fn expand_annotation(annotation: &str, facts: &SourceFacts) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for member in scan::annotation_members(annotation) {
        let values = if member == "boolean" {
            vec!["true".to_string(), "false".to_string()]
        } else if let Some(vs) = facts.type_unions.get(member) {
            vs.clone()
        } else if scan::is_identifier(member) {
            Vec::new()
        } else {
            vec![scan::strip_quotes(member)]
        };
        for v in values {
            if !v.is_empty() && !out.contains(&v) {
                out.push(v);
            }
        }
    }
    out
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        one.to_string()
    } else {
        many.to_string()
    }
}

fn check_allowed_values(name: &str, spec: &PropertySpec, facts: &SourceFacts) -> Vec<Outcome> {
    let expected = spec.allowed_literals();
    if spec.allowed_values.is_none() {
        return Vec::new();
    }
    let mut out = Vec::new();
    match resolve_union(name, spec, facts) {
        Some((type_name, actual)) => {
            let missing: Vec<&String> = expected.iter().filter(|v| !actual.contains(v)).collect();
            let extra: Vec<&String> = actual.iter().filter(|v| !expected.contains(v)).collect();
            if !missing.is_empty() {
                let list = join(&missing);
                out.push(
                    Outcome::new(
                        failing(spec),
                        CAT_ALLOWED,
                        RuleKind::AllowedValues,
                        name,
                        format!(
                            "`{}` ({}): {}: {}",
                            name,
                            type_name,
                            plural(missing.len(), "missing value", "missing values"),
                            list
                        ),
                    )
                    .recommend(format!("add {} to the `{}` union", list, type_name)),
                );
            }
            if !extra.is_empty() {
                out.push(Outcome::new(
                    Severity::Warning,
                    CAT_ALLOWED,
                    RuleKind::AllowedValues,
                    name,
                    format!(
                        "`{}` ({}): {} not in contract: {}",
                        name,
                        type_name,
                        plural(extra.len(), "extra value", "extra values"),
                        join(&extra)
                    ),
                ));
            }
            if missing.is_empty() && extra.is_empty() {
                out.push(Outcome::new(
                    Severity::Pass,
                    CAT_ALLOWED,
                    RuleKind::AllowedValues,
                    name,
                    format!("`{}` ({}) covers [{}]", name, type_name, expected.join(", ")),
                ));
            }
        }
        None => {
            let missing: Vec<&String> = expected
                .iter()
                .filter(|v| !facts.literal_presence.contains(*v))
                .collect();
            if missing.is_empty() {
                out.push(Outcome::new(
                    Severity::Pass,
                    CAT_ALLOWED,
                    RuleKind::AllowedValues,
                    name,
                    format!(
                        "`{}`: no type union found; every allowed value occurs as a literal",
                        name
                    ),
                ));
            } else {
                out.push(
                    Outcome::new(
                        failing(spec),
                        CAT_ALLOWED,
                        RuleKind::AllowedValues,
                        name,
                        format!(
                            "`{}`: no type union found; {}: {}",
                            name,
                            plural(missing.len(), "missing value", "missing values"),
                            join(&missing)
                        ),
                    )
                    .recommend(format!(
                        "declare `type {} = {}`",
                        scan::pascal_case(name),
                        expected
                            .iter()
                            .map(|v| format!("'{}'", v))
                            .collect::<Vec<_>>()
                            .join(" | ")
                    )),
                );
            }
        }
    }
    out
}

fn check_token(token: &str, value: &str, facts: &SourceFacts) -> Outcome {
    if facts.token_presence.contains(value) {
        Outcome::new(
            Severity::Pass,
            CAT_TOKENS,
            RuleKind::DesignToken,
            token,
            format!("{}: {} found", token, value),
        )
    } else {
        Outcome::new(
            Severity::Warning,
            CAT_TOKENS,
            RuleKind::DesignToken,
            token,
            format!("{}: {} not found in source", token, value),
        )
        .recommend(format!(
            "use {} for {} (or confirm it is applied through a CSS variable)",
            value, token
        ))
    }
}

fn join(values: &[&String]) -> String {
    values
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::Report;
    use crate::models::rules::{MarkerRule, Note};
    use crate::scan::DEFAULT_DECORATOR;

    fn contract(s: &str) -> Contract {
        serde_json::from_str(s).unwrap()
    }

    fn run(c: &Contract, src: &str, rules: &RuleSet) -> Vec<Outcome> {
        let facts = SourceFacts::scan(src, c, rules, DEFAULT_DECORATOR);
        evaluate(c, &facts, rules)
    }

    fn errors(outcomes: &[Outcome]) -> Vec<&Outcome> {
        outcomes
            .iter()
            .filter(|o| o.severity == Severity::Error)
            .collect()
    }

    fn report(outcomes: Vec<Outcome>) -> Report {
        Report::new("C".into(), "1".into(), "c.json".into(), "c.ts".into(), outcomes)
    }

    #[test]
    fn test_missing_allowed_value_is_one_error() {
        let c = contract(
            r#"{"component": "Button", "properties": {"size": {"required": true, "default": "md", "allowedValues": ["sm", "md", "lg", "xl"]}}}"#,
        );
        let src = "type Size = 'sm' | 'md' | 'lg';\n@property() size: Size = 'md';";
        let out = run(&c, src, &RuleSet::default());
        let errs = errors(&out);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].rule, RuleKind::AllowedValues);
        assert!(errs[0].message.contains("missing value: xl"));
        assert!(!report(out).passed());
    }

    #[test]
    fn test_default_mismatch_reports_expected_and_actual() {
        let c = contract(
            r#"{"component": "Button", "properties": {"disabled": {"required": true, "default": false}}}"#,
        );
        let src = "@property({ type: Boolean }) disabled = true;";
        let out = run(&c, src, &RuleSet::default());
        let errs = errors(&out);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].rule, RuleKind::Default);
        assert!(errs[0].message.contains("expected false, got true"));
        assert!(!report(out).passed());
    }

    #[test]
    fn test_required_property_without_default_warns() {
        let c = contract(
            r#"{"component": "Button", "properties": {"label": {"required": true, "default": "Button"}}}"#,
        );
        let out = run(&c, "@property() declare label: string;", &RuleSet::default());
        let def = out.iter().find(|o| o.rule == RuleKind::Default).unwrap();
        assert_eq!(def.severity, Severity::Warning);
        assert!(def.message.ends_with("expected Button (cannot verify)"));
        assert!(def
            .recommendation
            .as_deref()
            .unwrap()
            .contains("required default can be checked"));
        assert!(report(out).passed());
    }

    #[test]
    fn test_token_matches_unrelated_substring() {
        let c = contract(
            r#"{"component": "Button", "properties": {"size": {"required": true, "default": "md"}}, "designTokens": {"border-radius": "8px"}}"#,
        );
        let src = "@property() size = 'md';\n:host { padding: 8px; }";
        let out = run(&c, src, &RuleSet::default());
        let tok = out
            .iter()
            .find(|o| o.rule == RuleKind::DesignToken)
            .unwrap();
        assert_eq!(tok.severity, Severity::Pass);
    }

    #[test]
    fn test_missing_token_only_warns() {
        let c = contract(
            r##"{"component": "Badge", "properties": {"tone": {"required": true, "default": "info", "allowedValues": ["info", "success"]}}, "designTokens": {"radius": "8px", "bg": "#E8F0FE"}}"##,
        );
        let src = "export type Tone = 'info' | 'success';\n@property() tone: Tone = 'info';\nconst r = '8px';";
        let out = run(&c, src, &RuleSet::default());
        let r = report(out);
        assert_eq!(r.summary.errors, 0);
        assert_eq!(r.summary.warnings, 1);
        assert!(r.passed());
        assert_eq!(r.exit_code(), 0);
    }

    #[test]
    fn test_missing_property_is_exactly_one_presence_error() {
        let c = contract(
            r#"{"component": "Toggle", "properties": {"checked": {"required": true, "default": false}, "label": {"required": false, "default": ""}}}"#,
        );
        let out = run(&c, "export class Toggle {}", &RuleSet::default());
        let presence: Vec<_> = out
            .iter()
            .filter(|o| o.rule == RuleKind::Presence && o.severity == Severity::Error)
            .collect();
        assert_eq!(presence.len(), 1);
        assert_eq!(presence[0].subject, "checked");
        let label = out.iter().find(|o| o.subject == "label").unwrap();
        assert_eq!(label.severity, Severity::Warning);
    }

    #[test]
    fn test_missing_property_and_union_both_reported() {
        let c = contract(
            r#"{"component": "Button", "properties": {"size": {"required": true, "default": "md", "allowedValues": ["sm", "md"]}}}"#,
        );
        let out = run(&c, "", &RuleSet::default());
        let errs = errors(&out);
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].rule, RuleKind::Presence);
        assert_eq!(errs[1].rule, RuleKind::AllowedValues);
        assert!(errs[1].message.contains("no type union found"));
    }

    #[test]
    fn test_extra_union_values_warn_without_failing() {
        let c = contract(
            r#"{"component": "Button", "properties": {"size": {"required": true, "default": "md", "allowedValues": ["sm", "md"]}}}"#,
        );
        let src = "type Size = 'xs' | 'sm' | 'md';\n@property() size: Size = 'md';";
        let out = run(&c, src, &RuleSet::default());
        let warn = out
            .iter()
            .find(|o| o.rule == RuleKind::AllowedValues)
            .unwrap();
        assert_eq!(warn.severity, Severity::Warning);
        assert!(warn.message.contains("extra value not in contract: xs"));
        assert!(report(out).passed());
    }

    #[test]
    fn test_default_comparison_ignores_case_and_quotes() {
        let c = contract(
            r#"{"component": "Button", "properties": {"variant": {"required": true, "default": "Primary"}}}"#,
        );
        let out = run(&c, "@property() variant = \"primary\";", &RuleSet::default());
        assert!(errors(&out).is_empty());
        assert_eq!(normalize(" 'Primary' "), "primary");
    }

    #[test]
    fn test_inline_and_boolean_unions() {
        let c = contract(
            r#"{"component": "Checkbox", "properties": {
                "state": {"required": true, "default": "on", "allowedValues": ["on", "off"]},
                "checked": {"required": true, "default": false, "allowedValues": [true, false]}
            }}"#,
        );
        let src = "@property() state: 'on' | 'off' = 'on';\n@property() checked: boolean = false;";
        let out = run(&c, src, &RuleSet::default());
        assert!(errors(&out).is_empty(), "{:#?}", out);
        assert_eq!(
            out.iter()
                .filter(|o| o.rule == RuleKind::AllowedValues && o.severity == Severity::Pass)
                .count(),
            2
        );
    }

    #[test]
    fn test_optional_annotation_resolves_alias() {
        let c = contract(
            r#"{"component": "Button", "properties": {"size": {"required": true, "default": "md", "allowedValues": ["sm", "md", "lg"]}}}"#,
        );
        let src = "export type Size = 'sm' | 'md' | 'lg';\n@property() size: Size | undefined = 'md';";
        let out = run(&c, src, &RuleSet::default());
        assert!(errors(&out).is_empty(), "{:#?}", out);
        let allowed = out
            .iter()
            .find(|o| o.rule == RuleKind::AllowedValues)
            .unwrap();
        assert_eq!(allowed.severity, Severity::Pass);
        assert_eq!(allowed.message, "`size` (Size | undefined) covers [sm, md, lg]");
    }

    #[test]
    fn test_semicolonless_source_passes() {
        let c = contract(
            r#"{"component": "Button", "properties": {
                "size": {"required": true, "default": "md", "allowedValues": ["sm", "md", "lg"]},
                "variant": {"required": true, "default": "primary", "allowedValues": ["primary", "ghost"]}
            }}"#,
        );
        let src = "export type Size = 'sm' | 'md' | 'lg'\nexport type Variant = 'primary' | 'ghost'\n\n@property() size: Size = 'md'\n@property() variant: Variant = 'primary'\n";
        let out = run(&c, src, &RuleSet::default());
        let r = report(out);
        assert_eq!(r.summary.errors, 0, "{:#?}", r.outcomes);
        assert_eq!(r.summary.warnings, 0, "{:#?}", r.outcomes);
        assert!(r.passed());
    }

    #[test]
    fn test_semicolonless_missing_token_only_warns() {
        let c = contract(
            r##"{"component": "Badge", "properties": {"tone": {"required": true, "default": "info", "allowedValues": ["info", "success"]}}, "designTokens": {"radius": "8px", "bg": "#E8F0FE"}}"##,
        );
        let src = "export type Tone = 'info' | 'success'\nexport class DsBadge {\n  @property() tone: Tone = 'info'\n  radius = '8px'\n}\n";
        let r = report(run(&c, src, &RuleSet::default()));
        assert_eq!(r.summary.errors, 0, "{:#?}", r.outcomes);
        assert_eq!(r.summary.warnings, 1);
        assert_eq!(r.exit_code(), 0);
    }

    #[test]
    fn test_literal_fallback_without_union() {
        let c = contract(
            r#"{"component": "Tooltip", "properties": {"placement": {"required": true, "default": "top", "allowedValues": ["top", "bottom"]}}}"#,
        );
        let src = "@property() placement = 'top';\nif (p === 'bottom') {}";
        let out = run(&c, src, &RuleSet::default());
        assert!(errors(&out).is_empty());
    }

    #[test]
    fn test_markers_and_notes_follow_properties_and_tokens() {
        let c = contract(
            r##"{"component": "Toggle", "properties": {"checked": {"required": true, "default": false}}, "designTokens": {"track": "#34A853"}}"##,
        );
        let rules = RuleSet {
            markers: vec![
                MarkerRule::new("Semantics", &["role=\"switch\""], Severity::Error, "switch role"),
                MarkerRule::new("ARIA", &["aria-checked"], Severity::Warning, "checked state"),
            ],
            notes: vec![Note::new("contrast", "check it")],
        };
        let src = "@property() checked = false;\nrender() { return html`<div role=\"switch\"></div>`; }";
        let out = run(&c, src, &rules);
        let kinds: Vec<_> = out.iter().map(|o| o.rule).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::Presence,
                RuleKind::Default,
                RuleKind::DesignToken,
                RuleKind::Marker,
                RuleKind::Marker,
                RuleKind::Note,
            ]
        );
        assert_eq!(out[3].severity, Severity::Pass);
        assert_eq!(out[4].severity, Severity::Warning);
        assert_eq!(out[5].severity, Severity::Info);
    }

    #[test]
    fn test_full_match_has_no_errors_and_is_deterministic() {
        let c = contract(
            r#"{"component": "Button", "version": "2.0.0", "properties": {
                "variant": {"required": true, "default": "primary", "allowedValues": ["primary", "secondary"]},
                "size": {"required": true, "default": "md", "allowedValues": ["sm", "md", "lg"]}
            }, "designTokens": {"radius": "8px"}}"#,
        );
        let src = r#"
export type ButtonVariant = 'primary' | 'secondary';
export type Size = 'sm' | 'md' | 'lg';
@property({ reflect: true }) variant: ButtonVariant = 'primary';
@property() size: Size = 'md';
static styles = css`:host { border-radius: 8px; }`;
"#;
        let rules = crate::rules::builtin("button");
        let first = run(&c, src, &rules);
        let second = run(&c, src, &rules);
        assert_eq!(first, second);
        let r = report(first);
        assert_eq!(r.summary.errors, 1); // no <button> element in this source
        let prop_errors = r
            .outcomes
            .iter()
            .filter(|o| o.severity == Severity::Error && o.rule != RuleKind::Marker)
            .count();
        assert_eq!(prop_errors, 0);
    }
}
