//! Built-in marker rule sets for the design-system component families.
//!
//! A `[families.<name>]` table in `dscheck.toml` replaces the built-in set
//! for that family entirely.

use crate::models::rules::{MarkerRule, Note, RuleSet};
use crate::models::Severity;
use std::collections::HashMap;

pub const FAMILIES: &[&str] = &[
    "badge",
    "button",
    "button-group",
    "checkbox",
    "input-field",
    "toggle",
    "tooltip",
];

fn contrast_note() -> Note {
    Note::new(
        "colour contrast ratios cannot be verified from source text",
        "check text and focus-ring contrast against WCAG 2.1 AA (4.5:1 text, 3:1 UI) in the rendered component",
    )
}

fn focus_visible() -> MarkerRule {
    MarkerRule::new(
        "Focus",
        &[":focus-visible"],
        Severity::Warning,
        "focus indicator styled with :focus-visible",
    )
    .recommend("add a :focus-visible outline so keyboard users can see focus")
}

fn disabled_aria() -> MarkerRule {
    MarkerRule::new(
        "Disabled State",
        &["aria-disabled"],
        Severity::Warning,
        "disabled state exposed through aria-disabled",
    )
    .recommend("reflect the `disabled` property to aria-disabled")
}

/// Built-in rule set for `family`; unknown families only get the contrast note.
pub fn builtin(family: &str) -> RuleSet {
    let markers = match family {
        "button" => vec![
            MarkerRule::new(
                "Semantics",
                &["<button", "role=\"button\"", "role='button'"],
                Severity::Error,
                "renders a native <button> or role=\"button\"",
            )
            .recommend("render a <button> element inside the shadow root"),
            disabled_aria(),
            MarkerRule::new(
                "ARIA",
                &["aria-busy"],
                Severity::Warning,
                "loading state announced with aria-busy",
            ),
            focus_visible(),
        ],
        "checkbox" => vec![
            MarkerRule::new(
                "Semantics",
                &["type=\"checkbox\"", "role=\"checkbox\"", "role='checkbox'"],
                Severity::Error,
                "exposes checkbox semantics",
            )
            .recommend("use <input type=\"checkbox\"> or role=\"checkbox\""),
            MarkerRule::new(
                "ARIA",
                &["aria-checked", ".checked"],
                Severity::Error,
                "checked state is exposed to assistive technology",
            ),
            MarkerRule::new(
                "ARIA",
                &["indeterminate", "aria-checked=\"mixed\""],
                Severity::Warning,
                "indeterminate state supported",
            ),
            MarkerRule::new(
                "Labelling",
                &["<label", "aria-label", "aria-labelledby"],
                Severity::Warning,
                "checkbox is associated with a label",
            ),
            disabled_aria(),
            focus_visible(),
        ],
        "toggle" => vec![
            MarkerRule::new(
                "Semantics",
                &["role=\"switch\"", "role='switch'"],
                Severity::Error,
                "exposes role=\"switch\"",
            )
            .recommend("set role=\"switch\" on the interactive element"),
            MarkerRule::new(
                "ARIA",
                &["aria-checked"],
                Severity::Error,
                "on/off state is exposed through aria-checked",
            ),
            MarkerRule::new(
                "Keyboard",
                &["keydown", "@keydown", "onkeydown"],
                Severity::Warning,
                "toggles with the keyboard (Space/Enter)",
            ),
            disabled_aria(),
            focus_visible(),
        ],
        "tooltip" => vec![
            MarkerRule::new(
                "Semantics",
                &["role=\"tooltip\"", "role='tooltip'"],
                Severity::Error,
                "exposes role=\"tooltip\"",
            ),
            MarkerRule::new(
                "ARIA",
                &["aria-describedby"],
                Severity::Warning,
                "trigger references the tooltip with aria-describedby",
            ),
            MarkerRule::new(
                "Keyboard",
                &["'Escape'", "\"Escape\""],
                Severity::Warning,
                "tooltip can be dismissed with Escape (WCAG 1.4.13)",
            ),
            MarkerRule::new(
                "Focus",
                &["focusin", "@focus", "'focus'", "\"focus\""],
                Severity::Warning,
                "tooltip opens on keyboard focus, not only on hover",
            ),
        ],
        "badge" => vec![
            MarkerRule::new(
                "ARIA",
                &["aria-label", "role=\"status\"", "role='status'"],
                Severity::Warning,
                "badge content is announced (aria-label or role=\"status\")",
            ),
            MarkerRule::new(
                "Semantics",
                &["<slot"],
                Severity::Warning,
                "badge content is projected through a <slot>",
            ),
        ],
        "button-group" => vec![
            MarkerRule::new(
                "Semantics",
                &["role=\"group\"", "role='group'", "role=\"toolbar\""],
                Severity::Error,
                "group is exposed with role=\"group\"",
            ),
            MarkerRule::new(
                "Labelling",
                &["aria-label"],
                Severity::Warning,
                "group carries an accessible name",
            ),
            MarkerRule::new(
                "Semantics",
                &["<slot"],
                Severity::Error,
                "buttons are projected through a <slot>",
            ),
        ],
        "input-field" => vec![
            MarkerRule::new(
                "Semantics",
                &["<input", "<textarea"],
                Severity::Error,
                "renders a native <input>",
            ),
            MarkerRule::new(
                "Labelling",
                &["<label", "aria-labelledby"],
                Severity::Error,
                "input is associated with a <label>",
            )
            .recommend("render a <label for=...> bound to the input id"),
            MarkerRule::new(
                "ARIA",
                &["aria-invalid"],
                Severity::Warning,
                "error state exposed with aria-invalid",
            ),
            MarkerRule::new(
                "ARIA",
                &["aria-describedby"],
                Severity::Warning,
                "helper/error text linked with aria-describedby",
            ),
            disabled_aria(),
            focus_visible(),
        ],
        _ => Vec::new(),
    };
    RuleSet {
        markers,
        notes: vec![contrast_note()],
    }
}

/// Effective rule set: configured family wins over the built-in one.
pub fn resolve(family: &str, configured: &HashMap<String, RuleSet>) -> RuleSet {
    match configured.get(family) {
        Some(rs) => rs.clone(),
        None => builtin(family),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_has_markers_and_contrast_note() {
        for fam in FAMILIES {
            let rs = builtin(fam);
            assert!(!rs.markers.is_empty(), "{} has no markers", fam);
            assert_eq!(rs.notes.len(), 1);
        }
    }

    #[test]
    fn test_unknown_family_only_carries_note() {
        let rs = builtin("carousel");
        assert!(rs.markers.is_empty());
        assert_eq!(rs.notes.len(), 1);
    }

    #[test]
    fn test_configured_family_replaces_builtin() {
        let mut cfg = HashMap::new();
        cfg.insert(
            "button".to_string(),
            RuleSet {
                markers: vec![MarkerRule::new(
                    "ARIA",
                    &["aria-pressed"],
                    Severity::Error,
                    "pressed",
                )],
                notes: Vec::new(),
            },
        );
        let rs = resolve("button", &cfg);
        assert_eq!(rs.markers.len(), 1);
        assert!(rs.notes.is_empty());
        assert_eq!(resolve("toggle", &cfg).markers.len(), 5);
    }
}
