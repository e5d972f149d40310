//! Output rendering for validation reports and component listings.
//!
//! Supports `human` (default) and `json` outputs. Colour is purely a
//! rendering concern; the report itself never carries escape codes.

use crate::models::report::Report;
use crate::models::{Outcome, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

#[derive(Debug, Clone, Copy)]
/// Human rendering switches.
pub struct Style {
    pub color: bool,
    pub show_passes: bool,
}

/// Print a report in the requested format.
pub fn print_report(report: &Report, output: &str, style: Style) {
    match output {
        "json" => println!("{}", render_json(&compose_report_json(report))),
        _ => print!("{}", render_human(report, style)),
    }
}

/// Print the component names that have a contract.
pub fn print_components(names: &[String], output: &str) {
    match output {
        "json" => println!(
            "{}",
            render_json(&json!({"components": names, "total": names.len()}))
        ),
        _ => {
            for n in names {
                println!("{}", n);
            }
        }
    }
}

fn render_json(value: &JsonVal) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        json!({"error": format!("failed to serialize report: {}", e)}).to_string()
    })
}

fn tag(sev: Severity, color: bool) -> String {
    let (icon, label) = match sev {
        Severity::Error => ("✖", "⟦fail⟧"),
        Severity::Warning => ("▲", "⟦warn⟧"),
        Severity::Info => ("◆", "⟦info⟧"),
        Severity::Pass => ("✔", "⟦pass⟧"),
    };
    if !color {
        return format!("{} {}", icon, label);
    }
    match sev {
        Severity::Error => format!("{} {}", icon.red(), label.red().bold()),
        Severity::Warning => format!("{} {}", icon.yellow(), label.yellow().bold()),
        Severity::Info => format!("{} {}", icon.blue(), label.blue().bold()),
        Severity::Pass => format!("{} {}", icon.green(), label.green().bold()),
    }
}

fn render_outcome(o: &Outcome, color: bool, out: &mut String) {
    out.push_str(&format!("  {} {}\n", tag(o.severity, color), o.message));
    if let Some(rec) = &o.recommendation {
        if color {
            out.push_str(&format!("      {} {}\n", "↳".bright_black(), rec.bright_black()));
        } else {
            out.push_str(&format!("      ↳ {}\n", rec));
        }
    }
}

/// Render the human report: categories in first-appearance order, errors
/// first inside each category, then the summary block.
pub fn render_human(report: &Report, style: Style) -> String {
    let mut out = String::new();
    let header = format!(
        "{} contract v{} — {}",
        report.component, report.contract_version, report.source
    );
    if style.color {
        out.push_str(&format!("{}\n", header.bold()));
    } else {
        out.push_str(&format!("{}\n", header));
    }
    for (category, items) in report.grouped() {
        let visible: Vec<_> = items
            .into_iter()
            .filter(|o| style.show_passes || o.severity != Severity::Pass)
            .collect();
        if visible.is_empty() {
            continue;
        }
        out.push('\n');
        if style.color {
            out.push_str(&format!("{}\n", category.cyan().bold()));
        } else {
            out.push_str(&format!("{}\n", category));
        }
        for o in visible {
            render_outcome(o, style.color, &mut out);
        }
    }
    let s = &report.summary;
    let summary = format!(
        "— Summary — total={} passed={} warnings={} errors={} infos={}",
        s.total, s.passes, s.warnings, s.errors, s.infos
    );
    let verdict = if s.passed { "PASSED" } else { "FAILED" };
    out.push('\n');
    if style.color {
        out.push_str(&format!("{}\n", summary.bold()));
        if s.passed {
            out.push_str(&format!("{}\n", verdict.green().bold()));
        } else {
            out.push_str(&format!("{}\n", verdict.red().bold()));
        }
    } else {
        out.push_str(&format!("{}\n{}\n", summary, verdict));
    }
    out
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}
