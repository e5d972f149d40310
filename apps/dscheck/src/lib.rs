//! dscheck core library.
//!
//! Checks a design-system component's implementation text against the
//! contract extracted from the design tool and reports pass / warning /
//! error / info outcomes.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `contract`: Contract loading and invariant checks.
//! - `scan`: Text heuristics extracting `SourceFacts` from a component.
//! - `evaluate`: Rule evaluation producing ordered outcomes.
//! - `rules`: Built-in structural/accessibility marker rule sets.
//! - `runner`: Component resolution and the validate pipeline.
//! - `models`: Contract, rule, outcome and report structs.
//! - `output`: Human/JSON printers.
//! - `figma`: Component node extraction from design file exports.
//! - `error`, `logging`, `utils`: Supporting pieces.
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod evaluate;
pub mod figma;
pub mod logging;
pub mod models;
pub mod output;
pub mod rules;
pub mod runner;
pub mod scan;
pub mod utils;
