//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dscheck",
    version,
    about = "Design-system contract conformance checker",
    long_about = "dscheck — validate a UI component's source against its design contract.\n\nConfiguration precedence: CLI > dscheck.toml > defaults.",
    after_help = "Examples:\n  dscheck validate button\n  dscheck validate \"Button Group\" --output json\n  dscheck list\n  dscheck extract --component Button",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current dscheck version."
    )]
    Version,
    /// Validate one component against its contract
    #[command(
        about = "Validate a component",
        long_about = "Scan the component source and evaluate every contract and accessibility rule. Exit 0 when no errors, 1 on errors, 2 on configuration problems.",
        after_help = "Examples:\n  dscheck validate button\n  dscheck validate toggle --quiet\n  dscheck validate checkbox --output json"
    )]
    Validate {
        #[arg(help = "Component name (e.g. button, \"Button Group\", input-field)")]
        component: String,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Contracts directory (default: .figma/contracts)")]
        contracts: Option<String>,
        #[arg(long, help = "Component sources directory (default: src/components)")]
        sources: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable coloured output")]
        no_color: bool,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Hide passing checks")]
        quiet: bool,
    },
    /// List components that have a contract
    #[command(
        about = "List components",
        long_about = "List component names found in the contracts directory or configured in dscheck.toml."
    )]
    List {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Contracts directory (default: .figma/contracts)")]
        contracts: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Extract component nodes from a design file export
    #[command(
        about = "Extract components",
        long_about = "Find COMPONENT nodes whose name contains the given text in a design file export and cache their style fields as JSON.",
        after_help = "Examples:\n  dscheck extract --component Button\n  dscheck extract --component Toggle --file export.json --limit 20"
    )]
    Extract {
        #[arg(long, help = "Text the component node name must contain (e.g. Button)")]
        component: String,
        #[arg(long, help = "Design file export (default: .figma/cache/file-full.json)")]
        file: Option<String>,
        #[arg(long, help = "Output file (default: .figma/cache/<component>-components.json)")]
        out: Option<String>,
        #[arg(long, help = "Number of components to write (default: 10)")]
        limit: Option<usize>,
    },
}
