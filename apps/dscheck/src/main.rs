//! dscheck CLI binary entry point.
//! Delegates to the library for validation and extraction and prints results.

use clap::Parser;
use dscheck::cli::{Cli, Commands};
use dscheck::config::{self, CliOverrides, Effective};
use dscheck::output::{self, Style};
use dscheck::{figma, logging, runner, utils};
use std::path::PathBuf;

/// Exit code for anything that prevented validation from running.
const EXIT_CONFIG: i32 = 2;

fn fail_config(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", utils::error_prefix(), msg);
    std::process::exit(EXIT_CONFIG);
}

fn effective(cli: &CliOverrides) -> Effective {
    let eff = match config::resolve_effective(cli) {
        Ok(eff) => eff,
        Err(e) => fail_config(e),
    };
    if !eff.config_found && eff.output != "json" {
        eprintln!(
            "{} No dscheck.toml found; using defaults.",
            utils::note_prefix()
        );
    }
    eff
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Validate {
            component,
            repo_root,
            contracts,
            sources,
            output,
            no_color,
            quiet,
        } => {
            let eff = effective(&CliOverrides {
                repo_root: repo_root.as_deref(),
                contracts: contracts.as_deref(),
                sources: sources.as_deref(),
                output: output.as_deref(),
                no_color,
                quiet,
            });
            let report = match runner::run_validation(&eff, &component) {
                Ok(r) => r,
                Err(e) => fail_config(e),
            };
            output::print_report(
                &report,
                &eff.output,
                Style {
                    color: eff.color && eff.output != "json",
                    show_passes: eff.show_passes,
                },
            );
            std::process::exit(report.exit_code());
        }
        Commands::List {
            repo_root,
            contracts,
            output,
        } => {
            let eff = effective(&CliOverrides {
                repo_root: repo_root.as_deref(),
                contracts: contracts.as_deref(),
                output: output.as_deref(),
                ..Default::default()
            });
            let names = runner::list_components(&eff);
            if names.is_empty() && eff.output != "json" {
                eprintln!(
                    "{} No contracts found under {}",
                    utils::info_prefix(),
                    eff.contracts_dir.to_string_lossy()
                );
            }
            output::print_components(&names, &eff.output);
        }
        Commands::Extract {
            component,
            file,
            out,
            limit,
        } => {
            let file = PathBuf::from(file.unwrap_or_else(|| figma::DEFAULT_FILE.to_string()));
            let out = out
                .map(PathBuf::from)
                .unwrap_or_else(|| figma::default_out(&component));
            let limit = limit.unwrap_or(figma::DEFAULT_LIMIT);
            match figma::extract_components(&file, &component, &out, limit) {
                Ok(ex) => {
                    println!("Found {} {} components", ex.components.len(), component);
                    println!("Variants ({}):", ex.variants.len());
                    for (name, count) in &ex.variants {
                        println!("  - {} ({} instances)", name, count);
                    }
                    println!(
                        "Wrote first {} components to {}",
                        ex.written,
                        ex.out.to_string_lossy()
                    );
                }
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(1);
                }
            }
        }
    }
}
