use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use proviso::cli::{Args, Command};
use proviso::output::{
    render_capabilities, render_check_report, render_match_report, render_requirements,
    CheckReport, MatchReport, NamespaceMatch, RequirementCheck,
};
use proviso::{capabilities_from_header, matches, parse_filter, requirements_from_header, satisfies};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &args.command {
        Command::Provide { header } => {
            let header = resolve_header(header)?;
            let capabilities =
                capabilities_from_header(&header).context("failed to parse provide header")?;
            println!("{}", render_capabilities(&capabilities, &args.format)?);
        }
        Command::Require { header } => {
            let header = resolve_header(header)?;
            let requirements =
                requirements_from_header(&header).context("failed to parse require header")?;
            println!("{}", render_requirements(&requirements, &args.format)?);
        }
        Command::Match { capability, filter } => {
            let header = resolve_header(capability)?;
            let capabilities =
                capabilities_from_header(&header).context("failed to parse capability header")?;
            let node = parse_filter(filter).context("failed to parse filter")?;
            debug!(%node, "evaluating filter");

            let results: Vec<NamespaceMatch> = capabilities
                .iter()
                .map(|cap| NamespaceMatch {
                    namespace: cap.namespace.clone(),
                    matched: matches(cap, &node),
                })
                .collect();
            let report = MatchReport {
                filter: node.to_string(),
                matched: results.iter().any(|r| r.matched),
                results,
            };
            println!("{}", render_match_report(&report, &args.format)?);
            if !report.matched {
                std::process::exit(1);
            }
        }
        Command::Check {
            capability,
            requirement,
        } => {
            let cap_header = resolve_header(capability)?;
            let req_header = resolve_header(requirement)?;
            let capabilities = capabilities_from_header(&cap_header)
                .context("failed to parse capability header")?;
            let requirements = requirements_from_header(&req_header)
                .context("failed to parse requirement header")?;

            let mut results = Vec::with_capacity(requirements.len());
            for req in &requirements {
                let mut satisfied = false;
                for cap in &capabilities {
                    if satisfies(cap, req).context("failed to evaluate requirement filter")? {
                        satisfied = true;
                        break;
                    }
                }
                results.push(RequirementCheck {
                    namespace: req.namespace.clone(),
                    filter: req.directive("filter").map(str::to_string),
                    satisfied,
                });
            }
            let report = CheckReport {
                satisfied: results.iter().all(|r| r.satisfied),
                results,
            };
            println!("{}", render_check_report(&report, &args.format)?);
            if !report.satisfied {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Resolve a header argument, reading stdin when the argument is "-".
fn resolve_header(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read header from stdin")?;
        Ok(text.trim().to_string())
    } else {
        Ok(arg.to_string())
    }
}
