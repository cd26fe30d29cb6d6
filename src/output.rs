//! Output formatting for the command line.
//!
//! Two modes: human-readable terminal output with colors, and JSON for
//! machine consumption.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::records::{Capability, Requirement};

/// Result of evaluating a filter against the capabilities of one header.
#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub filter: String,
    pub matched: bool,
    pub results: Vec<NamespaceMatch>,
}

#[derive(Debug, Serialize)]
pub struct NamespaceMatch {
    pub namespace: String,
    pub matched: bool,
}

/// Result of checking requirements against capabilities.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub satisfied: bool,
    pub results: Vec<RequirementCheck>,
}

#[derive(Debug, Serialize)]
pub struct RequirementCheck {
    pub namespace: String,
    pub filter: Option<String>,
    pub satisfied: bool,
}

pub fn render_capabilities(capabilities: &[Capability], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(capabilities)?),
        OutputFormat::Terminal => {
            let mut out = String::new();
            for capability in capabilities {
                render_record(
                    &mut out,
                    &capability.namespace,
                    capability
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.to_string())),
                    capability.directives.iter().map(|(k, v)| (k.as_str(), v.clone())),
                );
            }
            Ok(out)
        }
    }
}

pub fn render_requirements(requirements: &[Requirement], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(requirements)?),
        OutputFormat::Terminal => {
            let mut out = String::new();
            for requirement in requirements {
                render_record(
                    &mut out,
                    &requirement.namespace,
                    requirement
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.to_string())),
                    requirement.directives.iter().map(|(k, v)| (k.as_str(), v.clone())),
                );
            }
            Ok(out)
        }
    }
}

fn render_record<'a>(
    out: &mut String,
    namespace: &str,
    attributes: impl Iterator<Item = (&'a str, String)>,
    directives: impl Iterator<Item = (&'a str, String)>,
) {
    out.push_str(&format!("{}\n", namespace.bold()));
    for (key, value) in attributes {
        out.push_str(&format!("  {} = {}\n", key.cyan(), value));
    }
    for (key, value) in directives {
        out.push_str(&format!("  {} := {}\n", key.yellow(), value));
    }
}

pub fn render_match_report(report: &MatchReport, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Terminal => {
            let mut out = String::new();
            out.push_str(&format!("filter: {}\n", report.filter));
            for result in &report.results {
                out.push_str(&format!(
                    "  {} {}\n",
                    result.namespace,
                    verdict(result.matched)
                ));
            }
            out.push_str(&format!("overall: {}\n", verdict(report.matched)));
            Ok(out)
        }
    }
}

pub fn render_check_report(report: &CheckReport, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Terminal => {
            let mut out = String::new();
            for result in &report.results {
                let filter = result.filter.as_deref().unwrap_or("<none>");
                out.push_str(&format!(
                    "  {} filter={} {}\n",
                    result.namespace,
                    filter,
                    verdict(result.satisfied)
                ));
            }
            out.push_str(&format!("overall: {}\n", verdict(report.satisfied)));
            Ok(out)
        }
    }
}

fn verdict(matched: bool) -> String {
    if matched {
        "MATCHED".green().to_string()
    } else {
        "UNMATCHED".red().to_string()
    }
}
