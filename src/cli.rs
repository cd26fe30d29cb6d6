use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "proviso")]
#[command(about = "Parse descriptor headers and match capability filters")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (json, terminal)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a provide-style header into capabilities
    Provide {
        /// Header text ("-" to read from stdin)
        header: String,
    },

    /// Parse a require-style header into requirements
    Require {
        /// Header text ("-" to read from stdin)
        header: String,
    },

    /// Evaluate a filter expression against a capability header
    Match {
        /// Provide-style header describing the candidate capabilities
        #[arg(short, long)]
        capability: String,

        /// Filter expression, e.g. "(&(name=foo)(version>=2.0))"
        #[arg(short = 'F', long)]
        filter: String,
    },

    /// Check whether capabilities satisfy a requirement header
    Check {
        /// Provide-style header describing the candidate capabilities
        #[arg(short, long)]
        capability: String,

        /// Require-style header, filters carried as filter:= directives
        #[arg(short, long)]
        requirement: String,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output for machine consumption
    Json,
    /// Human-readable output
    Terminal,
}
