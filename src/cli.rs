use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "intake", version, about = "Tax planning client intake questionnaire")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "INTAKE_CATALOG",
        help = "Questionnaire catalog (file, directory or URL); defaults to the built-in catalog"
    )]
    pub catalog: Option<String>,
    #[arg(
        long,
        global = true,
        env = "INTAKE_CONFIG",
        help = "Config file (default ~/.config/intake/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint the catalog for unreachable questions and malformed rules.
    Validate,
    /// List questionnaire sections.
    Sections,
    /// List questions, optionally with visibility against an answers file.
    Questions {
        #[arg(long)]
        section: Option<String>,
        #[arg(long)]
        answers: Option<PathBuf>,
    },
    /// List the questions currently visible for a set of answers.
    Visible {
        #[arg(long)]
        answers: PathBuf,
        #[arg(long)]
        section: Option<String>,
    },
    /// Evaluate result rules against an answers file.
    Evaluate {
        #[arg(long)]
        answers: PathBuf,
        #[arg(long, default_value_t = false, help = "Drop answers to hidden questions first")]
        prune_hidden: bool,
    },
    /// Show why each result did or did not match.
    Explain {
        #[arg(long)]
        answers: PathBuf,
        result: Option<String>,
    },
    /// Print a result's title and rendered body.
    Show { result: String },
    /// Write a results report for an answers file.
    Export {
        #[arg(long)]
        answers: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Run the questionnaire interactively.
    Run {
        #[arg(long)]
        export: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
        #[arg(long, default_value_t = false)]
        no_sync: bool,
    },
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// Send contact details (and matched results) to the configured endpoint.
    Sync {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        answers: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Json,
}
