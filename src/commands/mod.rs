//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `catalog.rs`: validate/sections/questions/visible/show.
//! - `results.rs`: evaluate/explain/export over an answers file.
//! - `session.rs`: interactive run and contact sync.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate questionnaire logic to `services/*`.
//! - Keep behavior and output schema stable (see `docs/contracts`).

pub mod catalog;
pub mod results;
pub mod session;

pub use catalog::handle_catalog_commands;
pub use results::handle_result_commands;
pub use session::handle_session_commands;

use crate::*;
use std::process::ExitCode;

/// Everything a command needs once flags, config and catalog are resolved.
pub struct Context {
    pub json: bool,
    pub settings: Settings,
    pub catalog: LoadedCatalog,
}

impl Context {
    pub fn questionnaire(&self) -> &Questionnaire {
        &self.catalog.questionnaire
    }
}

pub fn dispatch(cli: &Cli, ctx: &Context) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Validate
        | Commands::Sections
        | Commands::Questions { .. }
        | Commands::Visible { .. }
        | Commands::Show { .. } => handle_catalog_commands(&cli.command, ctx),
        Commands::Evaluate { .. } | Commands::Explain { .. } | Commands::Export { .. } => {
            handle_result_commands(&cli.command, ctx)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { .. } | Commands::Contact { .. } => {
            handle_session_commands(&cli.command, ctx)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

pub(crate) fn question_view(
    section: &Section,
    question: &Question,
    answers: Option<&Answers>,
) -> QuestionView {
    QuestionView {
        section: section.id.clone(),
        id: question.id.clone(),
        text: question.text.clone(),
        kind: question.kind.to_string(),
        required: question.is_required(),
        depends_on: question
            .conditional_on
            .as_ref()
            .map(|c| c.question_id.clone()),
        visible: answers.map(|a| is_visible(question, a)),
        answer: answers.and_then(|a| a.get(&question.id).cloned()),
    }
}
