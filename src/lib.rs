//! Client intake questionnaire for tax planning.
//!
//! A catalog of sections and questions drives the session; questions may be
//! hidden behind an earlier answer, and a set of result rules turns the
//! collected answers into the strategies worth discussing with the client.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod services;

pub use catalog::{
    all_questions, find_question, find_result, find_section, load_catalog, CatalogError,
    LoadedCatalog,
};
pub use cli::{Cli, Commands, ContactCommands, ExportFormat};
pub use domain::answers::{load_answers, AnswerValue, Answers, AnswersError};
pub use domain::models::{
    ConditionTrace, ContactInfo, EvaluationReport, ExportReceipt, MatchedResult, Outcome,
    QuestionView, ReportedResult, ResultTrace, SectionSummary, SessionSummary, Settings,
    Severity, ValidationReport,
};
pub use domain::questionnaire::{
    Condition, Operator, Predicate, Question, QuestionType, Questionnaire, ResultDefinition,
    Section,
};
pub use services::contact::{
    contact_from_parts, sync_contact, ContactError, ContactSyncPayload, SyncError,
};
pub use services::evaluator::{evaluate_results, explain};
pub use services::export::{build_report, write_report};
pub use services::markup::{parse_blocks, render_text};
pub use services::output::{print_error, print_one, print_out};
pub use services::storage::load_settings;
pub use services::validation::validate_catalog;
pub use services::visibility::{hidden_answered, is_visible, prune_hidden};
pub use services::wizard::{Wizard, WizardError};

/// Stable error code for the JSON error envelope.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CatalogError>() {
            return match e {
                CatalogError::QuestionNotFound(_)
                | CatalogError::SectionNotFound(_)
                | CatalogError::ResultNotFound(_) => "NOT_FOUND",
                _ => "CATALOG_INVALID",
            };
        }
        if cause.downcast_ref::<AnswersError>().is_some() {
            return "ANSWERS_INVALID";
        }
        if cause.downcast_ref::<ContactError>().is_some() {
            return "CONTACT_INVALID";
        }
        if cause.downcast_ref::<SyncError>().is_some() {
            return "SYNC_FAILED";
        }
    }
    "INTERNAL"
}
