use crate::cli::ExportFormat;
use crate::domain::answers::{AnswerValue, Answers};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_catalog_timeout_ms() -> u64 {
    crate::catalog::DEFAULT_FETCH_TIMEOUT_MS
}

fn default_token_env() -> String {
    "INTAKE_SYNC_TOKEN".to_string()
}

fn default_export_format() -> ExportFormat {
    ExportFormat::Markdown
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize)]
pub struct GeneralSettings {
    /// Catalog source used when `--catalog` is not given.
    #[serde(default)]
    pub catalog: Option<String>,
    /// Timeout for fetching a catalog from a URL.
    #[serde(default = "default_catalog_timeout_ms")]
    pub catalog_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub prune_hidden_answers: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            catalog: None,
            catalog_timeout_ms: default_catalog_timeout_ms(),
            prune_hidden_answers: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncSettings {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: default_timeout_ms(),
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_export_format")]
    pub format: ExportFormat,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: default_export_format(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct SyncReceipt {
    pub endpoint: String,
    pub status: u16,
}

#[derive(Serialize)]
pub struct SectionSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub question_count: usize,
}

#[derive(Serialize)]
pub struct QuestionView {
    pub section: String,
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub depends_on: Option<String>,
    /// Only known when answers were supplied.
    pub visible: Option<bool>,
    pub answer: Option<AnswerValue>,
}

#[derive(Serialize, Clone)]
pub struct MatchedResult {
    pub id: String,
    pub title: String,
}

#[derive(Serialize)]
pub struct EvaluationReport {
    pub evaluated: usize,
    pub matched_count: usize,
    pub matched: Vec<MatchedResult>,
    /// Answered questions that are currently hidden.
    pub stale_hidden: Vec<String>,
    /// Hidden answers removed before evaluation (`--prune-hidden`).
    pub pruned: Vec<String>,
}

#[derive(Serialize)]
pub struct ResultTrace {
    pub id: String,
    pub title: String,
    pub matched: bool,
    pub conditions: Vec<ConditionTrace>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Met,
    NotMet,
    Skipped,
}

#[derive(Serialize, Debug)]
pub struct ConditionTrace {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConditionTrace>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Serialize, Debug)]
pub struct Issue {
    pub severity: Severity,
    pub location: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ValidationReport {
    pub overall: String,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<Issue>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReportedResult {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResultsReport {
    pub generated_at: String,
    pub catalog_digest: String,
    pub contact: Option<ContactInfo>,
    pub answered: usize,
    pub results: Vec<ReportedResult>,
}

#[derive(Serialize)]
pub struct ExportReceipt {
    pub path: String,
    pub format: ExportFormat,
    pub results: usize,
}

#[derive(Serialize)]
pub struct SessionSummary {
    pub contact: ContactInfo,
    pub answers: Answers,
    pub matched: Vec<String>,
    pub pruned: Vec<String>,
    pub export: Option<ExportReceipt>,
    pub synced: bool,
}
