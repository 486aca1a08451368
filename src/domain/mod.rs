//! Shared data model layer (structs/enums only).
//!
//! ## Files
//! - `questionnaire.rs`: sections, questions and the result rule tree.
//! - `answers.rs`: the per-session answer store.
//! - `models.rs`: settings, contact details, report/output structs.
//!
//! ## Rule of thumb
//! Domain types are data-only: no filesystem/network side effects beyond
//! reading an answers document.
//!
//! ## Compatibility note
//! Report structs define the `--json` output and are checked against
//! `docs/contracts/*`; keep schema-impacting changes explicit.

pub mod answers;
pub mod models;
pub mod questionnaire;
