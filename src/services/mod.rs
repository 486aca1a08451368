//! Service layer: the questionnaire logic and its side-effect helpers.
//!
//! ## Service map
//! - `visibility.rs`: conditional question visibility, stale answer pruning.
//! - `evaluator.rs`: result rule evaluation and match explanations.
//! - `validation.rs`: catalog lint.
//! - `markup.rs`: result body parsing and text/markdown rendering.
//! - `contact.rs`: contact field validation and CRM sync.
//! - `export.rs`: results report assembly and writing.
//! - `wizard.rs`: interactive questionnaire session.
//! - `storage.rs`: config file loading.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - `visibility` and `evaluator` are pure and never fail.
//! - Side effects (network, files, terminal) stay in `contact`, `export`,
//!   `storage`, `output` and `wizard`.

pub mod contact;
pub mod evaluator;
pub mod export;
pub mod markup;
pub mod output;
pub mod storage;
pub mod validation;
pub mod visibility;
pub mod wizard;
