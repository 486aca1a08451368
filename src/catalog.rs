use crate::domain::answers::is_yaml_path;
use crate::domain::questionnaire::{Question, Questionnaire, ResultDefinition, Section};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Catalog shipped with the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/questionnaire.json");

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("question not found: {0}")]
    QuestionNotFound(String),
    #[error("section not found: {0}")]
    SectionNotFound(String),
    #[error("result not found: {0}")]
    ResultNotFound(String),
    #[error("no questionnaire.json or questionnaire.yaml in {0}")]
    MissingCatalogFile(String),
    #[error("cannot read catalog {source_name}: {message}")]
    Unreadable {
        source_name: String,
        message: String,
    },
    #[error("cannot fetch catalog {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("invalid catalog {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
}

/// A parsed catalog together with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub source: String,
    pub raw: String,
    pub questionnaire: Questionnaire,
}

impl LoadedCatalog {
    pub fn digest(&self) -> String {
        catalog_digest(&self.raw)
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn resolve_catalog_file(source: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(source);
    if !p.is_dir() {
        return Ok(p.to_path_buf());
    }
    for name in ["questionnaire.json", "questionnaire.yaml", "questionnaire.yml"] {
        let candidate = p.join(name);
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(CatalogError::MissingCatalogFile(source.to_string()).into())
}

/// Timeout for remote catalog fetches when the config does not set one.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 3000;

fn cache_path(source: &str) -> Option<PathBuf> {
    let home = std::env::var_os("HOME").filter(|h| !h.is_empty())?;
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let id = hex::encode(hasher.finalize());
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join("intake")
            .join("catalogs")
            .join(format!("{}.json", id)),
    )
}

fn fetch_catalog_text(url: &str, timeout_ms: u64) -> anyhow::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    let resp = client.get(url).send()?.error_for_status()?;
    Ok(resp.text()?)
}

fn write_cache(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)
}

/// Fetches a remote catalog, refreshing `cache` when possible; falls back to it when offline.
fn load_remote_text(url: &str, timeout_ms: u64, cache: Option<&Path>) -> anyhow::Result<String> {
    match fetch_catalog_text(url, timeout_ms) {
        Ok(body) => {
            match cache {
                Some(path) => {
                    if let Err(e) = write_cache(path, &body) {
                        tracing::warn!(url, path = %path.display(), error = %e, "could not cache catalog");
                    }
                }
                None => tracing::warn!(url, "HOME is not set, catalog not cached"),
            }
            Ok(body)
        }
        Err(e) => match cache.filter(|p| p.exists()) {
            Some(path) => {
                tracing::warn!(url, error = %e, "catalog fetch failed, using cached copy");
                std::fs::read_to_string(path).map_err(|read| {
                    CatalogError::Unreadable {
                        source_name: path.display().to_string(),
                        message: read.to_string(),
                    }
                    .into()
                })
            }
            None => Err(CatalogError::Fetch {
                url: url.to_string(),
                message: format!("{:#}", e),
            }
            .into()),
        },
    }
}

pub fn parse_catalog(raw: &str, yaml: bool, source_name: &str) -> anyhow::Result<Questionnaire> {
    let parsed = if yaml {
        serde_yaml::from_str(raw).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| {
        CatalogError::Parse {
            source_name: source_name.to_string(),
            message,
        }
        .into()
    })
}

/// Loads the catalog from a file, directory or URL; `None` selects the built-in catalog.
///
/// `fetch_timeout_ms` only applies to URL sources.
pub fn load_catalog(source: Option<&str>, fetch_timeout_ms: u64) -> anyhow::Result<LoadedCatalog> {
    let Some(source) = source else {
        return Ok(LoadedCatalog {
            source: "builtin".to_string(),
            raw: BUILTIN_CATALOG.to_string(),
            questionnaire: parse_catalog(BUILTIN_CATALOG, false, "builtin")?,
        });
    };

    let (raw, yaml) = if is_remote(source) {
        let yaml = source.ends_with(".yaml") || source.ends_with(".yml");
        let cache = cache_path(source);
        (load_remote_text(source, fetch_timeout_ms, cache.as_deref())?, yaml)
    } else {
        let file = resolve_catalog_file(source)?;
        let raw = std::fs::read_to_string(&file).map_err(|e| CatalogError::Unreadable {
            source_name: file.display().to_string(),
            message: e.to_string(),
        })?;
        (raw, is_yaml_path(&file))
    };
    let questionnaire = parse_catalog(&raw, yaml, source)?;
    tracing::info!(
        source,
        sections = questionnaire.sections.len(),
        results = questionnaire.results.len(),
        "catalog loaded"
    );
    Ok(LoadedCatalog {
        source: source.to_string(),
        raw,
        questionnaire,
    })
}

pub fn catalog_digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn all_questions(q: &Questionnaire) -> impl Iterator<Item = (&Section, &Question)> {
    q.sections
        .iter()
        .flat_map(|s| s.questions.iter().map(move |question| (s, question)))
}

/// Position of a question in the overall question flow.
pub fn question_index(q: &Questionnaire, id: &str) -> Option<usize> {
    all_questions(q).position(|(_, question)| question.id == id)
}

pub fn find_question<'a>(q: &'a Questionnaire, id: &str) -> anyhow::Result<&'a Question> {
    all_questions(q)
        .map(|(_, question)| question)
        .find(|question| question.id == id)
        .ok_or_else(|| CatalogError::QuestionNotFound(id.to_string()).into())
}

pub fn find_section<'a>(q: &'a Questionnaire, id: &str) -> anyhow::Result<&'a Section> {
    q.sections
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| CatalogError::SectionNotFound(id.to_string()).into())
}

pub fn find_result<'a>(q: &'a Questionnaire, id: &str) -> anyhow::Result<&'a ResultDefinition> {
    q.results
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| CatalogError::ResultNotFound(id.to_string()).into())
}
