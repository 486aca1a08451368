use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A single supplied answer: choice/text answers are strings, numeric answers are numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
}

impl AnswerValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            AnswerValue::Number(_) => None,
        }
    }
}

/// Text form of a number as catalog authors write it in value sets: integral
/// values drop the `.0`, `-0` is `0`, and magnitudes outside `[1e-6, 1e21)`
/// use exponent form with an explicit sign (`1e+21`, `1.5e-7`).
fn number_text(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }
    let sci = format!("{:e}", n);
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => sci,
    }
}

/// String form used by set membership.
impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(s) => f.write_str(s),
            AnswerValue::Number(n) => f.write_str(&number_text(*n)),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        AnswerValue::Number(n as f64)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AnswersError {
    #[error("cannot read answers file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid answers document {path}: {message}")]
    Invalid { path: String, message: String },
}

/// The answer store for one questionnaire session, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn remove(&mut self, question_id: &str) -> Option<AnswerValue> {
        self.0.remove(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &AnswerValue) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<AnswerValue>> FromIterator<(K, V)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = Answers::new();
        for (k, v) in iter {
            answers.set(k, v);
        }
        answers
    }
}

/// Reads an answers object from a `.json`, `.yaml` or `.yml` file.
pub fn load_answers(path: &Path) -> Result<Answers, AnswersError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| AnswersError::Read {
        path: display.clone(),
        source,
    })?;
    parse_answers(&raw, is_yaml_path(path)).map_err(|message| AnswersError::Invalid {
        path: display,
        message,
    })
}

pub(crate) fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse_answers(raw: &str, yaml: bool) -> Result<Answers, String> {
    if yaml {
        serde_yaml::from_str(raw).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }
}
