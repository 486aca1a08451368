//! Questionnaire document: sections of questions plus the strategy result rules.
//!
//! The wire format is the camelCase document the questionnaire content is
//! authored in. Conditions are read both from the legacy
//! `{questionId, operator, value, subConditions}` shape and from explicit
//! `{"all": [...]}` / `{"any": [...]}` groups, and are normalized into the
//! [`Condition`] tree.

use super::answers::AnswerValue;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    #[serde(default)]
    pub welcome: Welcome,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub results: Vec<ResultDefinition>,
    #[serde(default)]
    pub thank_you: ThankYou,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Welcome {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub introduction: Vec<String>,
    #[serde(default)]
    pub areas: Vec<String>,
    #[serde(default)]
    pub disclaimer: String,
    #[serde(default)]
    pub compliance: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThankYou {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub closing_statement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    YesNo,
    SingleChoice,
    Numeric,
    Text,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuestionType::YesNo => "yes-no",
            QuestionType::SingleChoice => "single-choice",
            QuestionType::Numeric => "numeric",
            QuestionType::Text => "text",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_on: Option<ConditionalOn>,
}

impl Question {
    pub fn is_required(&self) -> bool {
        self.validation
            .as_ref()
            .map(|v| v.required)
            .unwrap_or(false)
    }

    /// Values a dependant question may be conditioned on, if the type has a closed set.
    pub fn allowed_values(&self) -> Option<Vec<&str>> {
        match self.kind {
            QuestionType::YesNo => Some(vec!["yes", "no"]),
            QuestionType::SingleChoice => {
                Some(self.options.iter().map(|o| o.value.as_str()).collect())
            }
            QuestionType::Numeric | QuestionType::Text => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Validation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalOn {
    pub question_id: String,
    pub value: Expected,
}

/// What a dependency answer has to be for a conditional question to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    AnyOf(Vec<String>),
    One(AnswerValue),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDefinition {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
    Set(Vec<String>),
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => write!(f, "{:?}", s),
            ConditionValue::Set(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Equals,
    GreaterThan,
    LessThan,
    Includes,
    Unrecognized(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::Includes => "includes",
            Operator::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for Operator {
    fn from(raw: &str) -> Self {
        match raw {
            "equals" => Operator::Equals,
            "greaterThan" => Operator::GreaterThan,
            "lessThan" => Operator::LessThan,
            "includes" => Operator::Includes,
            other => Operator::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub question_id: String,
    pub operator: Operator,
    pub value: Option<ConditionValue>,
}

/// Rule tree attached to a result. Top-level conditions of a result are AND-ed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConditionWire", into = "ConditionWire")]
pub enum Condition {
    Leaf(Predicate),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn leaf(
        question_id: impl Into<String>,
        operator: Operator,
        value: impl Into<Option<ConditionValue>>,
    ) -> Self {
        Condition::Leaf(Predicate {
            question_id: question_id.into(),
            operator,
            value: value.into(),
        })
    }

    /// Every predicate in the tree, depth first.
    pub fn predicates(&self) -> Vec<&Predicate> {
        let mut out = Vec::new();
        self.collect_predicates(&mut out);
        out
    }

    fn collect_predicates<'a>(&'a self, out: &mut Vec<&'a Predicate>) {
        match self {
            Condition::Leaf(p) => out.push(p),
            Condition::All(children) | Condition::Any(children) => {
                for c in children {
                    c.collect_predicates(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ConditionWire {
    All { all: Vec<ConditionWire> },
    Any { any: Vec<ConditionWire> },
    Legacy(LegacyCondition),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCondition {
    question_id: String,
    operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<ConditionValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_conditions: Vec<LegacyCondition>,
}

impl LegacyCondition {
    fn into_leaf(self) -> Condition {
        Condition::leaf(self.question_id, Operator::from(self.operator.as_str()), self.value)
    }
}

impl From<LegacyCondition> for Condition {
    fn from(raw: LegacyCondition) -> Self {
        // Sub-conditions are single-level predicates; anything nested below them is ignored.
        let subs: Vec<Condition> = raw
            .sub_conditions
            .iter()
            .cloned()
            .map(|s| {
                Condition::leaf(s.question_id, Operator::from(s.operator.as_str()), s.value)
            })
            .collect();
        let operator = raw.operator.clone();
        match operator.as_str() {
            // Legacy groups always AND their children; a real OR needs `{"any": [...]}`.
            "and" | "or" => Condition::All(subs),
            _ if subs.is_empty() => raw.into_leaf(),
            _ => {
                let mut all = Vec::with_capacity(subs.len() + 1);
                all.push(
                    LegacyCondition {
                        sub_conditions: vec![],
                        ..raw
                    }
                    .into_leaf(),
                );
                all.extend(subs);
                Condition::All(all)
            }
        }
    }
}

impl From<ConditionWire> for Condition {
    fn from(wire: ConditionWire) -> Self {
        match wire {
            ConditionWire::All { all } => Condition::All(all.into_iter().map(Into::into).collect()),
            ConditionWire::Any { any } => Condition::Any(any.into_iter().map(Into::into).collect()),
            ConditionWire::Legacy(raw) => raw.into(),
        }
    }
}

impl From<Condition> for ConditionWire {
    fn from(c: Condition) -> Self {
        match c {
            Condition::Leaf(p) => ConditionWire::Legacy(LegacyCondition {
                question_id: p.question_id,
                operator: p.operator.as_str().to_string(),
                value: p.value,
                sub_conditions: vec![],
            }),
            Condition::All(children) => ConditionWire::All {
                all: children.into_iter().map(Into::into).collect(),
            },
            Condition::Any(children) => ConditionWire::Any {
                any: children.into_iter().map(Into::into).collect(),
            },
        }
    }
}
