//! Result selection: which strategy writeups apply to a set of answers.
//!
//! Pure and infallible. Missing answers and type mismatches make a predicate
//! false; nothing here returns an error or panics.

use crate::domain::answers::{AnswerValue, Answers};
use crate::domain::models::{ConditionTrace, Outcome, ResultTrace};
use crate::domain::questionnaire::{Condition, ConditionValue, Operator, Predicate, ResultDefinition};

/// Results whose every top-level condition holds, in catalog order.
pub fn evaluate_results<'a>(
    answers: &Answers,
    results: &'a [ResultDefinition],
) -> Vec<&'a ResultDefinition> {
    results
        .iter()
        .filter(|r| {
            let matched = result_matches(r, answers);
            tracing::debug!(result = %r.id, matched, "evaluated result");
            matched
        })
        .collect()
}

pub fn result_matches(result: &ResultDefinition, answers: &Answers) -> bool {
    result.conditions.iter().all(|c| c.holds(answers))
}

impl Condition {
    pub fn holds(&self, answers: &Answers) -> bool {
        match self {
            Condition::Leaf(p) => p.holds(answers),
            Condition::All(children) => children.iter().all(|c| c.holds(answers)),
            Condition::Any(children) => children.iter().any(|c| c.holds(answers)),
        }
    }
}

impl Predicate {
    pub fn holds(&self, answers: &Answers) -> bool {
        let Some(answer) = answers.get(&self.question_id) else {
            return false;
        };
        let Some(expected) = &self.value else {
            return false;
        };
        compare(&self.operator, answer, expected)
    }
}

fn compare(op: &Operator, answer: &AnswerValue, expected: &ConditionValue) -> bool {
    match (op, answer, expected) {
        (Operator::Equals, AnswerValue::Text(a), ConditionValue::Text(e)) => a == e,
        (Operator::Equals, AnswerValue::Number(a), ConditionValue::Number(e)) => a == e,
        (Operator::GreaterThan, AnswerValue::Number(a), ConditionValue::Number(e)) => a > e,
        (Operator::LessThan, AnswerValue::Number(a), ConditionValue::Number(e)) => a < e,
        (Operator::Includes, a, ConditionValue::Set(values)) => {
            let s = a.to_string();
            values.iter().any(|v| *v == s)
        }
        (Operator::Unrecognized(raw), _, _) => {
            tracing::debug!(operator = %raw, "unrecognized operator treated as not met");
            false
        }
        _ => false,
    }
}

/// Evaluates one result the same way as [`evaluate_results`], recording every step.
pub fn explain(result: &ResultDefinition, answers: &Answers) -> ResultTrace {
    let mut failed = false;
    let mut conditions = Vec::with_capacity(result.conditions.len());
    for c in &result.conditions {
        if failed {
            conditions.push(skipped(c));
            continue;
        }
        let trace = trace(c, answers);
        failed = trace.outcome != Outcome::Met;
        conditions.push(trace);
    }
    ResultTrace {
        id: result.id.clone(),
        title: result.title.clone(),
        matched: !failed,
        conditions,
    }
}

fn trace(c: &Condition, answers: &Answers) -> ConditionTrace {
    match c {
        Condition::Leaf(p) => {
            let mut t = leaf_trace(p);
            t.actual = answers.get(&p.question_id).map(describe_answer);
            t.outcome = if p.holds(answers) {
                Outcome::Met
            } else {
                Outcome::NotMet
            };
            t
        }
        Condition::All(children) => group_trace("all", children, answers, Outcome::NotMet),
        Condition::Any(children) => group_trace("any", children, answers, Outcome::Met),
    }
}

/// Evaluates children until one reaches `decisive`; the rest are skipped.
fn group_trace(
    kind: &str,
    children: &[Condition],
    answers: &Answers,
    decisive: Outcome,
) -> ConditionTrace {
    let mut decided = false;
    let mut traces = Vec::with_capacity(children.len());
    for child in children {
        if decided {
            traces.push(skipped(child));
            continue;
        }
        let t = trace(child, answers);
        decided = t.outcome == decisive;
        traces.push(t);
    }
    let outcome = match (decided, decisive) {
        (true, d) => d,
        (false, Outcome::Met) => Outcome::NotMet,
        (false, _) => Outcome::Met,
    };
    ConditionTrace {
        kind: kind.to_string(),
        question_id: None,
        operator: None,
        expected: None,
        actual: None,
        outcome,
        children: traces,
    }
}

fn skipped(c: &Condition) -> ConditionTrace {
    match c {
        Condition::Leaf(p) => ConditionTrace {
            outcome: Outcome::Skipped,
            ..leaf_trace(p)
        },
        Condition::All(children) | Condition::Any(children) => ConditionTrace {
            kind: if matches!(c, Condition::All(_)) { "all" } else { "any" }.to_string(),
            question_id: None,
            operator: None,
            expected: None,
            actual: None,
            outcome: Outcome::Skipped,
            children: children.iter().map(skipped).collect(),
        },
    }
}

fn leaf_trace(p: &Predicate) -> ConditionTrace {
    ConditionTrace {
        kind: "leaf".to_string(),
        question_id: Some(p.question_id.clone()),
        operator: Some(p.operator.to_string()),
        expected: p.value.as_ref().map(|v| v.to_string()),
        actual: None,
        outcome: Outcome::NotMet,
        children: vec![],
    }
}

fn describe_answer(a: &AnswerValue) -> String {
    match a {
        AnswerValue::Text(s) => format!("{:?}", s),
        AnswerValue::Number(n) => n.to_string(),
    }
}
