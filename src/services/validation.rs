//! Catalog lint. Authoring mistakes in the rule catalog never fail evaluation;
//! they silently make results unreachable. This check surfaces them up front.

use crate::catalog::{all_questions, question_index};
use crate::domain::models::{Issue, Severity, ValidationReport};
use crate::domain::questionnaire::{
    Condition, ConditionValue, Expected, Operator, Predicate, QuestionType, Questionnaire,
};
use std::collections::HashSet;

#[derive(Default)]
struct Issues(Vec<Issue>);

impl Issues {
    fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, location.into(), message.into());
    }

    fn warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, location.into(), message.into());
    }

    fn push(&mut self, severity: Severity, location: String, message: String) {
        self.0.push(Issue {
            severity,
            location,
            message,
        });
    }
}

pub fn validate_catalog(q: &Questionnaire) -> ValidationReport {
    let mut issues = Issues::default();
    check_ids(q, &mut issues);
    check_questions(q, &mut issues);
    check_results(q, &mut issues);

    let errors = issues
        .0
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.0.len() - errors;
    ValidationReport {
        overall: if errors == 0 { "ok" } else { "failed" }.to_string(),
        errors,
        warnings,
        issues: issues.0,
    }
}

fn check_ids(q: &Questionnaire, issues: &mut Issues) {
    let mut seen = HashSet::new();
    for s in &q.sections {
        if !seen.insert(&s.id) {
            issues.error(&s.id, "duplicate section id");
        }
    }
    let mut seen = HashSet::new();
    for (s, question) in all_questions(q) {
        if !seen.insert(&question.id) {
            issues.error(
                format!("{}/{}", s.id, question.id),
                "duplicate question id",
            );
        }
    }
    let mut seen = HashSet::new();
    for r in &q.results {
        if !seen.insert(&r.id) {
            issues.error(&r.id, "duplicate result id");
        }
    }
}

fn check_questions(q: &Questionnaire, issues: &mut Issues) {
    for (position, (s, question)) in all_questions(q).enumerate() {
        let loc = format!("{}/{}", s.id, question.id);

        if question.kind == QuestionType::SingleChoice && question.options.is_empty() {
            issues.error(&loc, "single-choice question has no options");
        }
        let mut values = HashSet::new();
        for o in &question.options {
            if !values.insert(&o.value) {
                issues.warning(&loc, format!("duplicate option value {:?}", o.value));
            }
        }
        if let Some(v) = &question.validation {
            if let (Some(min), Some(max)) = (v.min, v.max) {
                if min > max {
                    issues.error(&loc, format!("validation min {} exceeds max {}", min, max));
                }
            }
        }

        let Some(cond) = &question.conditional_on else {
            continue;
        };
        if cond.question_id == question.id {
            issues.error(&loc, "question is conditional on itself");
            continue;
        }
        match question_index(q, &cond.question_id) {
            None => {
                issues.error(
                    &loc,
                    format!("conditional on unknown question {}", cond.question_id),
                );
            }
            Some(dep) if dep > position => {
                issues.error(
                    &loc,
                    format!(
                        "conditional on {} which comes later in the question flow",
                        cond.question_id
                    ),
                );
            }
            Some(_) => {
                let dependency = all_questions(q)
                    .map(|(_, d)| d)
                    .find(|d| d.id == cond.question_id);
                if let Some(allowed) = dependency.and_then(|d| d.allowed_values()) {
                    let wanted: Vec<String> = match &cond.value {
                        Expected::AnyOf(values) => values.clone(),
                        Expected::One(v) => vec![v.to_string()],
                    };
                    for w in wanted {
                        if !allowed.contains(&w.as_str()) {
                            issues.warning(
                                &loc,
                                format!(
                                    "conditional value {:?} is not an option of {}",
                                    w, cond.question_id
                                ),
                            );
                        }
                    }
                }
            }
        }
    }
}

fn check_results(q: &Questionnaire, issues: &mut Issues) {
    for r in &q.results {
        if r.conditions.is_empty() {
            issues.warning(&r.id, "result has no conditions and is always shown");
        }
        for c in &r.conditions {
            check_condition(q, &r.id, c, issues);
        }
    }
}

fn check_condition(q: &Questionnaire, loc: &str, c: &Condition, issues: &mut Issues) {
    match c {
        Condition::Leaf(p) => check_predicate(q, loc, p, issues),
        Condition::All(children) | Condition::Any(children) => {
            if children.is_empty() {
                let kind = if matches!(c, Condition::All(_)) { "all" } else { "any" };
                issues.warning(
                    loc,
                    format!(
                        "empty `{}` group is always {}",
                        kind,
                        if kind == "all" { "met" } else { "unmet" }
                    ),
                );
            }
            for child in children {
                check_condition(q, loc, child, issues);
            }
        }
    }
}

fn check_predicate(q: &Questionnaire, loc: &str, p: &Predicate, issues: &mut Issues) {
    let at = format!("{}/{}", loc, p.question_id);
    if question_index(q, &p.question_id).is_none() {
        issues.error(&at, "condition references an unknown question");
    }
    let Some(value) = &p.value else {
        if let Operator::Unrecognized(raw) = &p.operator {
            issues.error(&at, format!("unrecognized operator {:?}", raw));
        } else {
            issues.error(&at, format!("`{}` condition has no value", p.operator));
        }
        return;
    };
    match (&p.operator, value) {
        (Operator::Unrecognized(raw), _) => {
            issues.error(&at, format!("unrecognized operator {:?}", raw));
        }
        (Operator::GreaterThan | Operator::LessThan, ConditionValue::Number(_)) => {}
        (Operator::GreaterThan | Operator::LessThan, _) => {
            issues.error(&at, format!("`{}` needs a numeric value", p.operator));
        }
        (Operator::Includes, ConditionValue::Set(_)) => {}
        (Operator::Includes, _) => {
            issues.error(&at, "`includes` needs a list of values");
        }
        (Operator::Equals, ConditionValue::Set(_)) => {
            issues.error(&at, "`equals` cannot compare against a list");
        }
        (Operator::Equals, _) => {}
    }
}
