use crate::domain::answers::Answers;
use crate::domain::questionnaire::{Expected, Question, Questionnaire, Section};

/// Whether `question` should be shown given the current answers.
///
/// Questions without a dependency are always visible. A set dependency matches on
/// the string form of the dependency answer; a scalar dependency needs an answer of
/// the same type and value. An unanswered dependency never matches.
pub fn is_visible(question: &Question, answers: &Answers) -> bool {
    let Some(cond) = &question.conditional_on else {
        return true;
    };
    let Some(dependent) = answers.get(&cond.question_id) else {
        return false;
    };
    match &cond.value {
        Expected::AnyOf(values) => {
            let s = dependent.to_string();
            values.iter().any(|v| *v == s)
        }
        Expected::One(v) => dependent == v,
    }
}

pub fn visible_questions<'a>(section: &'a Section, answers: &Answers) -> Vec<&'a Question> {
    section
        .questions
        .iter()
        .filter(|q| is_visible(q, answers))
        .collect()
}

/// Ids of answered questions that are currently hidden.
pub fn hidden_answered(questionnaire: &Questionnaire, answers: &Answers) -> Vec<String> {
    questionnaire
        .sections
        .iter()
        .flat_map(|s| s.questions.iter())
        .filter(|q| answers.contains(&q.id) && !is_visible(q, answers))
        .map(|q| q.id.clone())
        .collect()
}

/// Drops answers to questions that are hidden, returning the removed ids.
///
/// Questions are walked in flow order, so removing a hidden answer also hides
/// (and removes) answers that depended on it further down.
pub fn prune_hidden(questionnaire: &Questionnaire, answers: &mut Answers) -> Vec<String> {
    let mut removed = Vec::new();
    for q in questionnaire.sections.iter().flat_map(|s| s.questions.iter()) {
        if answers.contains(&q.id) && !is_visible(q, answers) {
            answers.remove(&q.id);
            tracing::debug!(question = %q.id, "pruned hidden answer");
            removed.push(q.id.clone());
        }
    }
    removed
}
