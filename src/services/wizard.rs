//! Interactive questionnaire session over any line-oriented reader and writer.
//!
//! The session collects contact details, walks the sections in order showing
//! only the questions visible against the answers given so far, then renders
//! the matched strategies. Typing `r` on the results screen re-enters the
//! sections with the existing answers kept.

use crate::domain::answers::{AnswerValue, Answers};
use crate::domain::models::ContactInfo;
use crate::domain::questionnaire::{Question, QuestionType, Questionnaire};
use crate::services::contact::{validate_email, validate_name, validate_phone, ContactError};
use crate::services::evaluator::evaluate_results;
use crate::services::markup::{parse_blocks, render_text};
use crate::services::visibility::{is_visible, prune_hidden};
use std::io::{BufRead, Write};

#[derive(thiserror::Error, Debug)]
pub enum WizardError {
    #[error("input closed before the questionnaire was finished")]
    InputClosed,
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub contact: ContactInfo,
    pub answers: Answers,
    pub matched: Vec<String>,
    pub pruned: Vec<String>,
}

pub struct Wizard<'q, R, W> {
    questionnaire: &'q Questionnaire,
    input: R,
    out: W,
    prune_hidden: bool,
}

impl<'q, R: BufRead, W: Write> Wizard<'q, R, W> {
    pub fn new(questionnaire: &'q Questionnaire, input: R, out: W) -> Self {
        Self {
            questionnaire,
            input,
            out,
            prune_hidden: true,
        }
    }

    pub fn with_pruning(mut self, on: bool) -> Self {
        self.prune_hidden = on;
        self
    }

    pub fn run(mut self) -> anyhow::Result<SessionOutcome> {
        let contact = self.contact_form()?;
        self.welcome()?;

        let mut answers = Answers::new();
        let mut pruned = Vec::new();
        loop {
            self.sections(&mut answers)?;
            if self.prune_hidden {
                pruned.extend(prune_hidden(self.questionnaire, &mut answers));
            }
            let matched = self.results(&answers)?;
            let reply = self.prompt("Type r to review your answers, or press Enter to finish: ")?;
            if !reply.eq_ignore_ascii_case("r") {
                tracing::debug!(answered = answers.len(), matched = matched.len(), "session finished");
                return Ok(SessionOutcome {
                    contact,
                    answers,
                    matched,
                    pruned,
                });
            }
        }
    }

    fn read_line(&mut self) -> anyhow::Result<String> {
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(WizardError::InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    fn prompt(&mut self, label: &str) -> anyhow::Result<String> {
        write!(self.out, "{}", label)?;
        self.read_line()
    }

    fn ask_field(
        &mut self,
        label: &str,
        check: fn(&str) -> Result<String, ContactError>,
    ) -> anyhow::Result<String> {
        loop {
            let raw = self.prompt(label)?;
            match check(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.out, "  {}", e)?,
            }
        }
    }

    fn contact_form(&mut self) -> anyhow::Result<ContactInfo> {
        writeln!(self.out, "Before we begin, please share your contact details.")?;
        let name = self.ask_field("Full name: ", validate_name)?;
        let email = self.ask_field("Email: ", validate_email)?;
        let phone = self.ask_field("Phone: ", validate_phone)?;
        writeln!(self.out)?;
        Ok(ContactInfo { name, email, phone })
    }

    fn welcome(&mut self) -> anyhow::Result<()> {
        let q = self.questionnaire;
        let w = &q.welcome;
        if !w.title.is_empty() {
            writeln!(self.out, "{}\n{}\n", w.title, "=".repeat(w.title.chars().count()))?;
        }
        for p in &w.introduction {
            writeln!(self.out, "{}\n", p)?;
        }
        if !w.areas.is_empty() {
            writeln!(self.out, "This questionnaire covers:")?;
            for a in &w.areas {
                writeln!(self.out, "  • {}", a)?;
            }
            writeln!(self.out)?;
        }
        for note in [&w.disclaimer, &w.compliance] {
            if !note.is_empty() {
                writeln!(self.out, "{}\n", note)?;
            }
        }
        self.prompt("Press Enter to begin: ")?;
        Ok(())
    }

    fn sections(&mut self, answers: &mut Answers) -> anyhow::Result<()> {
        let q = self.questionnaire;
        let total = q.sections.len();
        let mut idx = 0;
        while idx < total {
            let section = &q.sections[idx];
            writeln!(self.out, "\nSection {} of {}: {}", idx + 1, total, section.title)?;
            if let Some(d) = &section.description {
                writeln!(self.out, "{}", d)?;
            }
            for question in &section.questions {
                // Dependencies always point backwards, so checking here sees every answer it needs.
                if is_visible(question, answers) {
                    self.ask(question, answers)?;
                }
            }
            let reply = self.prompt("Press Enter for the next section, or b to go back: ")?;
            if reply.eq_ignore_ascii_case("b") {
                idx = idx.saturating_sub(1);
            } else {
                idx += 1;
            }
        }
        Ok(())
    }

    fn ask(&mut self, question: &Question, answers: &mut Answers) -> anyhow::Result<()> {
        loop {
            write!(self.out, "\n{}", question.text)?;
            if question.is_required() {
                write!(self.out, " *")?;
            }
            writeln!(self.out)?;
            for (i, o) in question.options.iter().enumerate() {
                writeln!(self.out, "  {}) {}", i + 1, o.label)?;
            }
            let hint = match answers.get(&question.id) {
                Some(current) => format!("{} [{}]: ", input_hint(question), current),
                None => format!("{}: ", input_hint(question)),
            };
            let raw = self.prompt(&hint)?;
            match parse_reply(question, &raw) {
                Ok(Some(value)) => {
                    answers.set(question.id.clone(), value);
                    return Ok(());
                }
                Ok(None) if answers.contains(&question.id) || !question.is_required() => {
                    return Ok(());
                }
                Ok(None) => writeln!(self.out, "  This question is required.")?,
                Err(message) => writeln!(self.out, "  {}", message)?,
            }
        }
    }

    fn results(&mut self, answers: &Answers) -> anyhow::Result<Vec<String>> {
        let q = self.questionnaire;
        let ty = &q.thank_you;
        writeln!(self.out, "\n{}\n{}\n", ty.title, "=".repeat(ty.title.chars().count()))?;
        if !ty.introduction.is_empty() {
            writeln!(self.out, "{}\n", ty.introduction)?;
        }
        for b in &ty.benefits {
            writeln!(self.out, "  • {}", b)?;
        }
        for g in &ty.goals {
            writeln!(self.out, "  ✓ {}", g)?;
        }
        if !ty.closing_statement.is_empty() {
            writeln!(self.out, "\n{}", ty.closing_statement)?;
        }

        let matched = evaluate_results(answers, &q.results);
        if matched.is_empty() {
            writeln!(
                self.out,
                "\nBased on your responses, we'll provide personalized recommendations during your consultation with ATG – Advanced Tax Group."
            )?;
        } else {
            writeln!(self.out, "\nYour Personalized Strategies")?;
            for r in &matched {
                writeln!(self.out, "\n== {} ==\n", r.title)?;
                writeln!(self.out, "{}", render_text(&parse_blocks(&r.content)))?;
            }
        }
        writeln!(self.out)?;
        Ok(matched.into_iter().map(|r| r.id.clone()).collect())
    }
}

fn input_hint(question: &Question) -> String {
    match question.kind {
        QuestionType::YesNo => "(y/n)".to_string(),
        QuestionType::SingleChoice => format!("(1-{})", question.options.len()),
        QuestionType::Numeric => match question.validation.as_ref().map(|v| (v.min, v.max)) {
            Some((Some(min), Some(max))) => format!("({} to {})", min, max),
            Some((Some(min), None)) => format!("(at least {})", min),
            Some((None, Some(max))) => format!("(up to {})", max),
            _ => "(number)".to_string(),
        },
        QuestionType::Text => ">".to_string(),
    }
}

/// Turns a typed reply into an answer. `Ok(None)` means the reply was blank.
pub fn parse_reply(question: &Question, raw: &str) -> Result<Option<AnswerValue>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = match question.kind {
        QuestionType::YesNo => match raw.to_ascii_lowercase().as_str() {
            "y" | "yes" => AnswerValue::from("yes"),
            "n" | "no" => AnswerValue::from("no"),
            _ => return Err("Please answer yes or no.".to_string()),
        },
        QuestionType::SingleChoice => {
            let by_number = raw
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| question.options.get(i));
            let chosen = by_number.or_else(|| {
                question.options.iter().find(|o| {
                    o.value.eq_ignore_ascii_case(raw) || o.label.eq_ignore_ascii_case(raw)
                })
            });
            match chosen {
                Some(o) => AnswerValue::from(o.value.as_str()),
                None => return Err("Please pick one of the listed options.".to_string()),
            }
        }
        QuestionType::Numeric => {
            let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | '$' | ' ')).collect();
            let n = match cleaned.parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => return Err("Please enter a number.".to_string()),
            };
            AnswerValue::Number(clamp(question, n))
        }
        QuestionType::Text => AnswerValue::from(raw),
    };
    Ok(Some(value))
}

fn clamp(question: &Question, mut n: f64) -> f64 {
    if let Some(v) = &question.validation {
        if let Some(min) = v.min {
            n = n.max(min);
        }
        if let Some(max) = v.max {
            n = n.min(max);
        }
    }
    n
}
