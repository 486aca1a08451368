use super::{question_view, Context};
use crate::*;
use std::process::ExitCode;

pub fn handle_catalog_commands(command: &Commands, ctx: &Context) -> anyhow::Result<ExitCode> {
    let q = ctx.questionnaire();
    match command {
        Commands::Validate => {
            let report = validate_catalog(q);
            let failed = report.errors > 0;
            if failed {
                tracing::warn!(errors = report.errors, source = %ctx.catalog.source, "catalog has errors");
            }
            print_one(ctx.json, report, |r| {
                let mut lines = vec![format!("catalog: {}", ctx.catalog.source)];
                for i in &r.issues {
                    let level = match i.severity {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                    };
                    lines.push(format!("{}\t{}\t{}", level, i.location, i.message));
                }
                lines.push(format!(
                    "overall: {} ({} errors, {} warnings)",
                    r.overall, r.errors, r.warnings
                ));
                lines.join("\n")
            })?;
            if failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Sections => {
            let sections: Vec<SectionSummary> = q
                .sections
                .iter()
                .map(|s| SectionSummary {
                    id: s.id.clone(),
                    title: s.title.clone(),
                    description: s.description.clone(),
                    question_count: s.questions.len(),
                })
                .collect();
            print_out(ctx.json, &sections, |s| {
                format!("{}\t{}\t{} questions", s.id, s.title, s.question_count)
            })?;
        }
        Commands::Questions { section, answers } => {
            let answers = answers.as_deref().map(load_answers).transpose()?;
            let views = question_views(q, section.as_deref(), answers.as_ref())?;
            print_out(ctx.json, &views, |v| {
                let vis = match v.visible {
                    Some(true) => "\tvisible",
                    Some(false) => "\thidden",
                    None => "",
                };
                format!("{}\t{}\t{}{}\t{}", v.section, v.id, v.kind, vis, v.text)
            })?;
        }
        Commands::Visible { answers, section } => {
            let answers = load_answers(answers)?;
            let views: Vec<QuestionView> = question_views(q, section.as_deref(), Some(&answers))?
                .into_iter()
                .filter(|v| v.visible == Some(true))
                .collect();
            print_out(ctx.json, &views, |v| {
                let answer = v.answer.as_ref().map(|a| a.to_string()).unwrap_or_default();
                format!("{}\t{}\t{}\t{}", v.id, v.kind, v.text, answer)
            })?;
        }
        Commands::Show { result } => {
            let r = find_result(q, result)?;
            let shown = ReportedResult {
                id: r.id.clone(),
                title: r.title.clone(),
                content: r.content.clone(),
            };
            print_one(ctx.json, shown, |r| {
                format!(
                    "{}\n{}\n\n{}",
                    r.title,
                    "=".repeat(r.title.chars().count()),
                    render_text(&parse_blocks(&r.content))
                )
            })?;
        }
        _ => unreachable!("non-catalog command routed to catalog handler"),
    }
    Ok(ExitCode::SUCCESS)
}

fn question_views(
    q: &Questionnaire,
    section: Option<&str>,
    answers: Option<&Answers>,
) -> anyhow::Result<Vec<QuestionView>> {
    let sections: Vec<&Section> = match section {
        Some(id) => vec![find_section(q, id)?],
        None => q.sections.iter().collect(),
    };
    Ok(sections
        .into_iter()
        .flat_map(|s| s.questions.iter().map(move |question| (s, question)))
        .map(|(s, question)| question_view(s, question, answers))
        .collect())
}
