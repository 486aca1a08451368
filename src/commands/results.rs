use super::Context;
use crate::*;

pub fn handle_result_commands(command: &Commands, ctx: &Context) -> anyhow::Result<()> {
    let q = ctx.questionnaire();
    match command {
        Commands::Evaluate {
            answers,
            prune_hidden: prune,
        } => {
            let mut answers = load_answers(answers)?;
            let stale_hidden = hidden_answered(q, &answers);
            let pruned = if *prune {
                prune_hidden(q, &mut answers)
            } else {
                vec![]
            };
            if !stale_hidden.is_empty() && !*prune {
                tracing::warn!(
                    questions = %stale_hidden.join(","),
                    "answers to hidden questions still count toward results"
                );
            }
            let matched: Vec<MatchedResult> = evaluate_results(&answers, &q.results)
                .into_iter()
                .map(|r| MatchedResult {
                    id: r.id.clone(),
                    title: r.title.clone(),
                })
                .collect();
            let report = EvaluationReport {
                evaluated: q.results.len(),
                matched_count: matched.len(),
                matched,
                stale_hidden,
                pruned,
            };
            print_one(ctx.json, report, |r| {
                if r.matched.is_empty() {
                    return "no results matched".to_string();
                }
                r.matched
                    .iter()
                    .map(|m| format!("{}\t{}", m.id, m.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Commands::Explain { answers, result } => {
            let answers = load_answers(answers)?;
            let targets: Vec<&ResultDefinition> = match result {
                Some(id) => vec![find_result(q, id)?],
                None => q.results.iter().collect(),
            };
            let traces: Vec<ResultTrace> = targets.into_iter().map(|r| explain(r, &answers)).collect();
            print_out(ctx.json, &traces, render_trace)?;
        }
        Commands::Export {
            answers,
            out,
            format,
            name,
            email,
            phone,
        } => {
            let answers = load_answers(answers)?;
            let contact = contact_from_parts(name.as_deref(), email.as_deref(), phone.as_deref())?;
            let format = format.unwrap_or(ctx.settings.export.format);
            let report = build_report(q, &answers, contact, ctx.catalog.digest());
            write_report(&report, q, out, format)?;
            let receipt = ExportReceipt {
                path: out.display().to_string(),
                format,
                results: report.results.len(),
            };
            print_one(ctx.json, receipt, |r| {
                format!("wrote {} ({} results)", r.path, r.results)
            })?;
        }
        _ => unreachable!("non-result command routed to result handler"),
    }
    Ok(())
}

fn render_trace(t: &ResultTrace) -> String {
    let mark = if t.matched { "matched" } else { "not matched" };
    let mut lines = vec![format!("{}\t{}\t{}", t.id, mark, t.title)];
    for c in &t.conditions {
        push_condition(&mut lines, c, 1);
    }
    lines.join("\n")
}

fn push_condition(lines: &mut Vec<String>, c: &ConditionTrace, depth: usize) {
    let pad = "  ".repeat(depth);
    let outcome = match c.outcome {
        Outcome::Met => "met",
        Outcome::NotMet => "not met",
        Outcome::Skipped => "skipped",
    };
    if c.kind == "leaf" {
        lines.push(format!(
            "{}[{}] {} {} {} (answer: {})",
            pad,
            outcome,
            c.question_id.as_deref().unwrap_or("?"),
            c.operator.as_deref().unwrap_or("?"),
            c.expected.as_deref().unwrap_or("-"),
            c.actual.as_deref().unwrap_or("none"),
        ));
    } else {
        lines.push(format!("{}[{}] {}", pad, outcome, c.kind));
        for child in &c.children {
            push_condition(lines, child, depth + 1);
        }
    }
}
