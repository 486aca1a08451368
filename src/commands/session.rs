use super::Context;
use crate::*;
use std::io::Write;

pub fn handle_session_commands(command: &Commands, ctx: &Context) -> anyhow::Result<()> {
    let q = ctx.questionnaire();
    match command {
        Commands::Run {
            export,
            format,
            no_sync,
        } => {
            let stdin = std::io::stdin();
            // Prompts go to stderr in JSON mode so stdout carries only the envelope.
            let screen: Box<dyn Write> = if ctx.json {
                Box::new(std::io::stderr())
            } else {
                Box::new(std::io::stdout())
            };
            let outcome = Wizard::new(q, stdin.lock(), screen)
                .with_pruning(ctx.settings.general.prune_hidden_answers)
                .run()?;

            let export = match export {
                Some(path) => {
                    let format = format.unwrap_or(ctx.settings.export.format);
                    let report = build_report(
                        q,
                        &outcome.answers,
                        Some(outcome.contact.clone()),
                        ctx.catalog.digest(),
                    );
                    write_report(&report, q, path, format)?;
                    Some(ExportReceipt {
                        path: path.display().to_string(),
                        format,
                        results: report.results.len(),
                    })
                }
                None => None,
            };

            let synced = if *no_sync || ctx.settings.sync.endpoint.is_none() {
                false
            } else {
                let payload = ContactSyncPayload {
                    source: "intake-run",
                    contact: &outcome.contact,
                    matched_results: outcome.matched.clone(),
                    answered: outcome.answers.len(),
                    catalog_digest: ctx.catalog.digest(),
                };
                match sync_contact(&ctx.settings.sync, &payload) {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, "contact sync failed");
                        false
                    }
                }
            };

            let summary = SessionSummary {
                contact: outcome.contact,
                answers: outcome.answers,
                matched: outcome.matched,
                pruned: outcome.pruned,
                export,
                synced,
            };
            print_one(ctx.json, summary, |s| {
                let mut lines = vec![format!(
                    "Thank you, {}. {} strategies identified.",
                    s.contact.name,
                    s.matched.len()
                )];
                if let Some(e) = &s.export {
                    lines.push(format!("Report written to {}", e.path));
                }
                lines.join("\n")
            })?;
        }
        Commands::Contact {
            command:
                ContactCommands::Sync {
                    name,
                    email,
                    phone,
                    answers,
                },
        } => {
            let contact = ContactInfo {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
            }
            .validated()?;
            let answers = match answers {
                Some(path) => load_answers(path)?,
                None => Answers::new(),
            };
            let matched_results = evaluate_results(&answers, &q.results)
                .into_iter()
                .map(|r| r.id.clone())
                .collect();
            let payload = ContactSyncPayload {
                source: "intake-cli",
                contact: &contact,
                matched_results,
                answered: answers.len(),
                catalog_digest: ctx.catalog.digest(),
            };
            let receipt = sync_contact(&ctx.settings.sync, &payload)?;
            print_one(ctx.json, receipt, |r| {
                format!("synced to {} (HTTP {})", r.endpoint, r.status)
            })?;
        }
        _ => unreachable!("non-session command routed to session handler"),
    }
    Ok(())
}
