use crate::cli::ExportFormat;
use crate::domain::answers::Answers;
use crate::domain::models::{ContactInfo, ReportedResult, ResultsReport};
use crate::domain::questionnaire::Questionnaire;
use crate::services::evaluator::evaluate_results;
use crate::services::markup::{parse_blocks, render_markdown};
use std::path::Path;

const FIRM: &str = "ATG – Advanced Tax Group";

pub fn build_report(
    questionnaire: &Questionnaire,
    answers: &Answers,
    contact: Option<ContactInfo>,
    catalog_digest: String,
) -> ResultsReport {
    let results = evaluate_results(answers, &questionnaire.results)
        .into_iter()
        .map(|r| ReportedResult {
            id: r.id.clone(),
            title: r.title.clone(),
            content: r.content.clone(),
        })
        .collect();
    ResultsReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        catalog_digest,
        contact,
        answered: answers.len(),
        results,
    }
}

pub fn render_report_markdown(report: &ResultsReport, questionnaire: &Questionnaire) -> String {
    let ty = &questionnaire.thank_you;
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", ty.title));
    if let Some(c) = &report.contact {
        out.push_str(&format!(
            "Prepared for **{}** ({}, {})\n\n",
            c.name, c.email, c.phone
        ));
    }
    out.push_str(&format!("{}\n\n", ty.introduction));
    if !ty.benefits.is_empty() {
        out.push_str("The results of this questionnaire are important because they:\n\n");
        for b in &ty.benefits {
            out.push_str(&format!("- {}\n", b));
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "At **{}**, we use these results to provide guidance and recommendations. \
         While we offer professional insight, remember that **you are ultimately responsible \
         for implementing any strategies**.\n\n",
        FIRM
    ));
    if !ty.goals.is_empty() {
        out.push_str("By acting on the opportunities identified, you are taking a critical step toward:\n\n");
        for g in &ty.goals {
            out.push_str(&format!("- {}\n", g));
        }
        out.push('\n');
    }
    if !ty.closing_statement.is_empty() {
        out.push_str(&format!("{}\n\n", ty.closing_statement));
    }

    if report.results.is_empty() {
        out.push_str(&format!(
            "Based on your responses, we'll provide personalized recommendations during your consultation with {}.\n",
            FIRM
        ));
    } else {
        out.push_str("## Your Personalized Strategies\n\n");
        for r in &report.results {
            out.push_str(&format!("## {}\n\n", r.title));
            out.push_str(&render_markdown(&parse_blocks(&r.content)));
            out.push_str("\n\n");
        }
    }
    out.push_str(&format!(
        "---\n\nGenerated {} · catalog {}\n",
        report.generated_at,
        &report.catalog_digest[..report.catalog_digest.len().min(12)]
    ));
    out
}

pub fn write_report(
    report: &ResultsReport,
    questionnaire: &Questionnaire,
    path: &Path,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let body = match format {
        ExportFormat::Markdown => render_report_markdown(report, questionnaire),
        ExportFormat::Json => serde_json::to_string_pretty(report)?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, body)?;
    tracing::info!(path = %path.display(), results = report.results.len(), "report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{load_catalog, DEFAULT_FETCH_TIMEOUT_MS};

    fn scorp_answers() -> Answers {
        [
            ("q1-structure", crate::domain::answers::AnswerValue::from("llc")),
            ("q1-accountant", "yes".into()),
            ("q1-revenue", 60000.0.into()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn report_lists_matched_results_in_catalog_order() {
        let c = load_catalog(None, DEFAULT_FETCH_TIMEOUT_MS).unwrap();
        let mut answers = scorp_answers();
        answers.set("q9-professional-services", "yes");
        let report = build_report(&c.questionnaire, &answers, None, c.digest());
        let ids: Vec<&str> = report.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["result-scorp-55k", "result-professional-services"]);
        assert_eq!(report.answered, 4);
        assert_eq!(report.catalog_digest.len(), 64);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn markdown_mentions_contact_and_strategies() {
        let c = load_catalog(None, DEFAULT_FETCH_TIMEOUT_MS).unwrap();
        let contact = ContactInfo {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "5551234567".into(),
        };
        let report = build_report(&c.questionnaire, &scorp_answers(), Some(contact), c.digest());
        let md = render_report_markdown(&report, &c.questionnaire);
        assert!(md.starts_with("# Your Tax Planning Results"));
        assert!(md.contains("Prepared for **Jane Doe**"));
        assert!(md.contains("## Your Personalized Strategies"));
        assert!(md.contains("How an S Corporation Can Help You"));
    }

    #[test]
    fn markdown_without_matches_shows_consultation_notice() {
        let c = load_catalog(None, DEFAULT_FETCH_TIMEOUT_MS).unwrap();
        let report = build_report(&c.questionnaire, &Answers::new(), None, c.digest());
        let md = render_report_markdown(&report, &c.questionnaire);
        assert!(md.contains("personalized recommendations during your consultation"));
        assert!(!md.contains("## Your Personalized Strategies"));
    }

    #[test]
    fn writes_json_report() {
        let c = load_catalog(None, DEFAULT_FETCH_TIMEOUT_MS).unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out/report.json");
        let report = build_report(&c.questionnaire, &scorp_answers(), None, c.digest());
        write_report(&report, &c.questionnaire, &path, ExportFormat::Json).unwrap();
        let back: ResultsReport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.results[0].id, "result-scorp-55k");
    }
}
