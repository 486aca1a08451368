mod common;

use common::{minimal_session_script, TestEnv};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn matched_ids(report: &Value) -> Vec<String> {
    report["data"]["matched"]
        .as_array()
        .expect("matched array")
        .iter()
        .map(|m| m["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn builtin_catalog_validates() {
    let env = TestEnv::new();
    let v = env.run_json(&["validate"]);
    assert_eq!(v["ok"], true);
    assert_eq!(v["data"]["overall"], "ok");
    assert_eq!(v["data"]["errors"], 0);
}

#[test]
fn broken_catalog_fails_validation() {
    let env = TestEnv::new();
    let catalog = env.file(
        "broken.json",
        &json!({
            "sections": [{"id": "s1", "title": "S1", "questions": [
                {"id": "a", "text": "A", "type": "yes-no",
                 "conditionalOn": {"questionId": "b", "value": "yes"}},
                {"id": "b", "text": "B", "type": "yes-no"}
            ]}],
            "results": [{"id": "r", "title": "R", "content": "",
                "conditions": [{"questionId": "a", "operator": "startsWith", "value": "y"}]}]
        })
        .to_string(),
    );
    let out = env
        .cmd()
        .args(["--json", "--catalog", &catalog, "validate"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("json report");
    assert_eq!(v["data"]["overall"], "failed");
    assert_eq!(v["data"]["errors"], 2);
}

#[test]
fn sections_lists_builtin_catalog() {
    let env = TestEnv::new();
    let v = env.run_json(&["sections"]);
    let sections = v["data"].as_array().expect("sections array");
    assert_eq!(sections.len(), 12);
    assert_eq!(sections[0]["id"], "section-1");
    assert_eq!(sections[0]["question_count"], 4);

    env.cmd()
        .arg("sections")
        .assert()
        .success()
        .stdout(predicate::str::contains("section-12\tSection 12: Retirement & Solo 401(k)"));
}

#[test]
fn scenario_a_scorp_matches() {
    let env = TestEnv::new();
    let answers = env.answers(
        "a.json",
        json!({"q1-structure": "llc", "q1-accountant": "yes", "q1-revenue": 60000}),
    );
    let v = env.run_json(&["evaluate", "--answers", &answers]);
    assert_eq!(matched_ids(&v), vec!["result-scorp-55k"]);
    assert_eq!(v["data"]["evaluated"], 9);
}

#[test]
fn scenario_b_revenue_below_threshold() {
    let env = TestEnv::new();
    let answers = env.answers(
        "b.json",
        json!({"q1-structure": "llc", "q1-accountant": "yes", "q1-revenue": 50000}),
    );
    let v = env.run_json(&["evaluate", "--answers", &answers]);
    assert!(matched_ids(&v).is_empty());
}

#[test]
fn revenue_as_string_never_compares() {
    let env = TestEnv::new();
    let answers = env.answers(
        "s.json",
        json!({"q1-structure": "llc", "q1-accountant": "yes", "q1-revenue": "60000"}),
    );
    let v = env.run_json(&["evaluate", "--answers", &answers]);
    assert!(matched_ids(&v).is_empty());
}

#[test]
fn scenarios_c_and_d_augusta_rule() {
    let env = TestEnv::new();
    let c = env.answers(
        "c.json",
        json!({"q2-own-home": "yes", "q2-business-meetings": "yes", "q2-documentation": "no"}),
    );
    assert!(matched_ids(&env.run_json(&["evaluate", "--answers", &c])).is_empty());

    let d = env.answers("d.json", json!({"q2-own-home": "no"}));
    assert!(matched_ids(&env.run_json(&["evaluate", "--answers", &d])).is_empty());

    let ok = env.answers(
        "ok.json",
        json!({"q2-own-home": "yes", "q2-business-meetings": "yes", "q2-documentation": "yes"}),
    );
    assert_eq!(
        matched_ids(&env.run_json(&["evaluate", "--answers", &ok])),
        vec!["result-augusta-rule"]
    );
}

#[test]
fn stale_hidden_answers_are_reported_and_prunable() {
    let env = TestEnv::new();
    let answers = env.answers(
        "stale.json",
        json!({"q2-own-home": "no", "q2-business-meetings": "yes", "q2-documentation": "yes",
               "q4-own-lease-vehicle": "yes"}),
    );
    let v = env.run_json(&["evaluate", "--answers", &answers]);
    // q2-documentation is still visible through the stale q2-business-meetings answer
    assert_eq!(v["data"]["stale_hidden"], json!(["q2-business-meetings"]));
    assert_eq!(v["data"]["pruned"], json!([]));
    assert_eq!(matched_ids(&v), vec!["result-vehicle-deductions"]);

    let v = env.run_json(&["evaluate", "--answers", &answers, "--prune-hidden"]);
    assert_eq!(v["data"]["pruned"], json!(["q2-business-meetings", "q2-documentation"]));
    assert_eq!(matched_ids(&v), vec!["result-vehicle-deductions"]);
}

#[test]
fn stale_hidden_answer_can_decide_a_match() {
    let env = TestEnv::new();
    let catalog = env.file(
        "office.yaml",
        r#"
sections:
  - id: s1
    title: Home
    questions:
      - id: q-own-home
        text: Do you own your home?
        type: yes-no
      - id: q-home-office
        text: Do you use part of it exclusively for work?
        type: yes-no
        conditionalOn:
          questionId: q-own-home
          value: "yes"
results:
  - id: r-home-office
    title: Home Office Deduction
    content: Deduct the office share of home expenses.
    conditions:
      - questionId: q-home-office
        operator: equals
        value: "yes"
"#,
    );
    let answers = env.answers(
        "flipped.json",
        json!({"q-own-home": "no", "q-home-office": "yes"}),
    );

    let kept = env.run_json(&["--catalog", &catalog, "evaluate", "--answers", &answers]);
    assert_eq!(kept["data"]["stale_hidden"], json!(["q-home-office"]));
    assert_eq!(matched_ids(&kept), vec!["r-home-office"]);

    let pruned = env.run_json(&[
        "--catalog", &catalog, "evaluate", "--answers", &answers, "--prune-hidden",
    ]);
    assert_eq!(pruned["data"]["pruned"], json!(["q-home-office"]));
    assert!(matched_ids(&pruned).is_empty());
}

#[test]
fn yaml_answers_are_accepted() {
    let env = TestEnv::new();
    let answers = env.file(
        "answers.yaml",
        "q9-professional-services: \"yes\"\nq12-retirement-plans: \"yes\"\nq12-solo-401k: \"yes\"\n",
    );
    let v = env.run_json(&["evaluate", "--answers", &answers]);
    assert_eq!(
        matched_ids(&v),
        vec!["result-professional-services", "result-solo-401k"]
    );
}

#[test]
fn scenario_e_visibility_follows_dependency() {
    let env = TestEnv::new();
    let no = env.answers("no.json", json!({"q4-own-lease-vehicle": "no"}));
    let v = env.run_json(&["visible", "--answers", &no, "--section", "section-4"]);
    let ids: Vec<&str> = v["data"]
        .as_array()
        .expect("visible array")
        .iter()
        .filter_map(|q| q["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["q4-own-lease-vehicle"]);

    let yes = env.answers(
        "yes.json",
        json!({"q4-own-lease-vehicle": "yes", "q4-purchased-considering": "yes"}),
    );
    let v = env.run_json(&["visible", "--answers", &yes, "--section", "section-4"]);
    assert_eq!(v["data"].as_array().map(|a| a.len()), Some(6));
}

#[test]
fn questions_report_visibility_when_answers_given() {
    let env = TestEnv::new();
    let v = env.run_json(&["questions", "--section", "section-2"]);
    assert_eq!(v["data"][1]["depends_on"], "q2-own-home");
    assert_eq!(v["data"][1]["visible"], Value::Null);

    let answers = env.answers("home.json", json!({"q2-own-home": "yes"}));
    let v = env.run_json(&["questions", "--section", "section-2", "--answers", &answers]);
    assert_eq!(v["data"][0]["answer"], "yes");
    assert_eq!(v["data"][1]["visible"], true);
    assert_eq!(v["data"][2]["visible"], false);
}

#[test]
fn explain_marks_skipped_sub_conditions() {
    let env = TestEnv::new();
    let answers = env.answers("d.json", json!({"q2-own-home": "no"}));
    let v = env.run_json(&["explain", "--answers", &answers, "result-augusta-rule"]);
    let trace = &v["data"][0];
    assert_eq!(trace["matched"], false);
    let group = &trace["conditions"][0];
    assert_eq!(group["kind"], "all");
    assert_eq!(group["children"][0]["outcome"], "not_met");
    assert_eq!(group["children"][0]["actual"], "\"no\"");
    assert_eq!(group["children"][1]["outcome"], "skipped");
    assert_eq!(group["children"][2]["outcome"], "skipped");
}

#[test]
fn show_renders_result_body() {
    let env = TestEnv::new();
    env.cmd()
        .args(["show", "result-home-office"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Home Office Deduction\n====="))
        .stdout(predicate::str::contains("**").not());
}

#[test]
fn unknown_result_is_not_found() {
    let env = TestEnv::new();
    let err = env.run_json_failure(&["show", "result-nope"]);
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "NOT_FOUND");
    assert!(err["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("result-nope"));
}

#[test]
fn malformed_answers_are_rejected() {
    let env = TestEnv::new();
    let bad = env.file("bad.json", "{\"q1-structure\": [\"llc\"]}");
    let err = env.run_json_failure(&["evaluate", "--answers", &bad]);
    assert_eq!(err["error"]["code"], "ANSWERS_INVALID");

    let err = env.run_json_failure(&["evaluate", "--answers", "/no/such/answers.json"]);
    assert_eq!(err["error"]["code"], "ANSWERS_INVALID");
}

#[test]
fn missing_catalog_is_catalog_invalid() {
    let env = TestEnv::new();
    let err = env.run_json_failure(&["--catalog", "/no/such/catalog.json", "sections"]);
    assert_eq!(err["error"]["code"], "CATALOG_INVALID");
}

#[test]
fn catalog_can_come_from_config() {
    let env = TestEnv::new();
    let catalog = env.file(
        "catalogs/questionnaire.yaml",
        "sections:\n  - id: only\n    title: Only\n    questions: []\n",
    );
    let dir = std::path::Path::new(&catalog)
        .parent()
        .expect("catalog dir")
        .to_str()
        .expect("utf8")
        .to_string();
    env.write_config(&format!("[general]\ncatalog = \"{}\"\n", dir));
    let v = env.run_json(&["sections"]);
    assert_eq!(v["data"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(v["data"][0]["id"], "only");
}

#[test]
fn export_writes_markdown_and_json() {
    let env = TestEnv::new();
    let answers = env.answers(
        "a.json",
        json!({"q1-structure": "partnership", "q1-accountant": "yes", "q1-revenue": 90000,
               "q8-home-office": "yes", "q8-rent-or-mortgage": "yes"}),
    );
    let md = env.work.join("out/report.md");
    let md_str = md.to_str().expect("utf8");
    let v = env.run_json(&[
        "export", "--answers", &answers, "--out", md_str,
        "--name", "Jane Doe", "--email", "jane@example.com", "--phone", "5551234567",
    ]);
    assert_eq!(v["data"]["results"], 2);
    assert_eq!(v["data"]["format"], "markdown");
    let body = std::fs::read_to_string(&md).expect("read report");
    assert!(body.contains("Prepared for **Jane Doe**"));
    assert!(body.contains("## Home Office Deduction"));

    let js = env.work.join("report.json");
    env.run_json(&[
        "export", "--answers", &answers, "--out", js.to_str().expect("utf8"), "--format", "json",
    ]);
    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&js).expect("read json report"))
            .expect("json report");
    assert_eq!(report["results"][0]["id"], "result-scorp-55k");
    assert_eq!(report["results"][1]["id"], "result-home-office");
    assert_eq!(report["contact"], Value::Null);
}

#[test]
fn export_rejects_partial_or_invalid_contact() {
    let env = TestEnv::new();
    let answers = env.answers("a.json", json!({}));
    let out = env.work.join("r.md");
    let out = out.to_str().expect("utf8");
    let err = env.run_json_failure(&["export", "--answers", &answers, "--out", out, "--name", "Jane"]);
    assert_eq!(err["error"]["code"], "CONTACT_INVALID");

    let err = env.run_json_failure(&[
        "export", "--answers", &answers, "--out", out,
        "--name", "Jane", "--email", "not-an-email", "--phone", "5551234567",
    ]);
    assert_eq!(err["error"]["code"], "CONTACT_INVALID");
    assert!(err["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("valid email"));
}

#[test]
fn interactive_run_completes_and_exports() {
    let env = TestEnv::new();
    let report = env.work.join("session.md");
    let out = env
        .cmd()
        .args(["--json", "run", "--no-sync", "--export", report.to_str().expect("utf8")])
        .write_stdin(minimal_session_script())
        .assert()
        .success()
        .stderr(predicate::str::contains("Section 12 of 12"))
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("session json");
    assert_eq!(v["data"]["contact"]["email"], "jane@example.com");
    assert_eq!(v["data"]["matched"], json!(["result-scorp-55k"]));
    assert_eq!(v["data"]["answers"]["q1-structure"], "llc");
    assert_eq!(v["data"]["synced"], false);
    assert!(std::fs::read_to_string(report)
        .expect("session report")
        .contains("How an S Corporation Can Help You"));
}

#[test]
fn interactive_run_fails_on_closed_input() {
    let env = TestEnv::new();
    env.cmd()
        .arg("run")
        .write_stdin("Jane Doe\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input closed"));
}
