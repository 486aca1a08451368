#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    cargo_home: PathBuf,
    rustup_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");

        let orig_home = std::env::var("HOME").unwrap_or_default();
        let cargo_home = PathBuf::from(&orig_home).join(".cargo");
        let rustup_home = PathBuf::from(&orig_home).join(".rustup");

        Self {
            _tmp: tmp,
            home,
            work,
            cargo_home,
            rustup_home,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("intake");
        cmd.env("HOME", &self.home)
            .env("CARGO_HOME", &self.cargo_home)
            .env("RUSTUP_HOME", &self.rustup_home)
            .env_remove("INTAKE_CATALOG")
            .env_remove("INTAKE_CONFIG")
            .env_remove("INTAKE_LOG")
            .env_remove("INTAKE_SYNC_TOKEN");
        cmd
    }

    /// Writes an answers document into the work dir and returns its path as a string.
    pub fn answers(&self, name: &str, doc: Value) -> String {
        let path = self.work.join(name);
        fs::write(&path, serde_json::to_string_pretty(&doc).expect("serialize answers"))
            .expect("write answers");
        path.to_str().expect("answers path utf8").to_string()
    }

    pub fn file(&self, name: &str, body: &str) -> String {
        let path = self.work.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, body).expect("write file");
        path.to_str().expect("path utf8").to_string()
    }

    pub fn write_config(&self, body: &str) {
        let dir = self.home.join(".config/intake");
        fs::create_dir_all(&dir).expect("create config dir");
        fs::write(dir.join("config.toml"), body).expect("write config");
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }
}

/// Contact form, welcome screen, then every section skipped. Questions in the
/// built-in catalog are optional except the two numeric ones in section 1.
pub fn minimal_session_script() -> String {
    let mut s = String::from("Jane Doe\njane@example.com\n5551234567\n\n");
    // section 1: structure, years, revenue, accountant
    s.push_str("2\n3\n60000\ny\n\n");
    // sections 2..=12: Enter skips each unconditioned question, dependants stay hidden
    let skipped_sections = [1, 1, 1, 1, 1, 1, 1, 1, 2, 1, 2];
    for unconditioned in skipped_sections {
        for _ in 0..unconditioned {
            s.push('\n');
        }
        s.push('\n');
    }
    // results screen
    s.push('\n');
    s
}
