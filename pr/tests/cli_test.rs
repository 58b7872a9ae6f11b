//! End-to-end tests for the `pr` binary
//!
//! Every test runs against its own temporary home, config and database.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    temp: TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = temp.path().join("promptroll.yml");
        let store = temp.path().join("data").join("promptroll.db");
        let exports = temp.path().join("exports");
        std::fs::create_dir_all(&exports).expect("Failed to create export dir");
        std::fs::write(
            &config,
            format!(
                "store-path: {}\nexport-dir: {}\nlog-level: debug\n",
                store.display(),
                exports.display()
            ),
        )
        .expect("Failed to write config");
        Self { temp, config }
    }

    fn path(&self) -> &Path {
        self.temp.path()
    }

    fn pr(&self) -> Command {
        let mut cmd = Command::cargo_bin("pr").expect("pr binary should build");
        cmd.env("HOME", self.path())
            .env("XDG_DATA_HOME", self.path().join("xdg-data"))
            .env("XDG_CONFIG_HOME", self.path().join("xdg-config"))
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn create_greeting(&self) {
        self.pr()
            .args([
                "template",
                "new",
                "--name",
                "Greeting",
                "--body",
                "Hello {{who}}, signed {{sig}}",
                "--field",
                "who:text",
                "--field",
                "sig:fixed=Bot",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created template: Greeting"));
    }
}

#[test]
fn test_create_and_list_template() {
    let env = Env::new();
    env.create_greeting();

    env.pr()
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Greeting").and(predicate::str::contains("2 fields")));

    env.pr()
        .args(["template", "show", "Greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello {{who}}, signed {{sig}}").and(predicate::str::contains("= Bot")));
}

#[test]
fn test_generate_prints_and_records_history() {
    let env = Env::new();
    env.create_greeting();

    env.pr()
        .args(["generate", "Greeting", "--set", "who=Ann", "--no-copy"])
        .assert()
        .success()
        .stdout("Hello Ann, signed Bot\n");

    env.pr()
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Greeting").and(predicate::str::contains("Hello Ann, signed Bot")));
}

#[test]
fn test_generate_leaves_unmatched_placeholder() {
    let env = Env::new();
    env.pr()
        .args([
            "template",
            "new",
            "--name",
            "Partial",
            "--body",
            "{{pick}} and {{missing}}",
            "--field",
            "pick:radio=A|B",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("{{missing}}"));

    env.pr()
        .args(["generate", "Partial", "--no-copy"])
        .assert()
        .success()
        .stdout(" and {{missing}}\n")
        .stderr(predicate::str::contains("no value for"));
}

#[test]
fn test_generate_strict_refuses_missing_values() {
    let env = Env::new();
    env.create_greeting();

    env.pr()
        .args(["generate", "Greeting", "--no-copy", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No value for: who"));

    env.pr()
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history found"));
}

#[test]
fn test_generate_rejects_fixed_field_value() {
    let env = Env::new();
    env.create_greeting();

    env.pr()
        .args(["generate", "Greeting", "-s", "sig=Someone", "--no-copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fixed value"));
}

#[test]
fn test_generate_rejects_value_outside_radio_options() {
    let env = Env::new();
    env.pr()
        .args(["template", "new", "--name", "Pick", "--body", "[{{pick}}]", "--field", "pick:radio=A|B"])
        .assert()
        .success();

    env.pr()
        .args(["generate", "Pick", "-s", "pick=Z", "--no-copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an option"));

    env.pr()
        .args(["generate", "Pick", "-s", "pick=B", "--no-copy"])
        .assert()
        .success()
        .stdout("[B]\n");
}

#[test]
fn test_export_import_round_trip() {
    let env = Env::new();
    env.create_greeting();

    env.pr()
        .args(["template", "export", "Greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Greeting.json"));

    let exported = env.path().join("exports").join("Greeting.json");
    let text = std::fs::read_to_string(&exported).expect("export should exist");
    assert!(text.contains("\"type\": \"fixed\""));

    env.pr()
        .arg("template")
        .arg("import")
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported template: Greeting"));

    // Same name twice now, so lookup by name is ambiguous
    env.pr()
        .args(["template", "show", "Greeting"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matches 2 templates"));
}

#[test]
fn test_import_malformed_document_fails() {
    let env = Env::new();
    let bad = env.path().join("bad.json");
    std::fs::write(&bad, r#"{"name": "Broken", "fields": [{"type": "checkbox"}]}"#).unwrap();

    env.pr()
        .arg("template")
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decode error"));

    env.pr()
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found"));
}

#[test]
fn test_delete_template_keeps_history() {
    let env = Env::new();
    env.create_greeting();
    env.pr()
        .args(["generate", "Greeting", "-s", "who=Ann", "--no-copy"])
        .assert()
        .success();

    env.pr()
        .args(["template", "delete", "Greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted template: Greeting"));

    env.pr()
        .args(["history", "list", "--template", "Greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello Ann, signed Bot"));
}

#[test]
fn test_edit_template() {
    let env = Env::new();
    env.create_greeting();

    env.pr()
        .args([
            "template",
            "edit",
            "Greeting",
            "--name",
            "Farewell",
            "--body",
            "Bye {{who}} from {{sig}} via {{url}}",
            "--add-field",
            "url:link",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated template: Farewell"));

    env.pr()
        .args([
            "generate",
            "Farewell",
            "-s",
            "who=Ann",
            "-s",
            "url=https://example.com",
            "--no-copy",
        ])
        .assert()
        .success()
        .stdout("Bye Ann from Bot via https://example.com\n");

    env.pr()
        .args(["template", "edit", "Farewell", "--remove-field", "nope"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_template_is_reported() {
    let env = Env::new();
    env.pr()
        .args(["generate", "Nothing", "--no-copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}
