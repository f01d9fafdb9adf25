use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quire(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quire").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

/// Config pointing the store and exports into a temp directory.
fn workspace() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let json = serde_json::json!({
        "store": { "data_dir": dir.path().join("data"), "user_id": "tester" },
        "export": { "output_dir": dir.path().join("out") },
    });
    std::fs::write(&config, json.to_string()).unwrap();
    (dir, config)
}

fn saved_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    text.lines()
        .find_map(|line| line.split(" as ").nth(1))
        .map(|id| id.trim().to_string())
        .unwrap()
}

fn draft_invoice(config: &Path, draft: &Path, number: &str, client: &str) {
    quire(config)
        .args(["draft", "new", "-o"])
        .arg(draft)
        .assert()
        .success();
    for (field, value) in [
        ("number", number),
        ("sender.name", "Northwind Studio"),
        ("recipient.name", client),
        ("recipient.email", "ap@acme.test"),
    ] {
        quire(config)
            .args(["draft", "set"])
            .arg(draft)
            .args([field, value])
            .assert()
            .success();
    }
    quire(config)
        .args(["draft", "set-line"])
        .arg(draft)
        .args(["0", "description", "Design work"])
        .assert()
        .success();
    quire(config)
        .args(["draft", "set-line"])
        .arg(draft)
        .args(["0", "price", "40"])
        .assert()
        .success();
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("quire")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("draft"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn config_init_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("quire.json");

    quire(&config).args(["config", "init"]).assert().success();
    quire(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    quire(&config)
        .args(["config", "get", "export.jpeg_quality"])
        .assert()
        .success()
        .stdout(predicate::str::contains("90"));

    quire(&config)
        .args(["config", "set", "display.currency_symbol", "EUR "])
        .assert()
        .success();
    quire(&config)
        .args(["config", "get", "display.currency_symbol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EUR"));

    quire(&config)
        .args(["config", "set", "display.currency_symbol", "€"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("printable ASCII"));

    quire(&config)
        .args(["config", "set", "display.nope", "1"])
        .assert()
        .failure();
}

#[test]
fn draft_rejects_non_numeric_quantity() {
    let (dir, config) = workspace();
    let draft = dir.path().join("draft.json");
    quire(&config)
        .args(["draft", "new", "-o"])
        .arg(&draft)
        .assert()
        .success();

    quire(&config)
        .args(["draft", "set-line"])
        .arg(&draft)
        .args(["0", "quantity", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a number"));

    quire(&config)
        .args(["draft", "remove-line"])
        .arg(&draft)
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one line item"));
}

#[test]
fn save_list_and_export() {
    let (dir, config) = workspace();
    let draft = dir.path().join("draft.json");
    draft_invoice(&config, &draft, "INV-7", "Acme Corp");

    quire(&config)
        .args(["draft", "show"])
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("$40.00"));

    let output = quire(&config)
        .args(["draft", "save"])
        .arg(&draft)
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = saved_id(&output.stdout);

    quire(&config)
        .args(["documents", "list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-7"))
        .stdout(predicate::str::contains("40.00"));

    quire(&config)
        .args(["clients", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Corp"));

    quire(&config)
        .args(["export", &id, "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages:     1"))
        .stdout(predicate::str::contains("DCTDecode"));
    assert!(dir.path().join("out").join("invoice-INV-7.pdf").exists());
}

#[test]
fn quote_conversion_moves_it_to_invoices() {
    let (dir, config) = workspace();
    let draft = dir.path().join("quote.json");
    quire(&config)
        .args(["draft", "new", "--quote", "-o"])
        .arg(&draft)
        .assert()
        .success();
    for (field, value) in [
        ("sender.name", "Northwind Studio"),
        ("recipient.name", "Beta LLC"),
        ("recipient.email", "hi@beta.test"),
    ] {
        quire(&config)
            .args(["draft", "set"])
            .arg(&draft)
            .args([field, value])
            .assert()
            .success();
    }
    quire(&config)
        .args(["draft", "set-line"])
        .arg(&draft)
        .args(["0", "description", "Estimate"])
        .assert()
        .success();

    let output = quire(&config).args(["draft", "save"]).arg(&draft).output().unwrap();
    assert!(output.status.success());
    let id = saved_id(&output.stdout);

    quire(&config)
        .args(["documents", "list", "--quotes", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Beta LLC"));

    quire(&config).args(["documents", "convert", &id]).assert().success();

    quire(&config)
        .args(["documents", "list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Beta LLC"));
    quire(&config)
        .args(["documents", "convert", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a quote"));
}

#[test]
fn unknown_document_is_not_found() {
    let (_dir, config) = workspace();
    quire(&config)
        .args(["documents", "show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn set_status_updates_saved_invoice() {
    let (dir, config) = workspace();
    let draft = dir.path().join("inv.json");
    draft_invoice(&config, &draft, "INV-9", "Acme Corp");
    let output = quire(&config).args(["draft", "save"]).arg(&draft).output().unwrap();
    assert!(output.status.success());
    let id = saved_id(&output.stdout);

    quire(&config)
        .args(["documents", "set-status", &id, "paid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice #INV-9 is now paid"));

    quire(&config)
        .args(["documents", "list", "--status", "paid", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-9"));

    quire(&config)
        .args(["documents", "set-status", &id, "quote"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("status quote is not valid for invoice documents"));
}
