use std::path::Path;
use std::process::{Command, Output};

fn records(store: &Path, role: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_records"))
        .args(args)
        .current_dir(store.parent().expect("store has a parent dir"))
        .env("RECORDS_STORE", store)
        .env("RECORDS_ROLE", role)
        .env("RECORDS_USER_ID", format!("{}-e2e", role))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run records binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn assert_ok(output: &Output, step: &str) {
    if !output.status.success() {
        eprintln!("{} stdout: {}", step, stdout(output));
        eprintln!("{} stderr: {}", step, String::from_utf8_lossy(&output.stderr));
        panic!("{} failed", step);
    }
}

#[test]
fn test_full_lifecycle() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = dir.path().join("requests.json");

    // 1. Student opens a request
    let created = records(
        &store,
        "student",
        &[
            "create",
            "--id-number", "2021-00417",
            "--first-name", "Maria",
            "--last-name", "Santos",
            "--document-type", "Transcript",
            "--purpose", "Graduate school application",
            "--attach", "uploads/id.png",
        ],
    );
    assert_ok(&created, "create");

    let out = stdout(&created);
    let id_line = out.lines().find(|l| l.starts_with("Request ID:")).expect("Request ID not found in output");
    let id = id_line.split(": ").nth(1).unwrap().trim().to_string();

    // 2. Skipping ahead is refused and nothing is written
    let skipped = records(&store, "registrar", &["apply", "--id", &id, "approve"]);
    assert!(!skipped.status.success());
    assert!(String::from_utf8_lossy(&skipped.stderr).contains("must be in state payment_approved before approve"));

    // 3. Accounting charges and confirms payment
    assert_ok(&records(&store, "accounting", &["apply", "--id", &id, "set-amount", "--amount", "500"]), "set-amount");
    assert_ok(&records(&store, "accounting", &["apply", "--id", &id, "approve-payment"]), "approve-payment");

    // 4. Accounting sees release controls, but disabled
    let actions = records(&store, "accounting", &["actions", "--id", &id]);
    assert_ok(&actions, "actions");
    assert!(stdout(&actions).contains("🚫 approve"));

    // 5. Rejecting without a note is blocked locally
    let reject = records(&store, "registrar", &["apply", "--id", &id, "reject", "--note", " "]);
    assert!(!reject.status.success());

    // 6. Registrar approves and prints
    assert_ok(&records(&store, "registrar", &["apply", "--id", &id, "approve"]), "approve");
    assert_ok(&records(&store, "registrar", &["apply", "--id", &id, "print"]), "print");

    // 7. The queue shows it as released
    let listed = records(&store, "registrar", &["list", "--query", "SANTOS"]);
    assert_ok(&listed, "list");
    assert!(stdout(&listed).contains("Ready for Pick-up"));
    assert!(stdout(&listed).contains("1 request(s)"));

    // 8. Verify the store on disk
    let raw = std::fs::read_to_string(&store).expect("store missing");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json[0];
    assert_eq!(record["status"], "ready for pick-up");
    assert_eq!(record["amount"], "500");
    assert_eq!(record["initiatedBy"], "student");
    assert!(record["printedAt"].is_string());
    assert!(record["receiptNumber"].as_str().unwrap().starts_with("OR-"));
}

#[test]
fn test_unknown_role_fails_fast() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = dir.path().join("requests.json");

    let output = records(&store, "janitor", &["list"]);
    assert!(!output.status.success());
    assert!(!store.exists());
}
