//! Integration tests for the stockin CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INVOICE: &str = "Harvest Wholefoods Pty Ltd
Tax Invoice 123456
Date: 12/03/2024
QTY ITEM NO DESCRIPTION PRICE EXTENDED
1 ABC123 Organic Honey 500g $12.50 $12.50 TAX-FREE
2 XYZ789 Kombucha Ginger 6 x 330ml $33.00 $66.00 TAXED
Raw Cacao Powder 250g 2 .... $9.00
Subtotal 87.00
";

const ROSTER: &str = "Weekly Staff Roster
Monday  Sam  Barista  7:00-15:00
Tuesday  Alex  Kitchen  8:00-16:00
Rate $28.50/hr
";

/// CLI command with its per-user config directory pointed into `home`.
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stockin"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_process_json() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "invoice.txt", INVOICE);

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Harvest Wholefoods\""))
        .stdout(predicate::str::contains("Organic Honey 500g"))
        .stdout(predicate::str::contains("\"assessment\": \"invoice\""));
}

#[test]
fn test_process_csv_one_row_per_item() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "invoice.txt", INVOICE);
    let output = dir.path().join("items.csv");

    cli(dir.path())
        .args(["process", "-f", "csv", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("vendor,invoice_number,invoice_date,name,quantity"));
    assert!(lines[2].contains("Kombucha Ginger 6 x 330ml"));
    assert!(lines[2].contains(",6,5.5"));
    assert!(lines[3].ends_with(",loose"));
}

#[test]
fn test_process_text_with_confidence() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "invoice.txt", INVOICE);

    cli(dir.path())
        .args(["process", "-f", "text", "--show-confidence"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vendor: Harvest Wholefoods"))
        .stdout(predicate::str::contains("pack of 6"))
        .stdout(predicate::str::contains("Document confidence"));
}

#[test]
fn test_process_review_flags_roster() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "roster.txt", ROSTER);

    cli(dir.path())
        .args(["process", "--review"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("not_an_invoice"))
        .stderr(predicate::str::contains("Review needed"));
}

#[test]
fn test_rust_log_overrides_verbosity() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "invoice.txt", INVOICE);

    cli(dir.path())
        .env("RUST_LOG", "debug")
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Item table starts at line"));

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Item table starts at line").not());
}

#[test]
fn test_process_missing_file() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "empty.txt", "  \n");

    cli(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file is empty"));
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("inputs");
    fs::create_dir_all(&inputs).unwrap();
    write_file(&inputs, "a.txt", INVOICE);
    write_file(&inputs, "b.txt", ROSTER);
    let output_dir = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("-o")
        .arg(&output_dir)
        .args(["--summary", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(output_dir.join("a.json").exists());
    assert!(output_dir.join("b.json").exists());

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,vendor,invoice_number"));
    assert!(summary.contains("a.txt,success,Harvest Wholefoods,123456,2024-03-12,3,"));
    assert!(summary.contains("not_an_invoice"));
}

#[test]
fn test_batch_stops_on_error() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", INVOICE);
    write_file(dir.path(), "b.txt", "");

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File is empty"));
}

#[test]
fn test_batch_continue_on_error() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", INVOICE);
    write_file(dir.path(), "b.txt", "");
    let output_dir = dir.path().join("out");

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .arg("-o")
        .arg(&output_dir)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed files:"));

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("b.txt,error,"));
    assert!(summary.contains("File is empty"));
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("stockin.json");

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "header.vendor_scan_lines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10"));

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "review.min_item_confidence", "0.8"])
        .assert()
        .success();

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "review.min_item_confidence"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.8"));
}

#[test]
fn test_config_unknown_key() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("stockin.json");

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "ocr.threshold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "tax.bogus", "1"])
        .assert()
        .failure();
}

#[test]
fn test_config_path_uses_user_dir() {
    let dir = TempDir::new().unwrap();

    cli(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_process_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("stockin.json");
    let input = write_file(dir.path(), "invoice.txt", INVOICE);

    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "tax.default_rate_percent", "15"])
        .assert()
        .success();

    // Cacao line: 2 x 9.00 at the assumed 15%
    cli(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["process", "-f", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(",15,2.7"));
}
