//! Integration tests for the nacha-merge CLI.
//!
//! These tests run the actual binary against CSV inputs written to a
//! temporary directory and inspect the ACH outputs and the summary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "immediate_destination,immediate_origin,file_creation_date,batch_number,service_class_code,company_name,company_identification,standard_entry_class_code,company_entry_description,effective_entry_date,odfi_identification,transaction_code,routing_number,dfi_account_number,amount,individual_name,trace_number,addenda05";

/// A PPD debit file with `count` entries of $1,000,000.00 each.
fn ppd_csv(count: usize) -> String {
    let mut csv = String::from(HEADER);
    for i in 0..count {
        csv.push_str(&format!(
            "\n231380104,121042882,2019-08-16,1,225,Name on Account,121042882,PPD,REG.SALARY,2019-08-17,12104288,27,231380104,12345678,1000000.00,Receiver Account Name,{},",
            121_042_880_000_001u64 + i as u64
        ));
    }
    csv
}

fn web_csv() -> String {
    format!(
        "{}\n{}\n{}",
        HEADER,
        "231380104,121042882,2019-08-16,1,225,Online Merchant,231380104,WEB,SUBSCRIBE,2019-08-17,23138010,27,031300012,744-5678-99,100.00,Jane Smith,231380100000001,PAY-GATE payment",
        "231380104,121042882,2019-08-16,2,225,Online Merchant,231380104,WEB,RENEWAL,2019-08-17,23138010,27,031300012,744-5678-99,300.00,Sam Davis,231380100000003,PAY-GATE payment|receipt 3",
    )
}

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn outputs(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    paths.sort();
    paths
}

fn nacha_merge() -> Command {
    let mut cmd = Command::cargo_bin("nacha-merge").unwrap();
    cmd.env_remove("NACHA_MAX_LINES")
        .env_remove("NACHA_MAX_DOLLAR_AMOUNT");
    cmd
}

#[test]
fn test_merges_inputs_into_one_file() {
    let dir = TempDir::new().unwrap();
    let a = write_input(&dir, "a.csv", &ppd_csv(1));
    let b = write_input(&dir, "b.csv", &web_csv());
    let out_dir = dir.path().join("out");

    nacha_merge()
        .arg("--out-dir")
        .arg(&out_dir)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "file,immediate_origin,immediate_destination,batches,entries,lines,blocks,total_debit,total_credit,entry_hash",
        ))
        .stdout(predicate::str::contains(
            "1,121042882,231380104,3,3,14,2,1000400.00,0.00,",
        ));

    let files = outputs(&out_dir);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("merged-001.ach"));

    let text = fs::read_to_string(&files[0]).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 20);
    assert!(lines.iter().all(|l| l.len() == 94));
    assert!(lines[0].starts_with('1'));
    assert!(lines[19].bytes().all(|b| b == b'9'));
}

#[test]
fn test_splits_on_dollar_limit() {
    let dir = TempDir::new().unwrap();
    let a = write_input(&dir, "a.csv", &ppd_csv(5));
    let out_dir = dir.path().join("out");

    let assert = nacha_merge()
        .args(["--max-dollar-amount", "2000000.00", "-o"])
        .arg(&out_dir)
        .arg(&a)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1 + 3);
    assert_eq!(outputs(&out_dir).len(), 3);
    assert!(out_dir.join("merged-003.ach").exists());
}

#[test]
fn test_line_limit_from_environment() {
    let dir = TempDir::new().unwrap();
    let a = write_input(&dir, "a.csv", &ppd_csv(20));
    let out_dir = dir.path().join("out");

    nacha_merge()
        .env("NACHA_MAX_LINES", "10")
        .arg("-o")
        .arg(&out_dir)
        .arg(&a)
        .assert()
        .success();

    // 10 lines hold header, control and a batch of 6 entries
    assert_eq!(outputs(&out_dir).len(), 4);
}

#[test]
fn test_missing_file_error() {
    let dir = TempDir::new().unwrap();
    nacha_merge()
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg("nonexistent.csv")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_missing_argument_error() {
    nacha_merge()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_header_fails_without_outputs() {
    let dir = TempDir::new().unwrap();
    let csv = ppd_csv(1).replace("231380104,121042882,2019", "231380104,0000000000,2019");
    let a = write_input(&dir, "a.csv", &csv);
    let out_dir = dir.path().join("out");

    nacha_merge()
        .arg("-o")
        .arg(&out_dir)
        .arg(&a)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ImmediateOrigin"));
    assert!(!out_dir.exists());
}

#[test]
fn test_skip_all_accepts_invalid_header() {
    let dir = TempDir::new().unwrap();
    let csv = ppd_csv(1).replace("231380104,121042882,2019", "231380104,0000000000,2019");
    let a = write_input(&dir, "a.csv", &csv);
    let out_dir = dir.path().join("out");

    nacha_merge()
        .arg("--skip-all")
        .arg("-o")
        .arg(&out_dir)
        .arg(&a)
        .assert()
        .success();
    assert_eq!(outputs(&out_dir).len(), 1);
}

#[test]
fn test_bad_row_reports_row_number() {
    let dir = TempDir::new().unwrap();
    let csv = format!(
        "{}\n{}",
        ppd_csv(1),
        "231380104,121042882,2019-08-16,1,225,Name on Account,121042882,PPD,REG.SALARY,2019-08-17,12104288,27,231380104,12345678,lots,Receiver Account Name,121042880000009,"
    );
    let a = write_input(&dir, "a.csv", &csv);

    nacha_merge()
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 3"));
}
