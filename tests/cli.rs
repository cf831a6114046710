use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn explorergen() -> Command {
    Command::cargo_bin("explorergen").unwrap()
}

#[test]
fn test_list() {
    explorergen()
        .arg("--list")
        .assert()
        .success()
        .stdout(
            "lis-incomes-across-distribution\nlis-expanded-poverty\npoverty-explorer\nincomes-across-distribution-comparison\n",
        );
}

#[test]
fn test_single_explorer_to_stdout() {
    explorergen()
        .arg("lis-incomes-across-distribution")
        .arg(fixtures().join("lis"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "explorerTitle\tIncomes across the distribution (Luxembourg Income Study)",
        ))
        .stdout(predicate::str::contains("\n\ngraphers\n\ttitle\tySlugs\t"))
        .stdout(predicate::str::contains("\ncolumns\tlis_main\n\tname\tslug\ttype\t"));
}

#[test]
fn test_output_file_is_deterministic() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.tsv");
    let second = dir.path().join("second.tsv");

    for path in [&first, &second] {
        explorergen()
            .arg("lis-expanded-poverty")
            .arg(fixtures().join("lis"))
            .arg("-o")
            .arg(path)
            .assert()
            .success()
            .stdout("");
    }

    let a = fs::read(&first).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, fs::read(&second).unwrap());
}

#[test]
fn test_all_writes_one_file_per_explorer() {
    let dir = tempdir().unwrap();
    explorergen()
        .arg("all")
        .arg(fixtures())
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success();

    for name in [
        "lis-incomes-across-distribution",
        "lis-expanded-poverty",
        "poverty-explorer",
        "incomes-across-distribution-comparison",
    ] {
        let path = dir.path().join(format!("{}.explorer.tsv", name));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("explorerTitle\t"), "{}", name);
    }

    let pip = fs::read_to_string(dir.path().join("poverty-explorer.explorer.tsv")).unwrap();
    assert!(pip.contains("\ntable\thttps://raw.githubusercontent.com/"));
    assert!(pip.contains("\ncolumns\tinc_or_cons_mean\n"));

    let comparison = fs::read_to_string(
        dir.path()
            .join("incomes-across-distribution-comparison.explorer.tsv"),
    )
    .unwrap();
    assert!(comparison.contains("\ncolumns\tpoverty_inequality\n"));
    assert!(comparison.contains("(PIP data)"));
    assert!(comparison.contains("(WID data)"));
    assert!(comparison.contains("(LIS data)"));
}

fn stdout_of(explorer: &str, input: PathBuf) -> Vec<u8> {
    let output = explorergen().arg(explorer).arg(input).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    output.stdout
}

#[test]
fn test_workbook_input_matches_sheet_directory() {
    let from_workbook = stdout_of("poverty-explorer", fixtures().join("workbooks").join("pip.xlsx"));
    let from_directory = stdout_of("poverty-explorer", fixtures().join("pip"));

    assert!(!from_workbook.is_empty());
    assert_eq!(
        String::from_utf8(from_workbook).unwrap(),
        String::from_utf8(from_directory).unwrap()
    );
}

#[test]
fn test_all_reads_workbook_groups() {
    let root = tempdir().unwrap();
    for group in ["lis", "multisource"] {
        let dir = root.path().join(group);
        fs::create_dir(&dir).unwrap();
        for entry in fs::read_dir(fixtures().join(group)).unwrap() {
            let path = entry.unwrap().path();
            fs::copy(&path, dir.join(path.file_name().unwrap())).unwrap();
        }
    }
    fs::copy(
        fixtures().join("workbooks").join("pip.xlsx"),
        root.path().join("pip.xlsx"),
    )
    .unwrap();

    let out = tempdir().unwrap();
    explorergen()
        .arg("all")
        .arg(root.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 4);
    assert_eq!(
        fs::read(out.path().join("poverty-explorer.explorer.tsv")).unwrap(),
        stdout_of("poverty-explorer", fixtures().join("pip"))
    );
}

#[test]
fn test_json_format() {
    let output = explorergen()
        .arg("poverty-explorer")
        .arg(fixtures().join("pip"))
        .args(["-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "poverty-explorer");
    assert_eq!(value["header"]["wpBlockId"][0], "52633");
    assert!(value["graphers"].as_array().unwrap().len() > 1);
}

#[test]
fn test_check_and_stats() {
    explorergen()
        .arg("poverty-explorer")
        .arg(fixtures().join("pip"))
        .arg("--check")
        .arg("--stats-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("poverty-explorer"))
        .stdout(predicate::str::contains("Default views"))
        .stderr(predicate::str::contains("ok  poverty-explorer"));
}

#[test]
fn test_unknown_explorer() {
    explorergen()
        .arg("global-food")
        .arg(fixtures().join("lis"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error: Unknown explorer: global-food"));
}

#[test]
fn test_missing_sheet() {
    explorergen()
        .arg("poverty-explorer")
        .arg(fixtures().join("lis"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Sheet not found: survey_type"));
}

#[test]
fn test_missing_input() {
    explorergen()
        .arg("poverty-explorer")
        .arg(fixtures().join("does-not-exist"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input not found"));
}

#[test]
fn test_invalid_facet_rows() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("survey_type.csv"), "table_name,text\ninc_or_cons,income\n").unwrap();
    for sheet in ["povlines_abs", "povlines_rel"] {
        fs::copy(
            fixtures().join("pip").join(format!("{}.csv", sheet)),
            dir.path().join(format!("{}.csv", sheet)),
        )
        .unwrap();
    }

    explorergen()
        .arg("poverty-explorer")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("survey_type"))
        .stderr(predicate::str::contains("dropdown_option"));
}
