use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use schema_inspector::InspectError;
use schema_inspector::cli::{Cli, exit_status, run};
use schema_inspector::inference::{ColumnNote, Role};
use schema_inspector::report::{InspectOptions, inspect_directory};
use schema_inspector::types::DataType;

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("schema-inspector-{name}-{nanos}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_churn_csv(dir: &Path) {
    let mut csv = String::from("user_id,signup_date,plan,churned\n");
    let plans = ["basic", "pro", "team"];
    for i in 0..30 {
        let _ = writeln!(
            csv,
            "{},2024-01-{:02},{},{}",
            1000 + i,
            i % 28 + 1,
            plans[i % 3],
            i % 2
        );
    }
    fs::write(dir.join("churn.csv"), csv).unwrap();
}

fn options(dir: &Path, target: Option<&str>) -> InspectOptions {
    InspectOptions {
        data_dir: dir.to_path_buf(),
        target: target.map(str::to_string),
        ..InspectOptions::default()
    }
}

#[test]
fn churn_csv_roles_and_candidates() {
    let dir = tmp_dir("churn");
    write_churn_csv(&dir);

    let report = inspect_directory(&options(&dir, Some("churned"))).unwrap();
    assert_eq!(report.tables.len(), 1);
    let table = &report.tables[0];
    assert_eq!(table.row_count, 30);

    let roles: Vec<(&str, Role)> = table.columns.iter().map(|c| (c.name.as_str(), c.role)).collect();
    assert_eq!(
        roles,
        vec![
            ("user_id", Role::Id),
            ("signup_date", Role::Datetime),
            ("plan", Role::Categorical),
            ("churned", Role::Target),
        ]
    );
    assert_eq!(table.columns[0].notes, vec![ColumnNote::PossibleIdentifier]);
    assert_eq!(table.columns[1].dtype, DataType::Date);

    let plan = &table.columns[2];
    assert_eq!(plan.coverage_pct, 100.0);
    assert_eq!(plan.distinct_count, 3);
    assert_eq!(plan.examples, vec!["basic", "pro", "team"]);
    assert!(plan.notes.is_empty());

    let keys: Vec<&str> = report.candidates.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["churn.csv::plan"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn without_target_the_label_is_a_binary_numeric_candidate() {
    let dir = tmp_dir("no-target");
    write_churn_csv(&dir);

    let report = inspect_directory(&options(&dir, None)).unwrap();
    let churned = &report.tables[0].columns[3];
    assert_eq!(churned.role, Role::Numeric);
    assert_eq!(churned.notes, vec![ColumnNote::Binary]);
    let keys: Vec<&str> = report.candidates.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["churn.csv::churned", "churn.csv::plan"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sample_rows_caps_the_reported_row_count() {
    let dir = tmp_dir("sample");
    let mut csv = String::from("amount,segment\n");
    for i in 0..10_000 {
        let _ = writeln!(csv, "{}.5,{}", i, if i % 2 == 0 { "a" } else { "b" });
    }
    fs::write(dir.join("big.csv"), csv).unwrap();

    let mut opts = options(&dir, None);
    opts.load.sample_rows = Some(100);
    let report = inspect_directory(&opts).unwrap();
    assert_eq!(report.tables[0].row_count, 100);
    assert_eq!(report.tables[0].columns[0].distinct_count, 100);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_column_reads_as_constant_numeric() {
    let dir = tmp_dir("empty-column");
    fs::write(dir.join("orders.csv"), "amount,discount\n1,\n2,\n3,\n").unwrap();

    let report = inspect_directory(&options(&dir, None)).unwrap();
    let discount = &report.tables[0].columns[1];
    assert_eq!(discount.dtype, DataType::Float64);
    assert_eq!(discount.role, Role::Numeric);
    assert_eq!(discount.notes, vec![ColumnNote::ConstantColumn]);
    assert_eq!(discount.coverage_pct, 0.0);
    assert_eq!(discount.distinct_count, 1);
    assert!(discount.examples.is_empty());
    let keys: Vec<&str> = report.candidates.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["orders.csv::amount"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn directory_without_supported_files_fails_with_empty_stdout() {
    let dir = tmp_dir("txt-only");
    fs::write(dir.join("notes.txt"), "nothing tabular here\n").unwrap();

    let cli = Cli::try_parse_from(["schema-inspector", "--data-dir", dir.to_str().unwrap()]).unwrap();
    let mut stdout = Vec::new();
    let result = run(&cli, &mut stdout);
    assert!(matches!(result, Err(InspectError::NoFilesFound { .. })));
    assert_eq!(exit_status(&result), 1);
    assert!(stdout.is_empty());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_data_directory_is_a_usage_error() {
    let dir = std::env::temp_dir().join("schema-inspector-definitely-missing-dir");
    let cli = Cli::try_parse_from(["schema-inspector", "--data-dir", dir.to_str().unwrap()]).unwrap();
    let mut stdout = Vec::new();
    let result = run(&cli, &mut stdout);
    assert!(matches!(result, Err(InspectError::MissingDataDirectory { .. })));
    assert_eq!(exit_status(&result), 2);
    assert!(stdout.is_empty());
}

#[test]
fn unreadable_file_is_recorded_and_the_rest_are_summarized() {
    let dir = tmp_dir("partial");
    write_churn_csv(&dir);
    fs::write(dir.join("broken.parquet"), b"not a parquet file").unwrap();

    let report = inspect_directory(&options(&dir, Some("churned"))).unwrap();
    assert_eq!(report.tables.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("broken.parquet"));
    assert!(report.failures[0].message.contains("parquet error"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn every_file_failing_is_an_error() {
    let dir = tmp_dir("all-broken");
    fs::write(dir.join("a.parquet"), b"junk").unwrap();
    fs::write(dir.join("b.feather"), b"junk").unwrap();

    let err = inspect_directory(&options(&dir, None)).unwrap_err();
    assert!(matches!(err, InspectError::NoSummariesProduced { attempted: 2 }));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn nested_directories_are_scanned_in_path_order() {
    let dir = tmp_dir("nested");
    fs::create_dir_all(dir.join("b")).unwrap();
    fs::create_dir_all(dir.join("a")).unwrap();
    fs::write(dir.join("b").join("one.csv"), "x\n1\n").unwrap();
    fs::write(dir.join("a").join("two.CSV"), "y\n2\n").unwrap();

    let report = inspect_directory(&options(&dir, None)).unwrap();
    let names: Vec<String> = report.tables.iter().map(|t| t.file_name()).collect();
    assert_eq!(names, vec!["two.CSV", "one.csv"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_writes_markdown_and_json_outputs() {
    let dir = tmp_dir("outputs");
    write_churn_csv(&dir);
    let out_dir = tmp_dir("outputs-dest");
    let md_path = out_dir.join("summary.md");
    let json_path = out_dir.join("summary.json");

    let cli = Cli::try_parse_from([
        "schema-inspector",
        "--data-dir",
        dir.to_str().unwrap(),
        "--target",
        "churned",
        "--output",
        md_path.to_str().unwrap(),
        "--json-output",
        json_path.to_str().unwrap(),
    ])
    .unwrap();
    let mut stdout = Vec::new();
    let result = run(&cli, &mut stdout);
    assert!(result.is_ok());
    assert_eq!(exit_status(&result), 0);

    let printed = String::from_utf8(stdout).unwrap();
    assert!(printed.starts_with("## Schema Summary"));
    assert!(printed.contains("### churn.csv (30 rows)"));
    assert!(printed.contains("| churned | int64 | target | 100.0% | 2 | 0, 1 |  |"));
    assert!(printed.contains("| churn.csv::plan | categorical | 100.0% | 3 |"));

    let written = fs::read_to_string(&md_path).unwrap();
    assert_eq!(format!("{written}\n"), printed);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[0]["row_count"], 30);
    assert_eq!(json[0]["columns"][1]["dtype"], "date");
    assert_eq!(json[0]["columns"][3]["role"], "target");

    let _ = fs::remove_dir_all(&dir);
    let _ = fs::remove_dir_all(&out_dir);
}

#[test]
fn unwritable_output_path_fails_the_run() {
    let dir = tmp_dir("bad-output");
    write_churn_csv(&dir);
    let target = dir.join("no-such-dir").join("summary.md");

    let cli = Cli::try_parse_from([
        "schema-inspector",
        "--data-dir",
        dir.to_str().unwrap(),
        "--output",
        target.to_str().unwrap(),
    ])
    .unwrap();
    let result = run(&cli, &mut Vec::new());
    assert!(matches!(result, Err(InspectError::Output { .. })));
    assert_eq!(exit_status(&result), 1);

    let _ = fs::remove_dir_all(&dir);
}
