use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::TempDir;

fn shellforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shellforge"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn count(stdout: &str, pattern: &str) -> u64 {
    let re = Regex::new(pattern).unwrap();
    re.captures(stdout)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", pattern, stdout))
}

const SMALL_SEARCH: [&str; 13] = [
    "search",
    "--min-gauge",
    "100",
    "--max-gauge",
    "102",
    "--max-gp",
    "0.5",
    "--max-rg",
    "1",
    "--fixed-total",
    "15",
    "--threads",
    "2",
];

#[test]
fn test_cli_modules_lists_catalog() {
    let output = shellforge(&["modules", "--kind", "head"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Solid head"));
    assert!(stdout.contains("Sabot head"));
    assert!(!stdout.contains("Tracer"));
}

#[test]
fn test_cli_search_reports_statistics() {
    let output = shellforge(&SMALL_SEARCH);
    assert!(output.status.success());
    let stdout = stdout_of(&output);

    // 1286 tuples per gauge, three gauges, nothing rejected.
    assert_eq!(count(&stdout, r"(\d+) total shells tested\."), 3858);
    assert_eq!(count(&stdout, r"(\d+) shells compared\."), 3858);
    assert_eq!(count(&stdout, r"(\d+) shells rejected due to length\."), 0);
    assert!(stdout.contains("1 m (belt)"));
    assert!(stdout.contains("Testing Solid head 100 mm. Max 102 mm."));
}

#[test]
fn test_cli_unlabelled_output_uses_single_table() {
    let mut args = SMALL_SEARCH.to_vec();
    args.extend(["--labels", "false"]);
    let output = shellforge(&args);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let header = stdout
        .lines()
        .find(|l| l.contains("1 m (belt)"))
        .expect("bracket header row");
    assert_eq!(header.matches("| 1 m").count(), 2);
    assert!(stdout.contains("Body modules"));
}

#[test]
fn test_cli_params_file_with_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("params.json");
    let mut f = File::create(&path).unwrap();
    writeln!(
        f,
        r#"{{ "shell": {{ "min_gauge": 150, "max_gauge": 150, "fixed_total": 17, "max_gp": 0.2 }},
             "run": {{ "threads": 1 }} }}"#
    )
    .unwrap();

    let output = shellforge(&[
        "search",
        "--params",
        path.to_str().unwrap(),
        "--max-gauge",
        "151",
    ]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert_eq!(count(&stdout, r"Searched (\d+) partitions"), 2);
}

#[test]
fn test_cli_unknown_module_fails() {
    let output = shellforge(&["search", "--heads", "Plasma head"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_missing_catalog_falls_back_to_builtin() {
    let output = shellforge(&[
        "modules",
        "--catalog",
        "no/such/catalog.json",
    ]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Gravity compensator"));
}
