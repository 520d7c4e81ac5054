use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn unique_temp_dir() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_micros();
    let dir = std::env::temp_dir().join(format!("linegate-it-{now}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_input(dir: &PathBuf, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write input");
    path
}

fn run_linegate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linegate"))
        .args(args)
        .output()
        .expect("spawn linegate")
}

const NESTED_SCENARIO: &str = "\
if 1
outer-then
if 0
inner-then
else
inner-else
endif
else
outer-else
endif
tail
";

#[test]
fn emits_active_lines_and_stack_trace() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "scenario.txt", NESTED_SCENARIO);

    let output = run_linegate(&[input.to_str().expect("path")]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    // Emitted text appears in both the source and output columns.
    assert_eq!(stdout.matches("outer-then").count(), 2);
    assert_eq!(stdout.matches("inner-else").count(), 2);
    assert_eq!(stdout.matches("tail").count(), 2);
    // Suppressed text appears only in the source column.
    assert_eq!(stdout.matches("inner-then").count(), 1);
    assert_eq!(stdout.matches("outer-else").count(), 1);
    // Stack trace shows nesting, outermost first.
    assert!(stdout.contains("[1, 0]"));
    assert!(stdout.contains("[1, 1]"));
    assert!(stdout.contains("[]"));
    assert!(stdout.contains("Lines: 11  Errors: 0  Warnings: 0"));
}

#[test]
fn no_stack_omits_trace_column() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "scenario.txt", NESTED_SCENARIO);

    let output = run_linegate(&["--no-stack", input.to_str().expect("path")]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(!stdout.contains("STACK"));
    assert!(!stdout.contains("[1, 0]"));
}

#[test]
fn json_format_emits_machine_readable_records() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "scenario.txt", NESTED_SCENARIO);

    let output = run_linegate(&["--format", "json", input.to_str().expect("path")]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let values: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(values.len(), 12);

    let inner_else = values
        .iter()
        .find(|v| v["source"] == "inner-else")
        .expect("inner-else record");
    assert_eq!(inner_else["emitted"], Value::Bool(true));
    assert_eq!(inner_else["status"], "ok");
    assert_eq!(inner_else["stack"], serde_json::json!([true, true]));

    let inner_then = values
        .iter()
        .find(|v| v["source"] == "inner-then")
        .expect("inner-then record");
    assert_eq!(inner_then["emitted"], Value::Bool(false));
    assert_eq!(inner_then["status"], "skip");

    let summary = values.last().expect("summary object");
    assert_eq!(summary["lines"], 11);
    assert_eq!(summary["errors"], 0);
}

#[test]
fn conditional_errors_set_exit_status() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "broken.txt", "else\ntext\n");

    let output = run_linegate(&[input.to_str().expect("path")]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("cnd201"));
    assert!(stderr.contains("ELSE found without matching IF"));

    // Processing still continued: the text line was emitted.
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.matches("text").count(), 2);
}

#[test]
fn unterminated_block_reports_help() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "open.txt", "if 1\nbody\n");

    let output = run_linegate(&[input.to_str().expect("path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("cnd204"));
    assert!(stderr.contains("help: add ENDIF after the block"));
}

#[test]
fn warnings_do_not_fail_unless_werror() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "warn.txt", "if maybe\nbody\nendif\n");
    let path = input.to_str().expect("path");

    let output = run_linegate(&[path]);
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("cnd302"));

    let output = run_linegate(&["--Werror", path]);
    assert!(!output.status.success());

    let output = run_linegate(&["-w", path]);
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.is_empty(), "suppressed warnings must not print: {stderr}");
}

#[test]
fn strict_mode_stops_at_first_error() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "strict.txt", "endif\ntext\n");

    let output = run_linegate(&["--strict", input.to_str().expect("path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("cnd203"));
    assert!(stderr.contains("aborted on first error"));

    // No listing is produced for an aborted run.
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(!stdout.contains("text"));
}

#[test]
fn list_flag_writes_listing_file() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "doc.txt", "if 1\nbody\nendif\n");

    let output = run_linegate(&[input.to_str().expect("path"), "-l"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.is_empty(), "listing must go to the file: {stdout}");

    let listing = fs::read_to_string(dir.join("doc.lst")).expect("listing file");
    assert!(listing.contains("LINE  SOURCE"));
    assert_eq!(listing.matches("body").count(), 2);
}

#[test]
fn error_file_routes_diagnostics() {
    let dir = unique_temp_dir();
    let input = write_input(&dir, "broken.txt", "endif\n");
    let diag_path = dir.join("diag.log");

    let output = run_linegate(&[
        "-E",
        diag_path.to_str().expect("path"),
        input.to_str().expect("path"),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.is_empty(), "diagnostics must go to the file: {stderr}");

    let diag = fs::read_to_string(&diag_path).expect("diagnostics file");
    assert!(diag.contains("cnd203"));
}

#[test]
fn processes_multiple_inputs_independently() {
    let dir = unique_temp_dir();
    let first = write_input(&dir, "first.txt", "if 0\nhidden\n");
    let second = write_input(&dir, "second.txt", "shown\n");

    let output = run_linegate(&[
        first.to_str().expect("path"),
        second.to_str().expect("path"),
    ]);
    // First file has an unterminated block; the second must still be clean.
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.matches("shown").count(), 2);
    assert_eq!(stdout.matches("hidden").count(), 1);
    assert!(stdout.contains("Lines: 1  Errors: 0  Warnings: 0"));
}

#[test]
fn missing_input_reports_io_failure() {
    let dir = unique_temp_dir();
    let missing = dir.join("absent.txt");

    let output = run_linegate(&[missing.to_str().expect("path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("failed to read input"));
}
