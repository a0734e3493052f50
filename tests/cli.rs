use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

struct Outcome {
    stdout: String,
    stderr: String,
    code: i32,
}

fn run_sort(input: &[u8], args: &[&str]) -> Outcome {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sort"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn sort");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(input)
        .expect("write stdin");
    let output = child.wait_with_output().expect("failed to wait");
    Outcome {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        code: output.status.code().unwrap_or(-1),
    }
}

#[test]
fn test_sorts_stdin() {
    let out = run_sort(b"pear\napple\nfig\n", &[]);
    assert_eq!(out.code, 0);
    assert_eq!(out.stdout, "apple\nfig\npear\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn test_column_numeric_fallback() {
    let out = run_sort(b"3\tb\n1\ta\n2\ta\n", &["-k2", "-n"]);
    assert_eq!(out.code, 0);
    assert_eq!(out.stdout, "1\ta\n2\ta\n3\tb\n");
}

#[test]
fn test_human_numeric_reverse() {
    let out = run_sort(b"1K\n512\n2M\n3k\n", &["-hr"]);
    assert_eq!(out.stdout, "2M\n3k\n1K\n512\n");
}

#[test]
fn test_month_order() {
    let out = run_sort(b"Oct 1\nFeb 3\nJan 9\n", &["-M"]);
    assert_eq!(out.stdout, "Jan 9\nFeb 3\nOct 1\n");
}

#[test]
fn test_unique() {
    let out = run_sort(b"b\na\nb\na\n", &["-u"]);
    assert_eq!(out.stdout, "a\nb\n");
}

#[test]
fn test_check_success_is_silent() {
    let out = run_sort(b"a\nb\nb\nc\n", &["-c"]);
    assert_eq!(out.code, 0);
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn test_check_reports_first_disorder() {
    let out = run_sort(b"a\nc\nb\na\n", &["-c"]);
    assert_eq!(out.code, 1);
    assert!(out.stdout.is_empty());
    assert!(
        out.stderr.contains("line 2: \"c\" > \"b\""),
        "stderr: {}",
        out.stderr
    );
}

#[test]
fn test_invalid_option_is_usage_error() {
    let out = run_sort(b"", &["-x"]);
    assert_eq!(out.code, 2);
    assert!(out.stderr.contains("invalid option"), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("Usage"), "stderr: {}", out.stderr);
}

#[test]
fn test_invalid_key_is_usage_error() {
    let out = run_sort(b"", &["-k", "zero"]);
    assert_eq!(out.code, 2);
    assert!(out.stderr.contains("\"zero\""), "stderr: {}", out.stderr);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.txt");
    let out = run_sort(b"", &[missing.to_str().expect("utf-8 path")]);
    assert_eq!(out.code, 2);
    assert!(out.stderr.contains("nope.txt"), "stderr: {}", out.stderr);
}

#[test]
fn test_files_and_stdin_in_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first = dir.path().join("first.txt");
    let last = dir.path().join("-n");
    fs::write(&first, "b\n").expect("write input");
    fs::write(&last, "c\n").expect("write input");

    // After `--`, "-n" is a file name, and "-" reads stdin in place
    let out = run_sort(
        b"a\n",
        &[
            "-r",
            "--",
            first.to_str().expect("utf-8 path"),
            "-",
            last.to_str().expect("utf-8 path"),
        ],
    );
    assert_eq!(out.code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "c\nb\na\n");
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_file_name() {
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join(std::ffi::OsStr::from_bytes(b"f\xff.txt"));
    fs::write(&input, "b\na\n").expect("write input");

    let output = Command::new(env!("CARGO_BIN_EXE_sort"))
        .arg(&input)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run sort");

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    assert_eq!(output.stdout, b"a\nb\n");
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("out.txt");
    let out = run_sort(b"2\n10\n1\n", &["-n", "-o", output.to_str().expect("utf-8 path")]);
    assert_eq!(out.code, 0);
    assert!(out.stdout.is_empty());
    assert_eq!(fs::read_to_string(&output).expect("read output"), "1\n2\n10\n");
}

#[test]
fn test_debug_reports_on_stderr() {
    let out = run_sort(b"x\n1\n", &["-n", "-M", "--debug"]);
    assert_eq!(out.code, 0);
    assert_eq!(out.stdout, "1\nx\n");
    assert!(out.stderr.contains("comparison mode: month"), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("numeric ordering ignored"), "stderr: {}", out.stderr);
}
