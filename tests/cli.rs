use std::io::Write;
use std::process::{Command, Output};

fn diskperf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diskperf"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("running diskperf")
}

fn target_file(len: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(&vec![0xa5; len]).expect("filling temp file");
    file.flush().expect("flushing temp file");
    file
}

#[test]
fn nothing_to_do() {
    let out = diskperf(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("nothing to do"));
}

#[test]
fn help_succeeds() {
    for flag in ["-h", "--help"] {
        let out = diskperf(&[flag]);
        assert_eq!(out.status.code(), Some(0));
        assert!(String::from_utf8_lossy(&out.stdout).contains("--nb-blocks"));
    }
}

#[test]
fn unknown_option_fails() {
    let out = diskperf(&["--frobnicate", "/dev/null"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn random_mode_prints_latency() {
    let file = target_file(1 << 20);
    let path = file.path().to_str().expect("utf-8 temp path");
    let out = diskperf(&["-n", "50", "--seed", "7", path]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "{stdout}");
    let latency: f64 = lines[0].parse().expect("a bare number");
    assert!(latency >= 0.0);
}

#[test]
fn sequential_verbose_prints_throughput() {
    let file = target_file(1 << 20);
    let path = file.path().to_str().expect("utf-8 temp path");
    let out = diskperf(&["-l", "-v", "-n", "100", "-s", "0x1000", path]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("409600 bytes read in "),
        "unexpected output: {stdout}"
    );
    assert!(stdout.trim_end().ends_with("bytes/seconds"));
}

#[test]
fn failing_targets_do_not_fail_the_run() {
    let small = target_file(100);
    let good = target_file(1 << 16);
    let out = diskperf(&[
        "-n",
        "10",
        small.path().to_str().expect("utf-8 temp path"),
        "/nonexistent/diskperf/target",
        good.path().to_str().expect("utf-8 temp path"),
    ]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 1);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("too small"), "{stderr}");
    assert!(stderr.contains("Could not open"), "{stderr}");
}

#[test]
fn zero_blocks_is_reported() {
    let file = target_file(1 << 16);
    let out = diskperf(&["-n", "0", file.path().to_str().expect("utf-8 temp path")]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No block could be read"));
}
