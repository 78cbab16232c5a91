use std::fs;
use std::process::{Command, Stdio};

#[test]
fn missing_file_error() {
    let exe = env!("CARGO_BIN_EXE_freq");
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let output = Command::new(exe)
        .arg(missing.to_str().unwrap())
        .stdin(Stdio::null())
        .output()
        .expect("run failed");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("freq: open "), "{stderr}");
    assert!(stderr.contains("missing.txt"));
}

#[test]
fn later_files_are_not_reported_after_failure() {
    let exe = env!("CARGO_BIN_EXE_freq");
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    let missing = dir.path().join("missing.txt");
    fs::write(&good, b"abc").unwrap();
    let output = Command::new(exe)
        .args([good.to_str().unwrap(), missing.to_str().unwrap()])
        .stdin(Stdio::null())
        .output()
        .expect("run failed");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[cfg(unix)]
#[test]
fn directory_read_error_names_source() {
    let exe = env!("CARGO_BIN_EXE_freq");
    let dir = tempfile::tempdir().unwrap();
    // Opening a directory succeeds on unix; reading from it fails.
    let output = Command::new(exe)
        .arg(dir.path().to_str().unwrap())
        .stdin(Stdio::null())
        .output()
        .expect("run failed");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let expected = format!("freq: {}: ", dir.path().display());
    assert!(stderr.starts_with(&expected), "{stderr}");
}
