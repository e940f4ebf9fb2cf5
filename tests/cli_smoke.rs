//! Smoke tests for the `serial-sniff` binary's configuration errors.
//!
//! Every case here must fail before a monitor starts, so none of them need
//! real serial hardware.
use std::process::{Command, Output, Stdio};

fn sniff(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_serial-sniff"));
    cmd.args(args)
        // Keep a stray config file or env override from changing the outcome.
        .env("SERIAL_SNIFF_CONFIG", "/nonexistent/serial-sniff.toml")
        .env_remove("SERIAL_SNIFF_OUTPUT_STYLE")
        .env_remove("SERIAL_SNIFF_OUTPUT_SEPARATOR")
        .env_remove("SERIAL_SNIFF_SERIAL_BAUD_RATE")
        .current_dir(std::env::temp_dir())
        .stdin(Stdio::null());
    cmd
}

fn run(args: &[&str]) -> Output {
    sniff(args).output().expect("failed to start binary")
}

#[test]
fn unknown_output_style_exits_with_status_1() {
    let out = run(&[
        "--tx",
        "/dev/null-tx",
        "--rx",
        "/dev/null-rx",
        "--output",
        "xml",
    ]);

    assert_eq!(out.status.code(), Some(1));
    assert!(
        out.stdout.is_empty(),
        "stdout: {:?}",
        String::from_utf8_lossy(&out.stdout)
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("output style should be one of: utf8, bytes, pybytes"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn undecodable_separator_exits_with_status_1() {
    let out = run(&["-t", "A", "-r", "B", "-s", "\\x4"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid separator"));
}

#[test]
fn explicit_missing_config_file_exits_with_status_1() {
    let out = run(&["-t", "A", "-r", "B", "--config", "/nonexistent/explicit.toml"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("not found"));
}

#[test]
fn missing_required_port_is_a_usage_error() {
    let out = run(&["--tx", "A"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--rx"));
}

#[test]
fn raw_line_break_in_separator_exits_with_status_1() {
    let out = run(&["-t", "A", "-r", "B", "-s", "a\nb"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid separator"));
}

#[cfg(unix)]
#[test]
fn interrupt_exits_zero_with_blank_line() {
    use std::io::Read;
    use std::time::{Duration, Instant};

    let mut child = sniff(&["-t", "/dev/serial-sniff-no-tx", "-r", "/dev/serial-sniff-no-rx"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start binary");

    // Both monitors are now cycling through failed opens.
    std::thread::sleep(Duration::from_millis(500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("failed to run kill");
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("serial-sniff did not exit after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let mut stdout = String::new();
    child
        .stdout
        .take()
        .unwrap()
        .read_to_string(&mut stdout)
        .unwrap();

    assert_eq!(status.code(), Some(0));
    assert_eq!(stdout, "\n");
}
