/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn dendra(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute cargo run")
}

#[test]
fn binary_shows_help() {
    let output = dendra(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dendra"), "Help output should mention dendra");
    assert!(stdout.contains("clock"));
    assert!(stdout.contains("print"));
}

#[test]
fn binary_shows_version() {
    let output = dendra(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = dendra(&["nonexistent-command"]);

    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn print_draws_braille_frame() {
    let output = dendra(&[
        "print", "--at", "03:15:30", "--width", "40", "--height", "20", "--depth", "4",
    ]);

    assert!(
        output.status.success(),
        "print failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 20);
    assert!(
        stdout.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)),
        "print output should contain braille glyphs"
    );
}

#[test]
fn bad_time_is_rejected() {
    let output = dendra(&["print", "--at", "quarter past"]);
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("panicked at"));
}
