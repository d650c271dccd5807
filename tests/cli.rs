use assert_cmd::Command;

#[test]
fn help_describes_the_game() {
    let output = Command::cargo_bin("wordrace")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--secs"));
    assert!(stdout.contains("--max-words"));
    assert!(stdout.contains("--vocabulary"));
}

#[test]
fn invalid_settings_fail_before_touching_the_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("absent.json");

    Command::cargo_bin("wordrace")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "--secs", "0"])
        .assert()
        .failure();
}

#[test]
fn refuses_to_run_without_a_tty() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("absent.json");

    Command::cargo_bin("wordrace")
        .unwrap()
        .args(["--config", config.to_str().unwrap()])
        .write_stdin("")
        .assert()
        .failure();
}
