// ABOUTME: End-to-end tests driving the shoji binary
// ABOUTME: Covers output flag validation, exit codes and a full conversion cycle

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn shoji(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shoji"))
        .current_dir(dir)
        .args(["--config", "shoji.toml"])
        .args(args)
        .output()
        .expect("failed to run shoji")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("shoji.toml"), "").unwrap();
    fs::write(
        dir.path().join("hosts.yaml"),
        "Hosts:\n  - Name: foo\n    User: bob\n    Identity: SECRET\n    Port: \"22\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("id1"), "SECRET").unwrap();
    fs::write(
        dir.path().join("config"),
        "Host foo\n  User bob\n  IdentityFile ./id1\n  Port 22\n",
    )
    .unwrap();
    dir
}

fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_missing_destination_exits_with_1() {
    for command in ["yaml", "ssh"] {
        let dir = workspace();
        let input = if command == "yaml" { "hosts.yaml" } else { "config" };
        let before = entries(dir.path());

        let output = shoji(dir.path(), &["convert", command, input]);

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("--unsecure"));
        assert!(output.stdout.is_empty());
        assert_eq!(entries(dir.path()), before);
    }
}

#[test]
fn test_conflicting_destinations_exit_with_2() {
    for command in ["yaml", "ssh"] {
        let dir = workspace();
        let input = if command == "yaml" { "hosts.yaml" } else { "config" };
        let before = entries(dir.path());

        let output = shoji(dir.path(), &["convert", command, input, "-o", "out", "-u"]);

        assert_eq!(output.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&output.stderr).contains("can't mix"));
        assert!(!dir.path().join("out").exists());
        assert!(!dir.path().join("ssh").exists());
        assert_eq!(entries(dir.path()), before);
    }
}

#[test]
fn test_yaml_to_stdout_writes_default_key_directory() {
    let dir = workspace();

    let output = shoji(dir.path(), &["convert", "yaml", "hosts.yaml", "-u"]);

    assert!(output.status.success());
    let keys: Vec<_> = fs::read_dir(dir.path().join("ssh"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(keys.len(), 1);
    assert_eq!(fs::read_to_string(&keys[0]).unwrap(), "SECRET");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Host foo");
    assert_eq!(lines[1], "\tUser bob");
    assert!(lines[2].starts_with("\tIdentityFile "));
    assert!(lines[2].contains("bob-foo-"));
    assert_eq!(lines[3], "\tPort 22");
}

#[test]
fn test_ssh_to_yaml_file() {
    let dir = workspace();

    let output = shoji(dir.path(), &["convert", "ssh", "config", "-o", "out.yaml"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let yaml = fs::read_to_string(dir.path().join("out.yaml")).unwrap();
    assert!(yaml.contains("Name: foo"));
    assert!(yaml.contains("User: bob"));
    assert!(yaml.contains("SECRET"));
}

#[test]
fn test_missing_input_is_a_conversion_failure() {
    let dir = workspace();

    let output = shoji(dir.path(), &["convert", "ssh", "absent", "-o", "out.yaml"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read SSH config file"));
    assert!(!dir.path().join("out.yaml").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_output_flags_checked_before_broken_default_config() {
    let dir = workspace();
    let config_home = dir.path().join("xdg");
    fs::create_dir_all(config_home.join("shoji")).unwrap();
    fs::write(
        config_home.join("shoji").join("config.toml"),
        "[keys]\ndigest_length = 0\n",
    )
    .unwrap();

    let run = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_shoji"))
            .current_dir(dir.path())
            .env("XDG_CONFIG_HOME", &config_home)
            .args(args)
            .output()
            .expect("failed to run shoji")
    };

    let both = run(&["convert", "ssh", "config", "-o", "out", "-u"]);
    assert_eq!(both.status.code(), Some(2));
    assert!(!dir.path().join("out").exists());

    let neither = run(&["convert", "yaml", "hosts.yaml"]);
    assert_eq!(neither.status.code(), Some(1));
    assert!(!dir.path().join("ssh").exists());

    // A valid invocation still reports the broken configuration
    let valid = run(&["convert", "ssh", "config", "-o", "out"]);
    assert_eq!(valid.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&valid.stderr).contains("digest_length"));
}

#[test]
fn test_binary_identity_file_is_rejected() {
    let dir = workspace();
    fs::write(dir.path().join("id1"), [0x30u8, 0x82, 0xff, 0xfe]).unwrap();

    let output = shoji(dir.path(), &["convert", "ssh", "config", "-o", "out.yaml"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a text key"));
    assert!(!dir.path().join("out.yaml").exists());
}
