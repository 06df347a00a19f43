use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("libris-cli")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("migrate"));
}

#[test]
fn migrate_against_in_memory_database() {
    let output = Command::cargo_bin("libris-cli")
        .unwrap()
        .args(["migrate", "--database-url", "sqlite::memory:"])
        .env("LIBRIS_ENV", "local")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("applied 2 migration(s)"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("libris-cli")
        .unwrap()
        .arg("shelve")
        .assert()
        .failure();
}
