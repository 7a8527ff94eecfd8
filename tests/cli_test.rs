use assert_cmd::cargo;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-health");
    let assert = cmd.arg("--help").assert();

    let expected_pattern = if cfg!(windows) {
        "seo-health.exe [OPTIONS] [URL]..."
    } else {
        "seo-health [OPTIONS] [URL]..."
    };

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(expected_pattern))
        .stdout(predicate::str::contains("--allow-private-dns"))
        .stdout(predicate::str::contains("--max-redirects"));
}

#[test]
fn test_cli_without_urls_fails() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-health");
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("seo-health-none"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No URL given"));
}

#[test]
fn test_cli_unsupported_output_format() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-health");
    cmd.args(["https://example.com", "--output", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported output format 'xml'"));
}

#[test]
fn test_cli_rejects_unsafe_urls_without_network() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-health");
    cmd.args([
        "http://127.0.0.1:8080/admin",
        "ftp://files.example.com/",
        "http://printer.local/",
        "--output",
        "json",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "Access to loopback address 127.0.0.1 is not allowed",
    ))
    .stdout(predicate::str::contains("Invalid URL scheme 'ftp'"))
    .stdout(predicate::str::contains(
        "Access to internal hostname 'printer.local' is not allowed",
    ))
    .stdout(predicate::str::contains("\"failedSites\": 3"));
}

#[test]
fn test_cli_text_report_shows_errors() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-health");
    cmd.args(["http://169.254.169.254/latest/meta-data", "--health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SEO Health Report"))
        .stdout(predicate::str::contains(
            "Access to private IP range 169.254.0.0/16 is not allowed",
        ));
}

#[test]
fn test_cli_invalid_concurrency() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-health");
    cmd.args(["https://example.com", "--concurrency", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be at least 1"));
}
