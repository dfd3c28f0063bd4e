//! End-to-end CLI coverage for the Testable Properties and Scenarios in
//! the crate's scan/query contract: a mocked insights API stands in for
//! the real service, and every assertion is made against the process's
//! exit code and stdout/file output, never its internals.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn vetter() -> Command {
    Command::cargo_bin("vetter").unwrap()
}

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

async fn mock_server_with_insight(name_filter: &str, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/insights/v1/package"))
        .and(query_param("name", name_filter))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

async fn mock_server_all_404() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/insights/v1/package"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

fn critical_vuln_insight() -> serde_json::Value {
    serde_json::json!({
        "vulnerabilities": [{
            "id": "GHSA-aaaa",
            "aliases": ["CVE-2024-0001"],
            "severities": [{"scheme": "CVSSv3", "risk": "critical"}]
        }],
        "projects": [],
        "scorecard": null,
        "licenses": []
    })
}

/// Scenario A: a package with a critical vulnerability, `--filter-fail`
/// against `vulns.critical.exists(v, true)`, exits 2.
#[tokio::test]
async fn critical_vulnerability_with_filter_fail_exits_policy_match() {
    let server = mock_server_with_insight("django", critical_vuln_insight()).await;

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--filter")
        .arg("vulns.critical.exists(v, true)")
        .arg("--filter-fail")
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(2);
}

/// The same scan without `--filter-fail` still matches (visible in the
/// console report) but exits 0 — Testable Property 6.
#[tokio::test]
async fn critical_vulnerability_without_filter_fail_exits_ok() {
    let server = mock_server_with_insight("django", critical_vuln_insight()).await;

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--filter")
        .arg("vulns.critical.exists(v, true)")
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("match"));
}

/// Scenario D: the insights API 404s for every package. A filter on
/// `pkg.name` still fires (it needs no enrichment); a filter on `vulns.*`
/// never does, because an absent Insight projects to empty vuln buckets.
#[tokio::test]
async fn enrichment_404_still_lets_pkg_only_filters_fire() {
    let server = mock_server_all_404().await;

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--filter")
        .arg("pkg.name == \"django\"")
        .arg("--filter-fail")
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(2);

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--filter")
        .arg("vulns.critical.exists(v, true)")
        .arg("--filter-fail")
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(0);
}

/// Scenario E: an exceptions file naming the exact (ecosystem, name,
/// version) suppresses a match that would otherwise trip `--filter-fail`.
#[tokio::test]
async fn exception_suppresses_an_otherwise_failing_match() {
    let server = mock_server_with_insight("django", critical_vuln_insight()).await;
    let dir = tempfile::tempdir().unwrap();
    let exceptions_path = dir.path().join("exceptions.yaml");
    fs::write(
        &exceptions_path,
        "exceptions:\n  - ecosystem: pypi\n    name: django\n    version: 2.0.0\n    expires: 2099-01-01\n",
    )
    .unwrap();

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--filter")
        .arg("vulns.critical.exists(v, true)")
        .arg("--filter-fail")
        .arg("--exceptions")
        .arg(&exceptions_path)
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("suppressed"));
}

/// A license-policy filter against an npm package-lock.json fixture
/// (Scenario B's shape, run against the `pkg`-only surface since the
/// fixture carries no license enrichment data).
#[tokio::test]
async fn npm_lockfile_is_discovered_and_evaluated() {
    let server = mock_server_all_404().await;

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("package-lock.json"))
        .arg("--filter")
        .arg("pkg.ecosystem == \"npm\"")
        .arg("--filter-fail")
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(2);
}

/// Scenario C: a Filter Suite with two groups, both of which fire,
/// reported as two distinct match rows in the Markdown report.
#[tokio::test]
async fn filter_suite_reports_one_row_per_fired_group() {
    let mut insight = critical_vuln_insight();
    insight["projects"] = serde_json::json!([{"name": "django/django", "type": "GITHUB", "stars": 1000, "forks": 100, "issues": 250}]);
    let server = mock_server_with_insight("django", insight).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.md");

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--filter-suite")
        .arg(fixture("filter-suite.yaml"))
        .arg("--report-markdown")
        .arg(&report_path)
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(0);

    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("critical-vuln"));
    assert!(report.contains("many-open-issues"));
}

/// Testable Property 5: a scan's JSON dump, re-evaluated with `query`,
/// reaches the same verdict as the live scan that produced it.
#[tokio::test]
async fn scan_dump_and_query_roundtrip_agree_on_verdict() {
    let server = mock_server_with_insight("django", critical_vuln_insight()).await;
    let dump_dir = tempfile::tempdir().unwrap();

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--json-dump")
        .arg(dump_dir.path())
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(0);

    vetter()
        .arg("query")
        .arg("--from-dump")
        .arg(dump_dir.path())
        .arg("--filter")
        .arg("vulns.critical.exists(v, true)")
        .arg("--filter-fail")
        .assert()
        .code(2);
}

/// `--exceptions-generate` writes a loadable exceptions document instead
/// of evaluating policy, and always exits 0 (§6 command table).
#[tokio::test]
async fn exceptions_generate_writes_a_document_and_exits_ok() {
    let server = mock_server_with_insight("django", critical_vuln_insight()).await;
    let dump_dir = tempfile::tempdir().unwrap();

    vetter()
        .arg("scan")
        .arg("--lockfiles")
        .arg(fixture("requirements.txt"))
        .arg("--json-dump")
        .arg(dump_dir.path())
        .env("VET_BASE_URL", server.uri())
        .assert()
        .code(0);

    let exceptions_out = dump_dir.path().join("generated-exceptions.yaml");
    vetter()
        .arg("query")
        .arg("--from-dump")
        .arg(dump_dir.path())
        .arg("--exceptions-generate")
        .arg(&exceptions_out)
        .arg("--exceptions-filter")
        .arg("vulns.critical.exists(v, true)")
        .assert()
        .code(0);

    let written = fs::read_to_string(&exceptions_out).unwrap();
    assert!(written.contains("django"));
}

/// A nonexistent `--from-dump` directory is a configuration error
/// (exit 1), not a policy match (exit 2).
#[test]
fn query_against_a_missing_dump_directory_is_an_error() {
    vetter()
        .arg("query")
        .arg("--from-dump")
        .arg("/no/such/directory/surely")
        .arg("--filter")
        .arg("true")
        .assert()
        .code(1);
}
