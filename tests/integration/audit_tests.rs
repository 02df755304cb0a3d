//! End-to-end audit tests: mock sitemap server plus a fake engine

use crate::common::{
    mount_status, mount_xml, sitemap_index, urls, urlset, FakeEngine, FakeRun, CLEAN_OUTPUT,
    FIXTURE,
};
use linkaudit::audit::{audit, AuditStatus, RunMode};
use linkaudit::checker::{CheckOptions, Checker};
use linkaudit::config::{Config, SitemapConfig};
use linkaudit::output::OutputFormat;
use linkaudit::sitemap::SitemapResolver;
use linkaudit::{AuditError, SitemapError};
use tempfile::TempDir;
use wiremock::MockServer;

fn resolver() -> SitemapResolver {
    SitemapResolver::new(&SitemapConfig::default()).expect("Failed to build resolver")
}

fn options() -> CheckOptions {
    CheckOptions::from_config(&Config::default())
}

/// Serves an index with two children sharing one page
async fn mount_two_sitemaps(server: &MockServer) -> Vec<String> {
    let children = urls(server, &["/pages.xml", "/posts.xml"]);
    mount_xml(server, "/sitemap_index.xml", sitemap_index(&children)).await;
    mount_xml(server, "/pages.xml", urlset(&urls(server, &["/", "/about"]))).await;
    mount_xml(
        server,
        "/posts.xml",
        urlset(&urls(server, &["/blog/1", "/about"])),
    )
    .await;
    children
}

#[tokio::test]
async fn test_merged_audit_finds_broken_links() {
    let mock_server = MockServer::start().await;
    mount_two_sitemaps(&mock_server).await;

    let checker = Checker::new(FakeEngine::new(vec![FakeRun::Output(FIXTURE)]));
    let status = audit(
        &resolver(),
        &checker,
        &format!("{}/sitemap_index.xml", mock_server.uri()),
        RunMode::Merged,
        &options(),
    )
    .await
    .expect("Audit failed");

    assert_eq!(status, AuditStatus::LinksBroken);
    assert_eq!(status.exit_code(), 2);

    let seen = checker.engine().seen_urls();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], urls(&mock_server, &["/", "/about", "/blog/1"]));
}

#[tokio::test]
async fn test_merged_audit_clean() {
    let mock_server = MockServer::start().await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&urls(&mock_server, &["/", "/about"])),
    )
    .await;

    let checker = Checker::new(FakeEngine::new(vec![FakeRun::Output(CLEAN_OUTPUT)]));
    let status = audit(
        &resolver(),
        &checker,
        &format!("{}/sitemap.xml", mock_server.uri()),
        RunMode::Merged,
        &options(),
    )
    .await
    .expect("Audit failed");

    assert_eq!(status, AuditStatus::Clean);
    assert_eq!(status.exit_code(), 0);
}

#[tokio::test]
async fn test_merged_audit_writes_engine_output() {
    let mock_server = MockServer::start().await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&urls(&mock_server, &["/"])),
    )
    .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("links.json");
    let mut options = options();
    options.format = OutputFormat::Json;
    options.output_file = Some(output_path.clone());

    let checker = Checker::new(FakeEngine::new(vec![FakeRun::Output(FIXTURE)]));
    audit(
        &resolver(),
        &checker,
        &format!("{}/sitemap.xml", mock_server.uri()),
        RunMode::Merged,
        &options,
    )
    .await
    .expect("Audit failed");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).expect("No output file"))
            .expect("Output is not JSON");
    assert_eq!(written["errors"], 2);
}

#[tokio::test]
async fn test_grouped_audit_skips_crashed_group() {
    let mock_server = MockServer::start().await;
    let children = mount_two_sitemaps(&mock_server).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.json");
    let mut options = options();
    options.format = OutputFormat::Json;
    options.output_file = Some(report_path.clone());

    let checker = Checker::new(FakeEngine::new(vec![
        FakeRun::Output(FIXTURE),
        FakeRun::Crash,
    ]));
    let status = audit(
        &resolver(),
        &checker,
        &format!("{}/sitemap_index.xml", mock_server.uri()),
        RunMode::Grouped,
        &options,
    )
    .await
    .expect("Audit failed");

    assert_eq!(status, AuditStatus::LinksBroken);

    // Each group is checked on its own, duplicates across groups included
    let seen = checker.engine().seen_urls();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], urls(&mock_server, &["/", "/about"]));
    assert_eq!(seen[1], urls(&mock_server, &["/blog/1", "/about"]));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("No report"))
            .expect("Report is not JSON");
    let sitemaps = report["sitemaps"].as_array().expect("sitemaps array");
    assert_eq!(sitemaps.len(), 1);
    assert_eq!(sitemaps[0]["sitemap_url"], children[0].as_str());
    assert_eq!(sitemaps[0]["page_count"], 2);
    assert_eq!(report["skipped"][0]["sitemap_url"], children[1].as_str());
    assert_eq!(report["total_failed"], 2);
}

#[tokio::test]
async fn test_grouped_audit_writes_markdown_report() {
    let mock_server = MockServer::start().await;
    mount_two_sitemaps(&mock_server).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("report.md");
    let mut options = options();
    options.format = OutputFormat::Markdown;
    options.output_file = Some(report_path.clone());

    let checker = Checker::new(FakeEngine::new(vec![
        FakeRun::Output(CLEAN_OUTPUT),
        FakeRun::Output(CLEAN_OUTPUT),
    ]));
    let status = audit(
        &resolver(),
        &checker,
        &format!("{}/sitemap_index.xml", mock_server.uri()),
        RunMode::Grouped,
        &options,
    )
    .await
    .expect("Audit failed");

    assert_eq!(status, AuditStatus::Clean);

    let markdown = std::fs::read_to_string(&report_path).expect("No report");
    assert!(markdown.starts_with("# Link Audit Report"));
    assert!(markdown.contains("/pages.xml"));
    assert!(markdown.contains("/posts.xml"));
}

#[tokio::test]
async fn test_unreachable_sitemap_fails_before_checking() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/sitemap.xml", 500).await;

    let checker = Checker::new(FakeEngine::new(vec![FakeRun::Output(FIXTURE)]));
    let result = audit(
        &resolver(),
        &checker,
        &format!("{}/sitemap.xml", mock_server.uri()),
        RunMode::Merged,
        &options(),
    )
    .await;

    assert!(matches!(
        result,
        Err(AuditError::Sitemap(SitemapError::Status { status: 500, .. }))
    ));
    assert!(checker.engine().seen_urls().is_empty());
}

#[tokio::test]
async fn test_empty_sitemap_skips_engine() {
    let mock_server = MockServer::start().await;
    mount_xml(&mock_server, "/sitemap.xml", urlset(&[])).await;

    let checker = Checker::new(FakeEngine::new(Vec::new()));
    let status = audit(
        &resolver(),
        &checker,
        &format!("{}/sitemap.xml", mock_server.uri()),
        RunMode::Merged,
        &options(),
    )
    .await
    .expect("Audit failed");

    assert_eq!(status, AuditStatus::Clean);
    assert!(checker.engine().seen_urls().is_empty());
}
