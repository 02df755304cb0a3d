//! Sitemap resolver tests against a mock HTTP server

use crate::common::{mount_status, mount_xml, sitemap_index, urls, urlset};
use linkaudit::config::SitemapConfig;
use linkaudit::sitemap::{SitemapResolver, XmlError};
use linkaudit::SitemapError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> SitemapResolver {
    SitemapResolver::new(&SitemapConfig::default()).expect("Failed to build resolver")
}

#[tokio::test]
async fn test_leaf_sitemap_dedupes_flat_list() {
    let mock_server = MockServer::start().await;
    let pages = urls(&mock_server, &["/a", "/b", "/a"]);
    mount_xml(&mock_server, "/sitemap.xml", urlset(&pages)).await;

    let sitemap_url = format!("{}/sitemap.xml", mock_server.uri());
    let result = resolver()
        .resolve(&sitemap_url)
        .await
        .expect("Resolve failed");

    assert_eq!(result.all_urls, urls(&mock_server, &["/a", "/b"]));
    assert_eq!(result.sitemaps.len(), 1);
    assert_eq!(result.sitemaps[0].sitemap_url, sitemap_url);
    // The group keeps the document as written
    assert_eq!(result.sitemaps[0].urls, pages);
    assert!(result.skipped.is_empty());
}

#[tokio::test]
async fn test_empty_leaf_sitemap() {
    let mock_server = MockServer::start().await;
    mount_xml(&mock_server, "/sitemap.xml", urlset(&[])).await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", mock_server.uri()))
        .await
        .expect("Resolve failed");

    assert!(result.is_empty());
    assert_eq!(result.sitemaps.len(), 1);
    assert!(result.sitemaps[0].urls.is_empty());
}

#[tokio::test]
async fn test_index_skips_failing_children() {
    let mock_server = MockServer::start().await;
    let children = urls(
        &mock_server,
        &["/pages.xml", "/missing.xml", "/broken.xml", "/posts.xml"],
    );
    mount_xml(&mock_server, "/sitemap_index.xml", sitemap_index(&children)).await;
    mount_xml(
        &mock_server,
        "/pages.xml",
        urlset(&urls(&mock_server, &["/", "/about"])),
    )
    .await;
    mount_status(&mock_server, "/missing.xml", 404).await;
    mount_xml(
        &mock_server,
        "/broken.xml",
        "<urlset><url><loc>/x</url></urlset>".to_string(),
    )
    .await;
    mount_xml(
        &mock_server,
        "/posts.xml",
        urlset(&urls(&mock_server, &["/blog/1", "/about", "/blog/2"])),
    )
    .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap_index.xml", mock_server.uri()))
        .await
        .expect("Resolve failed");

    assert_eq!(
        result.all_urls,
        urls(&mock_server, &["/", "/about", "/blog/1", "/blog/2"])
    );

    assert_eq!(result.sitemaps.len(), 2);
    assert_eq!(result.sitemaps[0].sitemap_url, children[0]);
    assert_eq!(result.sitemaps[1].sitemap_url, children[3]);
    // Duplicates across groups stay in the grouped view
    assert_eq!(result.sitemaps[1].urls.len(), 3);

    let skipped: Vec<&str> = result
        .skipped
        .iter()
        .map(|s| s.sitemap_url.as_str())
        .collect();
    assert_eq!(skipped, vec![children[1].as_str(), children[2].as_str()]);
    assert!(result.skipped[0].reason.contains("404"));
}

#[tokio::test]
async fn test_index_with_no_valid_children_is_empty() {
    let mock_server = MockServer::start().await;
    let children = urls(&mock_server, &["/gone.xml", "/error.xml"]);
    mount_xml(&mock_server, "/sitemap_index.xml", sitemap_index(&children)).await;
    mount_status(&mock_server, "/gone.xml", 410).await;
    mount_status(&mock_server, "/error.xml", 500).await;

    let result = resolver()
        .resolve(&format!("{}/sitemap_index.xml", mock_server.uri()))
        .await
        .expect("An index with failing children should still resolve");

    assert!(result.is_empty());
    assert!(result.sitemaps.is_empty());
    assert_eq!(result.skipped.len(), 2);
}

#[tokio::test]
async fn test_nested_index_is_not_followed() {
    let mock_server = MockServer::start().await;
    let children = urls(&mock_server, &["/nested_index.xml", "/pages.xml"]);
    mount_xml(&mock_server, "/sitemap_index.xml", sitemap_index(&children)).await;
    mount_xml(
        &mock_server,
        "/nested_index.xml",
        sitemap_index(&urls(&mock_server, &["/deep.xml"])),
    )
    .await;
    mount_xml(
        &mock_server,
        "/pages.xml",
        urlset(&urls(&mock_server, &["/a"])),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/deep.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap_index.xml", mock_server.uri()))
        .await
        .expect("Resolve failed");

    assert_eq!(result.all_urls, urls(&mock_server, &["/a"]));
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].sitemap_url, children[0]);
}

#[tokio::test]
async fn test_repeated_index_entries_are_fetched_once() {
    let mock_server = MockServer::start().await;
    let child = format!("{}/pages.xml", mock_server.uri());
    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&[child.clone(), child.clone()]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(urlset(&urls(&mock_server, &["/a"]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap_index.xml", mock_server.uri()))
        .await
        .expect("Resolve failed");

    assert_eq!(result.sitemaps.len(), 1);
    assert_eq!(result.all_urls.len(), 1);
}

#[tokio::test]
async fn test_top_level_status_error() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/sitemap.xml", 404).await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", mock_server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(SitemapError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_top_level_malformed_xml() {
    let mock_server = MockServer::start().await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        "<urlset><url><loc>/a</loc></url>".to_string(),
    )
    .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(SitemapError::Parse { .. })));
}

#[tokio::test]
async fn test_top_level_html_page() {
    let mock_server = MockServer::start().await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        "<html><head><title>Sitemap</title></head><body></body></html>".to_string(),
    )
    .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", mock_server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(SitemapError::Parse {
            source: XmlError::UnexpectedRoot { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn test_xml_accept_header_is_sent() {
    let mock_server = MockServer::start().await;
    // Only requests asking for XML get the sitemap; anything else gets HTML
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&urls(&mock_server, &["/a"])),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .with_priority(10)
        .mount(&mock_server)
        .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", mock_server.uri()))
        .await
        .expect("Resolve failed");

    assert_eq!(result.all_urls.len(), 1);
}

#[tokio::test]
async fn test_unreachable_host() {
    let result = resolver()
        .resolve("http://127.0.0.1:1/sitemap.xml")
        .await;

    assert!(matches!(result, Err(SitemapError::Http { .. })));
}

#[tokio::test]
async fn test_invalid_sitemap_url() {
    let result = resolver().resolve("not a url").await;
    assert!(matches!(result, Err(SitemapError::InvalidUrl { .. })));
}
