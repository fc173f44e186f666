//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_trawler::config::CrawlerConfig;
use link_trawler::state::LinkStatus;
use link_trawler::url::DomainPolicy;
use link_trawler::Crawler;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Generous upper bound for any single crawl in these tests
const CRAWL_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates a crawler allowed to visit the mock server's host
fn create_crawler(server: &MockServer, max_concurrency: usize) -> Crawler {
    let host = url::Url::parse(&server.uri())
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    let config = CrawlerConfig {
        max_concurrency,
        request_timeout_secs: 5,
        ..CrawlerConfig::default()
    };

    Crawler::new(&config, DomainPolicy::new([host])).expect("Failed to create crawler")
}

async fn run(crawler: &Crawler, seed: &str) {
    tokio::time::timeout(CRAWL_TIMEOUT, crawler.crawl(seed))
        .await
        .expect("Crawl did not terminate");
}

fn respond_with(content_type: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), content_type)
}

fn html(body: &str) -> ResponseTemplate {
    respond_with("text/html", body)
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn sorted_urls(crawler: &Crawler) -> Vec<String> {
    crawler
        .registry()
        .snapshot()
        .into_iter()
        .map(|link| link.url)
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The root page must be fetched exactly once even though /page1 links back
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html>
                <body>
                    <a href="/page1">Page 1</a>
                    <a href="/page2">Page 2</a>
                    <img src="/image.jpg" />
                </body>
            </html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/page1",
        html(
            r#"<html>
                <body>
                    <a href="/">Home</a>
                    <a href="/page3">Page 3</a>
                </body>
            </html>"#,
        ),
    )
    .await;
    mount_page(&mock_server, "/page2", html("<html><body>Page 2</body></html>")).await;
    mount_page(&mock_server, "/page3", html("<html><body>Page 3</body></html>")).await;

    // Leaf resources are recorded, never fetched
    Mock::given(method("GET"))
        .and(path("/image.jpg"))
        .respond_with(respond_with("image/jpeg", "jpeg"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    let mut expected = vec![
        format!("{}/", base_url),
        format!("{}/image.jpg", base_url),
        format!("{}/page1", base_url),
        format!("{}/page2", base_url),
        format!("{}/page3", base_url),
    ];
    expected.sort();
    assert_eq!(sorted_urls(&crawler), expected);

    let registry = crawler.registry();
    assert_eq!(
        registry.get(&format!("{}/image.jpg", base_url)).unwrap().status,
        LinkStatus::Leaf
    );
    for page in ["/", "/page1", "/page2", "/page3"] {
        let link = registry.get(&format!("{}{}", base_url, page)).unwrap();
        assert_eq!(link.status, LinkStatus::Fetched, "{} not fetched", page);
        assert_eq!(link.content_type.as_deref(), Some("text/html"));
    }

    let stats = crawler.statistics();
    assert_eq!(stats.total_links, 5);
    assert_eq!(stats.fetched, 4);
    assert_eq!(stats.leaves, 1);
    assert_eq!(stats.pending, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redirect_handling() {
    for status in [301u16, 302, 308] {
        let mock_server = MockServer::start().await;
        let base_url = mock_server.uri();

        mount_page(
            &mock_server,
            "/a",
            ResponseTemplate::new(status).insert_header("Location", "/x"),
        )
        .await;
        mount_page(&mock_server, "/x", html("<html><body>Landed</body></html>")).await;

        let crawler = create_crawler(&mock_server, 5);
        run(&crawler, &format!("{}/a", base_url)).await;

        let source = crawler
            .registry()
            .get(&format!("{}/a", base_url))
            .expect("Redirecting URL not recorded");
        assert_eq!(
            source.redirect_target(),
            Some(format!("{}/x", base_url).as_str()),
            "status {}",
            status
        );

        let target = crawler
            .registry()
            .get(&format!("{}/x", base_url))
            .expect("Redirect target not followed");
        assert_eq!(target.status, LinkStatus::Fetched);
        assert_eq!(crawler.registry().len(), 2);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redirect_to_root_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/redirect",
        ResponseTemplate::new(301).insert_header("Location", "/"),
    )
    .await;
    mount_page(&mock_server, "/", html(r#"<a href="/page1">Page 1</a>"#)).await;
    mount_page(&mock_server, "/page1", html("<p>Page 1</p>")).await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/redirect", base_url)).await;

    assert!(crawler.registry().contains(&format!("{}/", base_url)));
    assert!(crawler.registry().contains(&format!("{}/page1", base_url)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redirect_to_disallowed_host_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/go",
        ResponseTemplate::new(302).insert_header("Location", "http://elsewhere.invalid/landing"),
    )
    .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/go", base_url)).await;

    let source = crawler.registry().get(&format!("{}/go", base_url)).unwrap();
    assert_eq!(
        source.redirect_target(),
        Some("http://elsewhere.invalid/landing")
    );
    assert_eq!(crawler.registry().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/error",
        ResponseTemplate::new(500).set_body_raw(
            br#"<a href="/never-followed">link</a>"#.to_vec(),
            "text/html",
        ),
    )
    .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/error", base_url)).await;

    assert_eq!(crawler.registry().len(), 1);
    let link = crawler
        .registry()
        .get(&format!("{}/error", base_url))
        .expect("Error link not discovered");
    assert_eq!(link.error_message(), Some("500 status code"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_missing_page_recorded_as_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // /missing is not mounted, so wiremock answers 404
    mount_page(&mock_server, "/", html(r#"<a href="/missing">gone</a>"#)).await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    let missing = crawler
        .registry()
        .get(&format!("{}/missing", base_url))
        .unwrap();
    assert_eq!(missing.error_message(), Some("404 status code"));
    assert_eq!(crawler.statistics().errored, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cycle_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/b">B</a><a href="/a#self">A</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<a href="/a">A</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_crawler(&mock_server, 2);
    run(&crawler, &format!("{}/a", base_url)).await;

    assert_eq!(
        sorted_urls(&crawler),
        vec![format!("{}/a", base_url), format!("{}/b", base_url)]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_javascript_body_links_are_traversed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(r#"<html><head><script src="/app.js"></script></head></html>"#),
    )
    .await;
    mount_page(
        &mock_server,
        "/app.js",
        respond_with(
            "text/javascript",
            &format!(r#"fetch("{}/y").then(render);"#, base_url),
        ),
    )
    .await;
    mount_page(&mock_server, "/y", html("<p>from script</p>")).await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    let y = crawler
        .registry()
        .get(&format!("{}/y", base_url))
        .expect("URL inside script body not discovered");
    assert_eq!(y.status, LinkStatus::Fetched);

    let script = crawler
        .registry()
        .get(&format!("{}/app.js", base_url))
        .unwrap();
    assert_eq!(script.content_type.as_deref(), Some("text/javascript"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bare_url_in_html_not_traversed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(&format!("<p>Plain text mention of {}/y</p>", base_url)),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/y"))
        .respond_with(html("<p>should not be fetched</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    assert_eq!(sorted_urls(&crawler), vec![format!("{}/", base_url)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_meta_refresh_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(r#"<html><head><meta http-equiv="refresh" content="0; url=/landing"></head></html>"#),
    )
    .await;
    mount_page(&mock_server, "/landing", html("<p>Landing</p>")).await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    let landing = crawler
        .registry()
        .get(&format!("{}/landing", base_url))
        .expect("Meta refresh target not discovered");
    assert_eq!(landing.status, LinkStatus::Fetched);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_external_links_are_not_admitted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(
            r#"<a href="http://external.invalid/page">External</a>
               <img src="http://external.invalid/logo.png">
               <form action="/search"></form>"#,
        ),
    )
    .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    assert_eq!(
        sorted_urls(&crawler),
        vec![format!("{}/", base_url), format!("{}/search", base_url)]
    );
    assert_eq!(
        crawler
            .registry()
            .get(&format!("{}/search", base_url))
            .unwrap()
            .status,
        LinkStatus::Leaf
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_binary_body_not_extracted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/blob",
        ResponseTemplate::new(200).set_body_raw(
            b"\x00\x01<a href=\"/hidden\">x</a>\x00".to_vec(),
            "application/octet-stream",
        ),
    )
    .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/blob", base_url)).await;

    assert_eq!(crawler.registry().len(), 1);
    let blob = crawler
        .registry()
        .get(&format!("{}/blob", base_url))
        .unwrap();
    assert_eq!(blob.status, LinkStatus::Fetched);
    assert_eq!(blob.content_type.as_deref(), Some("application/octet-stream"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_html_with_nul_bytes_still_extracted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html("<a href=\"/page1\">one</a>\u{0}<a href=\"/page2\">two</a>"),
    )
    .await;
    mount_page(&mock_server, "/page1", html("<p>one</p>")).await;
    mount_page(&mock_server, "/page2", html("<p>two</p>")).await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    assert_eq!(
        sorted_urls(&crawler),
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redirect_without_location_recorded_as_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/moved", ResponseTemplate::new(302)).await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/moved", base_url)).await;

    assert_eq!(crawler.registry().len(), 1);
    let moved = crawler
        .registry()
        .get(&format!("{}/moved", base_url))
        .unwrap();
    assert_eq!(
        moved.error_message(),
        Some("302 redirect without a Location header")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unresolvable_redirect_location_recorded_as_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/broken",
        ResponseTemplate::new(301).insert_header("Location", "http://[::1"),
    )
    .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/broken", base_url)).await;

    assert_eq!(crawler.registry().len(), 1);
    let broken = crawler
        .registry()
        .get(&format!("{}/broken", base_url))
        .unwrap();
    assert_eq!(
        broken.error_message(),
        Some("Invalid redirect location (http://[::1)")
    );
    assert_eq!(broken.redirect_target(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_transport_failure_recorded_on_entry() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same host as the mock server, so the link passes the domain policy, but
    // nothing listens on the discard port
    mount_page(
        &mock_server,
        "/",
        html(r#"<a href="http://127.0.0.1:9/closed">unreachable</a>"#),
    )
    .await;

    let crawler = create_crawler(&mock_server, 5);
    run(&crawler, &format!("{}/", base_url)).await;

    let closed = crawler
        .registry()
        .get("http://127.0.0.1:9/closed")
        .expect("Unreachable link not admitted");
    let message = closed.error_message().expect("Transport failure not recorded");
    assert!(
        message.contains("error sending request"),
        "Unexpected message: {}",
        message
    );

    let root = crawler.registry().get(&format!("{}/", base_url)).unwrap();
    assert_eq!(root.status, LinkStatus::Fetched);
    assert_eq!(crawler.statistics().errored, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_bound() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let page_count = 20;

    let index: String = (0..page_count)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", html(&index)).await;

    for i in 0..page_count {
        mount_page(
            &mock_server,
            &format!("/p{}", i),
            html("<p>slow page</p>").set_delay(Duration::from_millis(100)),
        )
        .await;
    }

    let crawler = create_crawler(&mock_server, 3);
    run(&crawler, &format!("{}/", base_url)).await;

    assert_eq!(crawler.registry().len(), page_count + 1);
    assert_eq!(crawler.statistics().fetched, page_count + 1);

    let peak = crawler.peak_concurrency();
    assert!(peak <= 3, "Concurrency bound exceeded: {}", peak);
    assert!(peak >= 2, "Pages were never fetched in parallel: {}", peak);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Many pages all pointing at the same target, discovered concurrently
    let index: String = (0..10)
        .map(|i| format!(r#"<a href="/hub{}">hub</a>"#, i))
        .collect();
    mount_page(&mock_server, "/", html(&index)).await;
    for i in 0..10 {
        mount_page(
            &mock_server,
            &format!("/hub{}", i),
            html(r#"<a href="/shared">shared</a><a href="/shared#again">again</a>"#),
        )
        .await;
    }
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html("<p>shared</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_crawler(&mock_server, 8);
    run(&crawler, &format!("{}/", base_url)).await;

    assert_eq!(crawler.registry().len(), 12);
    assert!(crawler.registry().contains(&format!("{}/shared", base_url)));
}
