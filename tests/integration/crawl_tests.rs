//! Listing crawl against a mock `api.php`

use crate::common::{create_test_api, listing_xml};
use mediawiki_crawl::CrawlError;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_two_page_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("format", "xml"))
        .and(query_param("action", "query"))
        .and(query_param("list", "allimages"))
        .and(query_param("aifrom", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(
            &[
                ("A.png", "https://wiki.example.com/images/A.png"),
                ("B.png", "https://wiki.example.com/images/B.png"),
            ],
            Some("C1"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "C1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(
            &[("C.png", "https://wiki.example.com/images/C.png")],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 5);
    let mut crawler = api.all_images("0");

    let mut names = Vec::new();
    while let Some(image) = crawler.next_record().await.expect("Crawl failed") {
        names.push(image.name);
    }

    assert_eq!(names, vec!["A.png", "B.png", "C.png"]);
    assert_eq!(crawler.stats().pages_fetched, 2);
    assert_eq!(crawler.stats().delays_waited, 1);
    assert_eq!(crawler.stats().total_delay, Duration::from_millis(10));

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_user_agent_and_connection_close_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(header("user-agent", "TestBot/1.0"))
        .and(header("connection", "close"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(&[], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 5);
    let records = api.all_images("0").collect_all().await.expect("Crawl failed");

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_empty_cursor_triggers_second_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(&[], Some(""))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(
            &[("Z.png", "https://wiki.example.com/images/Z.png")],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 5);
    let records = api.all_images("0").collect_all().await.expect("Crawl failed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Z.png");
}

#[tokio::test]
async fn test_server_error_ends_listing_quietly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<api />"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 5);
    let mut crawler = api.all_images("0");

    let first = crawler.next_record().await.expect("Soft failure must not error");
    assert!(first.is_none());
    assert!(crawler.stats().ended_without_data);
}

#[tokio::test]
async fn test_timeout_ends_listing_quietly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_xml(&[], None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 1);
    let records = api.all_images("0").collect_all().await.expect("Timeout must not error");

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_malformed_page_stops_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(
            &[("A.png", "https://wiki.example.com/images/A.png")],
            Some("C1"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "C1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Database error</body>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Must never be reached
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "C2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(&[], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 5);
    let result = api.all_images("0").collect_all().await;

    match result {
        Err(CrawlError::MalformedResponse { url, .. }) => {
            assert!(url.contains("aifrom=C1"), "unexpected url {}", url);
        }
        other => panic!("expected a malformed response error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cursor_with_reserved_characters_round_trips() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_xml(&[], Some("R&amp;D=1 #2"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "R&D=1 #2"))
        .and(query_param("list", "allimages"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(
            &[("RD.png", "https://wiki.example.com/images/RD.png")],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 5);
    let records = api.all_images("0").collect_all().await.expect("Crawl failed");

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_page_lookups() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("titles", "Main Page"))
        .and(query_param("prop", "images"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<api><query><pages><page title="Main Page"><images>
                <im ns="6" title="File:Logo.png" />
                <im ns="6" title="File:Hall of Monuments background.jpg" />
            </images></page></pages></query></api>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("titles", "File:Logo.png"))
        .and(query_param("prop", "imageinfo"))
        .and(query_param("iiprop", "url"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<api><query><pages><page title="File:Logo.png"><imageinfo>
                <ii url="/images/Logo.png" descriptionurl="/wiki/File:Logo.png" />
            </imageinfo></page></pages></query></api>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = create_test_api(&mock_server.uri(), 5);

    let page = api.page("Main Page").await.expect("Page lookup failed");
    assert_eq!(
        page.image_titles,
        vec!["File:Logo.png", "File:Hall of Monuments background.jpg"]
    );

    let image = api
        .page_image(&page.image_titles[0])
        .await
        .expect("Image lookup failed")
        .expect("Image should exist");
    assert_eq!(image.name, "File:Logo.png");
    assert_eq!(
        image.asset_url.as_str(),
        format!("{}/images/Logo.png", mock_server.uri())
    );
}
