//! End-to-end download runs against a mock wiki

use crate::common::{create_test_api, listing_xml};
use mediawiki_crawl::download::{download_all, DownloadSummary};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_download_all_writes_assets() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let one_url = format!("{}/images/One.png", base_url);
    let missing_url = format!("{}/images/Missing.png", base_url);
    let two_url = format!("{}/images/Two.jpg", base_url);

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(
            &[
                ("One.png", one_url.as_str()),
                ("Missing.png", missing_url.as_str()),
            ],
            Some("T"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("aifrom", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(
            &[("Two.jpg", two_url.as_str())],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/One.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/Missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/Two.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF; 10]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output_dir = dir.path().join("images");

    let api = create_test_api(&base_url, 5);
    let mut crawler = api.all_images("0");
    let mut summary = DownloadSummary::default();
    download_all(&mut crawler, api.transport().as_ref(), &output_dir, &mut summary)
        .await
        .expect("Download run failed");

    assert_eq!(summary.records_seen, 3);
    assert_eq!(summary.files_written, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.bytes_written, 14);

    assert_eq!(
        std::fs::read(output_dir.join("One.png")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
    assert_eq!(std::fs::read(output_dir.join("Two.jpg")).unwrap().len(), 10);
    assert!(!output_dir.join("Missing.png").exists());
}

#[tokio::test]
async fn test_download_stops_on_malformed_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not xml at all"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let api = create_test_api(&mock_server.uri(), 5);
    let mut crawler = api.all_images("0");

    let mut summary = DownloadSummary::default();
    let result =
        download_all(&mut crawler, api.transport().as_ref(), dir.path(), &mut summary).await;

    assert!(result.expect_err("Expected an error").is_malformed());
    assert_eq!(summary, DownloadSummary::default());
}
