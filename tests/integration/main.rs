//! Integration tests for MediaWiki-Crawl
//!
//! These tests use wiremock to stand in for a wiki's `api.php` and its
//! image host, and drive the real HTTP transport end-to-end.

mod common;
mod crawl_tests;
mod download_tests;
