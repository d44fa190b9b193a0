// ABOUTME: Integration tests for the header decorator's nav fetch against a mock server.
// ABOUTME: Covers successful decoration, non-success statuses, timeouts and missing blocks.

use std::time::Duration;

use blogport_decorate::{ErrorCode, HeaderDecorator, NavEvent};
use dom_query::Document;
use httpmock::prelude::*;

const NAV: &str = r#"<div><p><a href="/">Blog</a></p></div>
<div><h2>Topics</h2><ol><li>Hiring<ol><li><a href="/hiring">All</a></li></ol></li><li>Culture</li></ol></div>
<div><p><a href="/demo">Demo</a></p></div>"#;

fn page() -> Document {
    Document::from(r#"<html><body><header class="header-wrapper"><div class="header"></div></header></body></html>"#)
}

fn decorator(server: &MockServer) -> HeaderDecorator {
    HeaderDecorator::new(
        HeaderDecorator::builder()
            .site_origin(server.base_url())
            .timeout(Duration::from_millis(300))
            .build(),
    )
    .unwrap()
}

#[tokio::test]
async fn decorates_fetched_nav() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/nav.plain.html");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(NAV);
    });

    let doc = page();
    let mut menu = decorator(&server).decorate(&doc, ".header").await.unwrap();
    mock.assert();

    assert_eq!(menu.groups(), &["Topics"]);
    assert_eq!(menu.item_count(), 2);
    assert!(doc.select(".header .nav-hamburger").exists());
    assert!(!doc.select(".header ol").exists());

    menu.dispatch(&doc, NavEvent::Item(0));
    menu.dispatch(&doc, NavEvent::Item(1));
    let expanded: Vec<String> = doc
        .select(r#".header li[aria-expanded="true"]"#)
        .nodes()
        .iter()
        .map(|n| n.text().trim().to_string())
        .collect();
    assert_eq!(expanded, vec!["Culture"]);
}

#[tokio::test]
async fn non_success_status_fails_decoration() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nav.plain.html");
        then.status(404).body("not found");
    });

    let doc = page();
    let err = decorator(&server).decorate(&doc, ".header").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Fetch);
    assert!(err.to_string().contains("404"));
    // Nothing was attached.
    assert!(!doc.select(".header .nav").exists());
}

#[tokio::test]
async fn slow_nav_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nav.plain.html");
        then.status(200).body(NAV).delay(Duration::from_secs(2));
    });

    let doc = page();
    let err = decorator(&server).decorate(&doc, ".header").await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err}");
}

#[tokio::test]
async fn custom_nav_path_is_used() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/fragments/nav.html");
        then.status(200).body(NAV);
    });

    let decorator = HeaderDecorator::new(
        HeaderDecorator::builder()
            .site_origin(server.base_url())
            .nav_path("/fragments/nav.html")
            .build(),
    )
    .unwrap();
    let html = decorator.fetch_nav().await.unwrap();
    mock.assert();
    assert!(html.contains("Topics"));
}

#[tokio::test]
async fn missing_block_reports_selector() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/nav.plain.html");
        then.status(200).body(NAV);
    });

    let doc = page();
    let err = decorator(&server).decorate(&doc, ".nope").await.unwrap_err();
    assert!(err.is_missing_block());
    assert_eq!(err.target, ".nope");
}
