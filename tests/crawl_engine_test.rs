//! Pagination engine behaviour against scripted result pages

use serp_links::sources::SourceDescriptor;
use serp_links::{ScrapeError, crawl};

mod common;
use common::{CONSENT_SOURCE, Event, ScriptedRenderer, TEST_SOURCE, set, url};

#[tokio::test]
async fn test_follows_next_links_until_last_page() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["https://a/1", "https://a/2"], "https://x/2")
        .page("https://x/2", &["https://a/3"], "https://x/3")
        .page("https://x/3", &["https://a/4"], "");

    let links = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();

    assert_eq!(
        links,
        set(&["https://a/1", "https://a/2", "https://a/3", "https://a/4"])
    );
    assert_eq!(
        renderer.navigations(),
        vec!["https://x/1", "https://x/2", "https://x/3"]
    );
}

#[tokio::test]
async fn test_repeated_page_converges_despite_next_link() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["a", "b"], "https://x/2")
        .page("https://x/2", &["a", "b"], "https://x/3")
        .page("https://x/3", &["c"], "");

    let links = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();

    assert_eq!(links, set(&["a", "b"]));
    assert_eq!(renderer.navigations(), vec!["https://x/1", "https://x/2"]);
}

#[tokio::test]
async fn test_circular_next_link_terminates() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["a"], "https://x/2")
        .page("https://x/2", &["b"], "https://x/1");

    let links = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();

    assert_eq!(links, set(&["a", "b"]));
    assert_eq!(
        renderer.navigations(),
        vec!["https://x/1", "https://x/2", "https://x/1"]
    );
}

#[tokio::test]
async fn test_broken_selector_stops_before_next_page() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &[], "https://x/2")
        .page("https://x/2", &["a"], "");

    let err = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap_err();

    match err {
        ScrapeError::BrokenSelector { url, selector } => {
            assert_eq!(url, "https://x/1");
            assert_eq!(selector, TEST_SOURCE.result_selector);
        }
        other => panic!("expected BrokenSelector, got {other:?}"),
    }
    assert_eq!(renderer.navigations(), vec!["https://x/1"]);
}

#[tokio::test]
async fn test_broken_selector_discards_earlier_pages() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["a"], "https://x/2")
        .page("https://x/2", &[], "https://x/3");

    let result = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None).await;

    assert!(matches!(result, Err(ScrapeError::BrokenSelector { .. })));
}

#[tokio::test]
async fn test_context_closed_after_broken_selector() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["a"], "https://x/2")
        .page("https://x/2", &[], "https://x/3");

    let result = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None).await;

    assert!(matches!(result, Err(ScrapeError::BrokenSelector { .. })));
    assert_eq!(renderer.opened(), 1);
    assert_eq!(renderer.closed(), 1);
}

#[tokio::test]
async fn test_failed_pre_navigation_closes_context_without_rendering() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["a"], "")
        .fail("https://search.test/consent");

    let err = crawl(&renderer, &CONSENT_SOURCE, url("https://x/1"), None)
        .await
        .unwrap_err();

    match err {
        ScrapeError::Navigation { url, .. } => assert_eq!(url, "https://search.test/consent"),
        other => panic!("expected Navigation, got {other:?}"),
    }
    assert!(renderer.navigations().is_empty());
    assert_eq!(renderer.opened(), 1);
    assert_eq!(renderer.closed(), 1);
    assert!(matches!(renderer.events().last(), Some(Event::Close(_))));
}

#[tokio::test]
async fn test_page_limit_one_renders_exactly_one_page() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["a"], "https://x/2")
        .page("https://x/2", &["b"], "");

    let links = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), Some(1))
        .await
        .unwrap();

    assert_eq!(links, set(&["a"]));
    assert_eq!(renderer.navigations(), vec!["https://x/1"]);
}

#[tokio::test]
async fn test_page_without_results_or_next_link_returns_empty_set() {
    let renderer = ScriptedRenderer::new();

    let links = crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();

    assert!(links.is_empty());
}

#[tokio::test]
async fn test_context_closed_after_success_and_failure() {
    let renderer = ScriptedRenderer::new()
        .page("https://ok/1", &["a"], "")
        .fail("https://broken/1");

    crawl(&renderer, &TEST_SOURCE, url("https://ok/1"), None)
        .await
        .unwrap();
    let err = crawl(&renderer, &TEST_SOURCE, url("https://broken/1"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Navigation { .. }));
    assert_eq!(renderer.opened(), 2);
    assert_eq!(renderer.closed(), 2);
}

#[tokio::test]
async fn test_each_crawl_gets_its_own_context() {
    let renderer = ScriptedRenderer::new().page("https://x/1", &["a"], "");

    crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();
    crawl(&renderer, &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();

    let events = renderer.events();
    assert_eq!(events.first(), Some(&Event::Open(1)));
    assert!(events.contains(&Event::Close(1)));
    assert!(events.contains(&Event::Open(2)));
    assert_eq!(events.last(), Some(&Event::Close(2)));
}

#[tokio::test]
async fn test_pre_navigation_runs_once_before_first_page() {
    let renderer = ScriptedRenderer::new()
        .page("https://x/1", &["a"], "https://x/2")
        .page("https://x/2", &["b"], "");

    crawl(&renderer, &CONSENT_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();

    let events = renderer.events();
    assert_eq!(
        &events[..3],
        &[
            Event::Open(1),
            Event::ClickThrough(1, "https://search.test/consent".to_string()),
            Event::Navigate(1, "https://x/1".to_string()),
        ]
    );
    let click_throughs = events
        .iter()
        .filter(|e| matches!(e, Event::ClickThrough(..)))
        .count();
    assert_eq!(click_throughs, 1);
}

#[tokio::test]
async fn test_empty_result_selector_fails_before_navigation() {
    let mut descriptor: SourceDescriptor = TEST_SOURCE;
    descriptor.result_selector = "  ";
    let renderer = ScriptedRenderer::new().page("https://x/1", &["a"], "");

    let err = crawl(&renderer, &descriptor, url("https://x/1"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Configuration(_)));
    assert_eq!(renderer.opened(), 0);
}

#[tokio::test]
async fn test_same_pages_give_same_result() {
    let script = || {
        ScriptedRenderer::new()
            .page("https://x/1", &["c", "a", "b"], "https://x/2")
            .page("https://x/2", &["b", "d"], "")
    };

    let first = crawl(&script(), &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();
    let second = crawl(&script(), &TEST_SOURCE, url("https://x/1"), None)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, set(&["a", "b", "c", "d"]));
}
