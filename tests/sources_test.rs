//! Source registry and first-page URL construction

use serp_links::sources::{self, PreNavigation, SOURCES, SearchOperators};
use serp_links::ScrapeError;
use std::collections::HashSet;

fn query_pairs(url: &url::Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[test]
fn test_registry_ids_are_unique() {
    let ids: HashSet<&str> = SOURCES.iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), SOURCES.len());
    assert_eq!(sources::source_ids(), vec!["google", "bing", "yahoo"]);
}

#[test]
fn test_google_url_carries_page_size_and_filter() {
    let google = sources::lookup("google").unwrap();
    let ops = SearchOperators::site("example.com").with("filetype", "pdf");

    let url = google.start_url(&ops).unwrap();

    assert_eq!(url.host_str(), Some("www.google.com"));
    assert_eq!(url.path(), "/search");
    assert_eq!(
        query_pairs(&url),
        vec![
            ("num".to_string(), "100".to_string()),
            ("q".to_string(), "site:example.com filetype:pdf".to_string()),
            ("filter".to_string(), "0".to_string()),
        ]
    );
}

#[test]
fn test_bing_url_encodes_operator_query() {
    let bing = sources::lookup("bing").unwrap();
    let url = bing
        .start_url(&SearchOperators::site("example.com").with("filetype", "docx"))
        .unwrap();

    assert_eq!(
        url.as_str(),
        "https://www.bing.com/search?count=50&q=site%3Aexample.com+filetype%3Adocx"
    );
}

#[test]
fn test_yahoo_uses_p_parameter_and_consent_step() {
    let yahoo = sources::lookup("yahoo").unwrap();
    let url = yahoo.start_url(&SearchOperators::site("example.com")).unwrap();

    assert_eq!(
        query_pairs(&url),
        vec![
            ("pz".to_string(), "50".to_string()),
            ("p".to_string(), "site:example.com".to_string()),
        ]
    );
    assert_eq!(
        yahoo.pre_navigation,
        Some(PreNavigation::ClickThrough {
            url: "https://se.search.yahoo.com",
            selector: r#"button[name="agree"]"#,
        })
    );
}

#[test]
fn test_operator_values_are_escaped() {
    let bing = sources::lookup("bing").unwrap();
    let url = bing
        .start_url(&SearchOperators::site("example.com&count=1"))
        .unwrap();

    let pairs = query_pairs(&url);
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[1].1, "site:example.com&count=1");
}

#[test]
fn test_unknown_source_lists_supported_ids() {
    let err = sources::lookup("altavista").unwrap_err();
    match err {
        ScrapeError::Configuration(msg) => {
            assert!(msg.contains("altavista"));
            assert!(msg.contains("google, bing, yahoo"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_malformed_operators_rejected_before_url_is_built() {
    let google = sources::lookup("google").unwrap();
    let err = google
        .start_url(&SearchOperators::site("exa mple.com"))
        .unwrap_err();
    assert!(matches!(err, ScrapeError::Configuration(_)));
}

#[test]
fn test_every_source_has_selectors() {
    for source in SOURCES {
        assert!(!source.result_selector.trim().is_empty(), "{}", source.id);
        assert!(source.next_page_selector.is_some(), "{}", source.id);
        assert!(source.page_size > 0, "{}", source.id);
    }
}
