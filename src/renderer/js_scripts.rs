//! JavaScript evaluated inside result pages

/// Build the single-pass extraction script for a pair of selectors.
///
/// Selectors are embedded as JSON string literals, so quotes and
/// backslashes inside them cannot break out of the script. The script
/// returns `{ results: string[], next: string }`, matching
/// [`PageLinks`](super::PageLinks).
pub(super) fn links_script(result_selector: &str, next_page_selector: &str) -> String {
    let results = serde_json::Value::from(result_selector);
    let next = serde_json::Value::from(next_page_selector);
    format!(
        r#"
    (() => {{
        const nextSelector = {next};
        const nextElement = nextSelector ? document.querySelector(nextSelector) : null;
        return {{
            results: Array.from(document.querySelectorAll({results}))
                .map(a => a.href)
                .filter(href => typeof href === 'string' && href.length > 0),
            next: nextElement && typeof nextElement.href === 'string' ? nextElement.href : ''
        }};
    }})()
"#
    )
}

/// Build a script answering whether either selector matches yet.
///
/// Used to wait for results rendered after the load event. An empty next
/// selector is skipped.
pub(super) fn presence_script(result_selector: &str, next_page_selector: &str) -> String {
    let results = serde_json::Value::from(result_selector);
    let next = serde_json::Value::from(next_page_selector);
    format!(
        r#"
    (() => {{
        const nextSelector = {next};
        return document.querySelector({results}) !== null
            || (nextSelector !== '' && document.querySelector(nextSelector) !== null);
    }})()
"#
    )
}
