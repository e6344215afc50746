//! URL builders for the supported search engines.
//!
//! Each builder encodes the page-size hint under the parameter name the
//! engine understands and passes the operator query through
//! `application/x-www-form-urlencoded` encoding.

use url::Url;

pub(super) fn google(page_size: u32, query: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse("https://www.google.com/search")?;
    url.query_pairs_mut()
        .append_pair("num", &page_size.to_string())
        .append_pair("q", query)
        // Disable the "omitted similar results" collapsing
        .append_pair("filter", "0");
    Ok(url)
}

pub(super) fn bing(page_size: u32, query: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse("https://www.bing.com/search")?;
    url.query_pairs_mut()
        .append_pair("count", &page_size.to_string())
        .append_pair("q", query);
    Ok(url)
}

pub(super) fn yahoo(page_size: u32, query: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse("https://se.search.yahoo.com/search")?;
    url.query_pairs_mut()
        .append_pair("pz", &page_size.to_string())
        .append_pair("p", query);
    Ok(url)
}
