//! Test utilities shared by the serp_links integration tests
//!
//! `ScriptedRenderer` serves canned pages keyed by URL and records every
//! call made against it, so tests can assert what the engine rendered, in
//! which order, and that every context was closed.

use serp_links::{PageLinks, PreNavigation, RenderContext, Renderer, ScrapeError, ScrapeResult};
use serp_links::sources::SourceDescriptor;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use url::Url;

/// A call observed by the scripted renderer
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Event {
    Open(usize),
    ClickThrough(usize, String),
    Navigate(usize, String),
    Extract(usize, String),
    Close(usize),
}

#[derive(Default)]
pub struct ScriptedRenderer {
    pages: HashMap<String, PageLinks>,
    failing: HashSet<String>,
    events: Mutex<Vec<Event>>,
    next_id: Mutex<usize>,
}

#[allow(dead_code)]
impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `results` and `next` when `url` is rendered
    pub fn page(mut self, url: &str, results: &[&str], next: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            PageLinks {
                results: results.iter().map(|s| (*s).to_string()).collect(),
                next: next.to_string(),
            },
        );
        self
    }

    /// Fail navigation to `url`, or a click-through step opening `url`
    pub fn fail(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("events lock").clone()
    }

    /// URLs navigated to, in order, across all contexts
    pub fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Navigate(_, url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn opened(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Open(_)))
            .count()
    }

    pub fn closed(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Close(_)))
            .count()
    }

    fn record(&self, event: Event) {
        self.events.lock().expect("events lock").push(event);
    }
}

pub struct ScriptedContext<'a> {
    id: usize,
    renderer: &'a ScriptedRenderer,
    current: Option<String>,
}

impl Renderer for ScriptedRenderer {
    type Context<'a> = ScriptedContext<'a>;

    async fn new_isolated_context(&self) -> ScrapeResult<ScriptedContext<'_>> {
        let id = {
            let mut next_id = self.next_id.lock().expect("id lock");
            *next_id += 1;
            *next_id
        };
        self.record(Event::Open(id));
        Ok(ScriptedContext {
            id,
            renderer: self,
            current: None,
        })
    }
}

impl RenderContext for ScriptedContext<'_> {
    async fn navigate(&mut self, url: &Url) -> ScrapeResult<()> {
        self.renderer
            .record(Event::Navigate(self.id, url.to_string()));
        if self.renderer.failing.contains(url.as_str()) {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn extract(
        &mut self,
        _result_selector: &str,
        _next_page_selector: &str,
    ) -> ScrapeResult<PageLinks> {
        let url = self.current.clone().unwrap_or_default();
        self.renderer.record(Event::Extract(self.id, url.clone()));
        Ok(self.renderer.pages.get(&url).cloned().unwrap_or_default())
    }

    async fn click_through(&mut self, url: &str, selector: &str) -> ScrapeResult<()> {
        self.renderer
            .record(Event::ClickThrough(self.id, url.to_string()));
        if self.renderer.failing.contains(url) {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                message: format!("Element '{selector}' not found"),
            });
        }
        Ok(())
    }

    async fn close(self) -> ScrapeResult<()> {
        self.renderer.record(Event::Close(self.id));
        Ok(())
    }
}

fn test_search_url(page_size: u32, query: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse("https://search.test/search")?;
    url.query_pairs_mut()
        .append_pair("n", &page_size.to_string())
        .append_pair("q", query);
    Ok(url)
}

/// A source with no pre-navigation step
#[allow(dead_code)]
pub static TEST_SOURCE: SourceDescriptor = SourceDescriptor {
    id: "test",
    result_selector: "a.result",
    next_page_selector: Some("a.next"),
    page_size: 10,
    build_url: test_search_url,
    pre_navigation: None,
};

/// A source behind a consent wall
#[allow(dead_code)]
pub static CONSENT_SOURCE: SourceDescriptor = SourceDescriptor {
    id: "consent",
    result_selector: "a.result",
    next_page_selector: Some("a.next"),
    page_size: 10,
    build_url: test_search_url,
    pre_navigation: Some(PreNavigation::ClickThrough {
        url: "https://search.test/consent",
        selector: "button.agree",
    }),
};

#[allow(dead_code)]
pub fn url(s: &str) -> Url {
    Url::parse(s).expect("valid test url")
}

#[allow(dead_code)]
pub fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
