//! Test helpers: prepared player pages and an in-memory tab host

use crate::dom::{DomError, MediaState, NodeId, PageDocument, StaticNode, StaticPage};
use crate::host::{InjectionResult, PageScript, TabHandle, TabHost};
use crate::pattern::matches_url_pattern;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A YouTube Music page with a fully populated player bar
pub fn player_page(
    title: &str,
    byline: &str,
    duration: f64,
    current_time: f64,
    paused: bool,
) -> StaticPage {
    let mut page = StaticPage::new("https://music.youtube.com/watch?v=UBS4Gi1y_nc");
    let bar = page.add_node(None, "ytmusic-player-bar", StaticNode::default());

    let title = page.add_node(Some(bar), ".title.ytmusic-player-bar", StaticNode::text(title));
    page.alias(Some(bar), ".title", title);
    let byline = page.add_node(Some(bar), ".byline.ytmusic-player-bar", StaticNode::text(byline));
    page.alias(Some(bar), ".byline", byline);

    page.add_node(
        Some(bar),
        "img.image",
        StaticNode::default().with_attribute("src", "https://lh3.googleusercontent.com/art=w60-h60"),
    );
    page.add_node(Some(bar), "#play-pause-button", StaticNode::default());
    page.add_node(Some(bar), ".next-button", StaticNode::default());
    page.add_node(Some(bar), ".previous-button", StaticNode::default());

    page.add_node(
        None,
        "video",
        StaticNode::media(MediaState {
            paused,
            duration,
            current_time,
        }),
    );

    page
}

/// A document whose every access fails, like a page torn down mid-script
pub struct FailingDocument {
    message: String,
}

impl FailingDocument {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn fail<T>(&self) -> Result<T, DomError> {
        Err(DomError::Script(self.message.clone()))
    }
}

impl PageDocument for FailingDocument {
    fn location(&self) -> Result<String, DomError> {
        self.fail()
    }

    fn query_selector(&self, _: Option<NodeId>, _: &str) -> Result<Option<NodeId>, DomError> {
        self.fail()
    }

    fn text_content(&self, _: NodeId) -> Result<Option<String>, DomError> {
        self.fail()
    }

    fn attribute(&self, _: NodeId, _: &str) -> Result<Option<String>, DomError> {
        self.fail()
    }

    fn media_state(&self, _: NodeId) -> Result<MediaState, DomError> {
        self.fail()
    }

    fn click(&self, _: NodeId) -> Result<(), DomError> {
        self.fail()
    }
}

enum TabContent {
    Page(Arc<StaticPage>),
    Document(Box<dyn PageDocument>),
    /// Script returns this value verbatim
    Raw(serde_json::Value),
    /// Host refuses to inject (e.g. a chrome:// page or a discarded tab)
    Inaccessible,
}

struct FakeTab {
    handle: TabHandle,
    content: TabContent,
}

/// In-memory stand-in for a browser extension host
#[derive(Default)]
pub struct FakeTabHost {
    tabs: Mutex<Vec<FakeTab>>,
    executions: AtomicUsize,
    fail_queries: AtomicBool,
}

impl FakeTabHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, url: &str, content: TabContent) -> i64 {
        let mut tabs = self.tabs.lock().unwrap();
        let id = tabs.len() as i64 + 100;
        tabs.push(FakeTab {
            handle: TabHandle {
                id,
                url: Some(url.to_string()),
            },
            content,
        });
        id
    }

    pub fn add_page(&self, url: &str, page: StaticPage) -> i64 {
        self.push(url, TabContent::Page(Arc::new(page)))
    }

    pub fn add_document(&self, url: &str, doc: impl PageDocument + 'static) -> i64 {
        self.push(url, TabContent::Document(Box::new(doc)))
    }

    pub fn add_raw(&self, url: &str, value: serde_json::Value) -> i64 {
        self.push(url, TabContent::Raw(value))
    }

    pub fn add_inaccessible(&self, url: &str) -> i64 {
        self.push(url, TabContent::Inaccessible)
    }

    pub fn fail_tab_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    /// Number of scripts injected so far
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn clicks(&self, tab_id: i64) -> Vec<NodeId> {
        let tabs = self.tabs.lock().unwrap();
        tabs.iter()
            .find(|tab| tab.handle.id == tab_id)
            .and_then(|tab| match &tab.content {
                TabContent::Page(page) => Some(page.clicks()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TabHost for FakeTabHost {
    async fn query_tabs(&self, url_pattern: &str) -> Result<Vec<TabHandle>> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(anyhow!("tabs permission missing"));
        }

        let tabs = self.tabs.lock().unwrap();
        Ok(tabs
            .iter()
            .filter(|tab| {
                tab.handle
                    .url
                    .as_deref()
                    .is_some_and(|url| matches_url_pattern(url_pattern, url))
            })
            .map(|tab| tab.handle.clone())
            .collect())
    }

    async fn execute_in_tab(&self, tab: &TabHandle, script: PageScript) -> Result<Vec<InjectionResult>> {
        self.executions.fetch_add(1, Ordering::SeqCst);

        let tabs = self.tabs.lock().unwrap();
        let target = tabs
            .iter()
            .find(|t| t.handle.id == tab.id)
            .ok_or_else(|| anyhow!("no tab with id {}", tab.id))?;

        let result = match &target.content {
            TabContent::Page(page) => script.run(page.as_ref()),
            TabContent::Document(doc) => script.run(doc.as_ref()),
            TabContent::Raw(value) => value.clone(),
            TabContent::Inaccessible => {
                return Err(anyhow!("Cannot access contents of the page"));
            }
        };

        Ok(vec![InjectionResult { result }])
    }
}
