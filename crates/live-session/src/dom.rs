//! Page document abstraction
//!
//! The in-page routines only ever need a handful of DOM operations, so a
//! document is modelled as a trait over opaque node ids. A browser host backs
//! it with the real DOM; [`StaticPage`] backs it with a prepared snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Opaque handle to an element inside one document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Native time fields of a media element, in seconds
///
/// `duration` is NaN until metadata has loaded and infinite for live streams.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaState {
    pub paused: bool,
    pub duration: f64,
    pub current_time: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not a media element")]
    NotMedia(NodeId),

    #[error("{0}")]
    Script(String),
}

/// The DOM operations available to an in-page routine
pub trait PageDocument: Send + Sync {
    /// URL of the page (`window.location.href`)
    fn location(&self) -> Result<String, DomError>;

    /// First element matching `selector`, searching the whole document when
    /// `scope` is `None` and the subtree of `scope` otherwise
    fn query_selector(&self, scope: Option<NodeId>, selector: &str)
        -> Result<Option<NodeId>, DomError>;

    fn text_content(&self, node: NodeId) -> Result<Option<String>, DomError>;

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError>;

    fn media_state(&self, node: NodeId) -> Result<MediaState, DomError>;

    /// Dispatch a user click on the element
    fn click(&self, node: NodeId) -> Result<(), DomError>;
}

/// One element of a [`StaticPage`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticNode {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub media: Option<MediaState>,
}

impl StaticNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn media(state: MediaState) -> Self {
        Self {
            media: Some(state),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SelectorEntry {
    scope: Option<NodeId>,
    selector: String,
    node: NodeId,
}

/// In-memory document snapshot
///
/// Selectors are not evaluated; each node is registered under the exact
/// selector strings (and scope) that should find it. Clicks are recorded.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StaticPage {
    location: String,
    nodes: Vec<StaticNode>,
    selectors: Vec<SelectorEntry>,
    #[serde(skip)]
    clicks: Mutex<Vec<NodeId>>,
}

impl StaticPage {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    /// Add a node reachable through `selector` from `scope`
    pub fn add_node(&mut self, scope: Option<NodeId>, selector: &str, node: StaticNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.alias(scope, selector, id);
        id
    }

    /// Make an existing node reachable through another selector
    pub fn alias(&mut self, scope: Option<NodeId>, selector: &str, node: NodeId) {
        self.selectors.push(SelectorEntry {
            scope,
            selector: selector.to_string(),
            node,
        });
    }

    /// Nodes clicked so far, in order
    pub fn clicks(&self) -> Vec<NodeId> {
        self.clicks
            .lock()
            .map(|clicks| clicks.clone())
            .unwrap_or_default()
    }

    fn node(&self, id: NodeId) -> Result<&StaticNode, DomError> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(DomError::UnknownNode(id))
    }
}

impl PageDocument for StaticPage {
    fn location(&self) -> Result<String, DomError> {
        Ok(self.location.clone())
    }

    fn query_selector(
        &self,
        scope: Option<NodeId>,
        selector: &str,
    ) -> Result<Option<NodeId>, DomError> {
        if let Some(scope) = scope {
            self.node(scope)?;
        }

        Ok(self
            .selectors
            .iter()
            .find(|entry| entry.scope == scope && entry.selector == selector)
            .map(|entry| entry.node))
    }

    fn text_content(&self, node: NodeId) -> Result<Option<String>, DomError> {
        Ok(self.node(node)?.text.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.node(node)?.attributes.get(name).cloned())
    }

    fn media_state(&self, node: NodeId) -> Result<MediaState, DomError> {
        self.node(node)?.media.ok_or(DomError::NotMedia(node))
    }

    fn click(&self, node: NodeId) -> Result<(), DomError> {
        self.node(node)?;
        let mut clicks = self
            .clicks
            .lock()
            .map_err(|_| DomError::Script("click log poisoned".to_string()))?;
        clicks.push(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_lookup() {
        let mut page = StaticPage::new("https://music.youtube.com/");
        let bar = page.add_node(None, "ytmusic-player-bar", StaticNode::default());
        let title = page.add_node(Some(bar), ".title", StaticNode::text("Song"));

        assert_eq!(page.query_selector(None, "ytmusic-player-bar").unwrap(), Some(bar));
        assert_eq!(page.query_selector(Some(bar), ".title").unwrap(), Some(title));
        // scoped nodes are not visible from the document root
        assert_eq!(page.query_selector(None, ".title").unwrap(), None);
    }

    #[test]
    fn test_unknown_scope_is_an_error() {
        let page = StaticPage::new("about:blank");
        let err = page.query_selector(Some(NodeId(7)), ".title").unwrap_err();
        assert_eq!(err, DomError::UnknownNode(NodeId(7)));
    }

    #[test]
    fn test_media_state_requires_media_node() {
        let mut page = StaticPage::new("about:blank");
        let div = page.add_node(None, "div", StaticNode::text("hi"));
        assert_eq!(page.media_state(div).unwrap_err(), DomError::NotMedia(div));
    }

    #[test]
    fn test_clicks_are_recorded() {
        let mut page = StaticPage::new("about:blank");
        let button = page.add_node(None, "#play-pause-button", StaticNode::default());
        page.click(button).unwrap();
        page.click(button).unwrap();
        assert_eq!(page.clicks(), vec![button, button]);
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "location": "https://music.youtube.com/watch?v=abc",
            "nodes": [{"text": "Song"}],
            "selectors": [{"scope": null, "selector": ".title", "node": 0}]
        }"#;
        let page: StaticPage = serde_json::from_str(json).unwrap();
        let node = page.query_selector(None, ".title").unwrap().unwrap();
        assert_eq!(page.text_content(node).unwrap().as_deref(), Some("Song"));
    }
}
