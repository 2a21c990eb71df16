//! Interface to the privileged host that can see browser tabs

use crate::dom::PageDocument;
use crate::extract::{extract_now_playing, run_control, ExtractionResult};
use crate::selectors::PlayerSelectors;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use startpage_core::ControlAction;

/// A browser tab as reported by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabHandle {
    pub id: i64,
    #[serde(default)]
    pub url: Option<String>,
}

/// One frame's return value from an injected script
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InjectionResult {
    #[serde(default)]
    pub result: serde_json::Value,
}

/// What an injected script should do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptTask {
    ExtractNowPlaying,
    /// The action travels into the page as its string form
    Control(ControlAction),
}

/// A routine to run synchronously inside a tab's page context
///
/// Hosts call [`PageScript::run`] against the tab's document and hand back
/// the returned JSON value inside an [`InjectionResult`].
#[derive(Clone, Copy, Debug)]
pub struct PageScript {
    task: ScriptTask,
    selectors: &'static PlayerSelectors,
}

impl PageScript {
    pub fn extract(selectors: &'static PlayerSelectors) -> Self {
        Self {
            task: ScriptTask::ExtractNowPlaying,
            selectors,
        }
    }

    pub fn control(selectors: &'static PlayerSelectors, action: ControlAction) -> Self {
        Self {
            task: ScriptTask::Control(action),
            selectors,
        }
    }

    pub fn run(&self, doc: &dyn PageDocument) -> serde_json::Value {
        let value = match self.task {
            ScriptTask::ExtractNowPlaying => {
                serde_json::to_value(extract_now_playing(doc, self.selectors))
            }
            ScriptTask::Control(action) => {
                serde_json::to_value(run_control(doc, self.selectors, action))
            }
        };

        value.unwrap_or_else(|e| {
            serde_json::to_value(ExtractionResult::ExtractionError {
                message: e.to_string(),
            })
            .unwrap_or(serde_json::Value::Null)
        })
    }
}

/// Capabilities the live-session source needs from its environment
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Open tabs whose URL matches a match pattern such as `*://music.youtube.com/*`
    async fn query_tabs(&self, url_pattern: &str) -> Result<Vec<TabHandle>>;

    /// Run `script` inside the tab and collect one result per frame
    async fn execute_in_tab(&self, tab: &TabHandle, script: PageScript) -> Result<Vec<InjectionResult>>;
}
