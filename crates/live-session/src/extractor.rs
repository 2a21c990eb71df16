use crate::extract::{ControlOutcome, ExtractionResult};
use crate::host::{InjectionResult, PageScript, TabHandle, TabHost};
use crate::selectors::{PlayerSelectors, YOUTUBE_MUSIC};
use async_trait::async_trait;
use startpage_core::{ControlAction, NormalizedTrack, PlaybackError, PlaybackSource, SessionMode};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const YOUTUBE_MUSIC_TABS: &str = "*://music.youtube.com/*";

/// Playback source backed by an already-open web-player tab
///
/// Queries try every matching tab in discovery order and return the first
/// successful extraction. Transport controls only ever touch the first tab.
pub struct LiveSessionExtractor {
    host: Arc<dyn TabHost>,
    /// Both modes read the player through tab inspection
    mode: SessionMode,
    url_pattern: String,
    selectors: &'static PlayerSelectors,
}

impl LiveSessionExtractor {
    /// Extractor for the YouTube Music web player
    pub fn new(host: Arc<dyn TabHost>, mode: SessionMode) -> Self {
        Self::for_player(host, mode, YOUTUBE_MUSIC_TABS, &YOUTUBE_MUSIC)
    }

    pub fn for_player(
        host: Arc<dyn TabHost>,
        mode: SessionMode,
        url_pattern: impl Into<String>,
        selectors: &'static PlayerSelectors,
    ) -> Self {
        Self {
            host,
            mode,
            url_pattern: url_pattern.into(),
            selectors,
        }
    }

    async fn find_tabs(&self) -> Result<Vec<TabHandle>, PlaybackError> {
        self.host
            .query_tabs(&self.url_pattern)
            .await
            .map_err(|e| PlaybackError::SourceUnavailable(format!("tab query failed: {:#}", e)))
    }

    pub async fn query_now_playing(&self) -> Result<Option<NormalizedTrack>, PlaybackError> {
        let tabs = self.find_tabs().await?;

        if tabs.is_empty() {
            debug!("No player tabs open matching {}", self.url_pattern);
            return Ok(None);
        }

        debug!("Found {} player tab(s) ({:?} mode)", tabs.len(), self.mode);

        // One tab at a time so the first success is deterministic
        for tab in &tabs {
            match self.extract_from_tab(tab).await {
                Ok(track) => {
                    debug!(
                        "Tab {}: extracted {} (playing={})",
                        tab.id,
                        track.display_label(),
                        track.is_playing
                    );
                    return Ok(Some(track));
                }
                Err(e) => debug!("Tab {}: {}", tab.id, e),
            }
        }

        debug!("No active playback found in any player tab");
        Ok(None)
    }

    async fn extract_from_tab(&self, tab: &TabHandle) -> Result<NormalizedTrack, PlaybackError> {
        let results = self
            .host
            .execute_in_tab(tab, PageScript::extract(self.selectors))
            .await
            .map_err(|e| PlaybackError::Extraction(format!("failed to access tab: {:#}", e)))?;

        match decode_first::<ExtractionResult>(results)? {
            ExtractionResult::Track { track } if !track.track_name.is_empty() => Ok(track),
            ExtractionResult::Track { .. } | ExtractionResult::NoTrackPlaying => {
                Err(PlaybackError::NoActiveSession)
            }
            ExtractionResult::NoPlayerFound => {
                Err(PlaybackError::Extraction("player bar not found".to_string()))
            }
            ExtractionResult::ExtractionError { message } => Err(PlaybackError::Extraction(message)),
        }
    }

    pub async fn play(&self) -> Result<(), PlaybackError> {
        self.send_control(ControlAction::Play).await
    }

    pub async fn pause(&self) -> Result<(), PlaybackError> {
        self.send_control(ControlAction::Pause).await
    }

    pub async fn next(&self) -> Result<(), PlaybackError> {
        self.send_control(ControlAction::Next).await
    }

    pub async fn previous(&self) -> Result<(), PlaybackError> {
        self.send_control(ControlAction::Previous).await
    }

    /// Click the control in the first matching tab; a missing player or button is a no-op
    pub async fn send_control(&self, action: ControlAction) -> Result<(), PlaybackError> {
        let tabs = self.find_tabs().await?;

        let Some(tab) = tabs.first() else {
            info!("No player tabs open, ignoring {}", action);
            return Ok(());
        };

        let results = self
            .host
            .execute_in_tab(tab, PageScript::control(self.selectors, action))
            .await
            .map_err(|e| PlaybackError::Extraction(format!("failed to access tab: {:#}", e)))?;

        match decode_first::<ControlOutcome>(results)? {
            ControlOutcome::Clicked => info!("Tab {}: {} control executed", tab.id, action),
            ControlOutcome::NoPlayerFound | ControlOutcome::NoControl => {
                debug!("Tab {}: no {} control on page", tab.id, action)
            }
            ControlOutcome::Failed { message } => {
                warn!("Tab {}: {} control failed: {}", tab.id, action, message);
                return Err(PlaybackError::Extraction(message));
            }
        }

        Ok(())
    }
}

/// Decode the top frame's result
fn decode_first<T: serde::de::DeserializeOwned>(
    results: Vec<InjectionResult>,
) -> Result<T, PlaybackError> {
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| PlaybackError::Extraction("script returned no result".to_string()))?;

    serde_json::from_value(first.result)
        .map_err(|e| PlaybackError::Extraction(format!("unexpected script result: {}", e)))
}

#[async_trait]
impl PlaybackSource for LiveSessionExtractor {
    fn name(&self) -> &str {
        "youtubemusic"
    }

    async fn now_playing(&self) -> Result<Option<NormalizedTrack>, PlaybackError> {
        self.query_now_playing().await
    }

    async fn control(&self, action: ControlAction) -> Result<(), PlaybackError> {
        self.send_control(action).await
    }
}
