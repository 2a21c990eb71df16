//! Single entry point for the now-playing widget
//!
//! [`NowPlaying`] picks a playback source once, from an explicit service id and
//! credential, and then exposes one query/control contract for all of them.
//! Nothing it returns is an error: every failure is logged and turned into
//! "nothing playing" (queries) or a no-op (controls).

use startpage_core::{
    ControlAction, NormalizedTrack, PlaybackSource, ServiceKind, SessionMode, Settings,
};
use startpage_live_session::{LiveSessionExtractor, TabHost};
use startpage_remote_spotify::{RemotePlaybackClient, RemoteSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

enum SourceSlot {
    Ready(Box<dyn PlaybackSource>),
    /// Known service that cannot run in this environment
    Unavailable(String),
    /// Service id nobody recognises
    Unsupported,
}

pub struct NowPlaying {
    service: String,
    slot: SourceSlot,
}

impl NowPlaying {
    /// Select a source for `service`
    ///
    /// `credential` is the bearer token for remote services and an optional
    /// mode sentinel ("extension", "media-session") for the live-session source.
    /// `host` is the privileged tab host, when running inside one.
    pub fn new(
        service: &str,
        credential: Option<&str>,
        host: Option<Arc<dyn TabHost>>,
    ) -> Self {
        let slot = match service.parse::<ServiceKind>() {
            Ok(ServiceKind::Spotify) => match credential.map(str::trim).filter(|c| !c.is_empty()) {
                Some(token) => SourceSlot::Ready(Box::new(RemoteSource::new(
                    RemotePlaybackClient::new(),
                    token,
                ))),
                None => SourceSlot::Unavailable("no access token configured".to_string()),
            },
            Ok(ServiceKind::YoutubeMusic) => match (host, SessionMode::from_credential(credential)) {
                (Some(host), Some(mode)) => {
                    SourceSlot::Ready(Box::new(LiveSessionExtractor::new(host, mode)))
                }
                (None, _) => SourceSlot::Unavailable("not running in an extension context".to_string()),
                (Some(_), None) => SourceSlot::Unavailable(
                    "credential must be \"extension\" or \"media-session\"".to_string(),
                ),
            },
            Err(_) => SourceSlot::Unsupported,
        };

        match &slot {
            SourceSlot::Ready(source) => info!("Now playing: using {} source", source.name()),
            SourceSlot::Unavailable(reason) => info!("Now playing: {} unavailable: {}", service, reason),
            SourceSlot::Unsupported => warn!("Now playing: unsupported service '{}'", service),
        }

        Self {
            service: service.to_string(),
            slot,
        }
    }

    /// Build from the music fields of a settings value
    pub fn from_settings(settings: &Settings, host: Option<Arc<dyn TabHost>>) -> Self {
        Self::new(&settings.music_service, Some(&settings.music_token), host)
    }

    /// Wrap an already constructed source
    pub fn with_source(service: impl Into<String>, source: Box<dyn PlaybackSource>) -> Self {
        Self {
            service: service.into(),
            slot: SourceSlot::Ready(source),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Whether a source was selected and can be queried
    pub fn is_available(&self) -> bool {
        matches!(self.slot, SourceSlot::Ready(_))
    }

    /// Current track, or `None` for nothing playing, an unknown service, or any failure
    pub async fn get_now_playing(&self) -> Option<NormalizedTrack> {
        let source = match &self.slot {
            SourceSlot::Ready(source) => source,
            SourceSlot::Unavailable(reason) => {
                debug!("{}: source unavailable: {}", self.service, reason);
                return None;
            }
            SourceSlot::Unsupported => return None,
        };

        match source.now_playing().await {
            Ok(track) => track,
            Err(e) => {
                warn!("Failed to fetch {} now playing: {}", source.name(), e);
                None
            }
        }
    }

    pub async fn play(&self) {
        self.dispatch(ControlAction::Play).await
    }

    pub async fn pause(&self) {
        self.dispatch(ControlAction::Pause).await
    }

    pub async fn next(&self) {
        self.dispatch(ControlAction::Next).await
    }

    pub async fn previous(&self) {
        self.dispatch(ControlAction::Previous).await
    }

    /// Best-effort transport control; failures are only logged
    pub async fn dispatch(&self, action: ControlAction) {
        let SourceSlot::Ready(source) = &self.slot else {
            debug!("{}: ignoring {}, no source", self.service, action);
            return;
        };

        if let Err(e) = source.control(action).await {
            warn!("Failed to {} on {}: {}", action, source.name(), e);
        }
    }
}
