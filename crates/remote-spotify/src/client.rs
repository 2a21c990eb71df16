use crate::models::CurrentlyPlaying;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use startpage_core::{ControlAction, NormalizedTrack, PlaybackError, PlaybackSource};

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// Spotify Web API client
///
/// Stateless apart from the HTTP connection pool; the bearer token is passed
/// on every call so the caller can refresh it between polls.
///
/// Endpoints:
/// - GET  /me/player/currently-playing
/// - PUT  /me/player/play, /me/player/pause
/// - POST /me/player/next, /me/player/previous
#[derive(Clone, Debug)]
pub struct RemotePlaybackClient {
    client: Client,
    base_url: String,
}

impl Default for RemotePlaybackClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RemotePlaybackClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Point the client at a different API root (e.g. a local test server)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str, credential: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Spotify API call: {} {}", method, url);
        self.client.request(method, url).bearer_auth(credential)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, PlaybackError> {
        request
            .send()
            .await
            .map_err(|e| PlaybackError::remote(None, e.to_string()))
    }

    /// Get the currently playing track
    ///
    /// 204 (no active device) and 404 (no player) mean nothing is playing.
    /// Any other non-success status, or a body without a track object, is an error.
    pub async fn query_now_playing(
        &self,
        credential: &str,
    ) -> Result<Option<NormalizedTrack>, PlaybackError> {
        let request = self.request(Method::GET, "/me/player/currently-playing", credential);
        let response = self.send(request).await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            tracing::debug!("Spotify reports nothing playing (status {})", status);
            return Ok(None);
        }

        if !status.is_success() {
            tracing::warn!("Spotify API returned status: {}", status);
            return Err(error_for_status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PlaybackError::remote(Some(status.as_u16()), e.to_string()))?;

        let playing: CurrentlyPlaying = serde_json::from_str(&body).map_err(|e| {
            PlaybackError::remote(
                Some(status.as_u16()),
                format!("failed to parse currently-playing response: {}", e),
            )
        })?;

        let track = playing.into_track().ok_or_else(|| {
            PlaybackError::remote(Some(status.as_u16()), "response has no track item")
        })?;

        tracing::debug!(
            "Spotify now playing: {} (playing={})",
            track.display_label(),
            track.is_playing
        );
        Ok(Some(track))
    }

    pub async fn play(&self, credential: &str) -> Result<(), PlaybackError> {
        self.control(ControlAction::Play, credential).await
    }

    pub async fn pause(&self, credential: &str) -> Result<(), PlaybackError> {
        self.control(ControlAction::Pause, credential).await
    }

    pub async fn next(&self, credential: &str) -> Result<(), PlaybackError> {
        self.control(ControlAction::Next, credential).await
    }

    pub async fn previous(&self, credential: &str) -> Result<(), PlaybackError> {
        self.control(ControlAction::Previous, credential).await
    }

    /// Send a transport command. No retry; the caller decides what to do on failure.
    pub async fn control(
        &self,
        action: ControlAction,
        credential: &str,
    ) -> Result<(), PlaybackError> {
        let (method, path) = match action {
            ControlAction::Play => (Method::PUT, "/me/player/play"),
            ControlAction::Pause => (Method::PUT, "/me/player/pause"),
            ControlAction::Next => (Method::POST, "/me/player/next"),
            ControlAction::Previous => (Method::POST, "/me/player/previous"),
        };

        let response = self.send(self.request(method, path, credential)).await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!("Spotify {} returned status: {}", action, status);
            return Err(error_for_status(status));
        }

        tracing::info!("Spotify: {} sent", action);
        Ok(())
    }
}

fn error_for_status(status: StatusCode) -> PlaybackError {
    PlaybackError::remote(
        Some(status.as_u16()),
        status.canonical_reason().unwrap_or("unexpected status"),
    )
}

/// A [`RemotePlaybackClient`] bound to one credential
pub struct RemoteSource {
    client: RemotePlaybackClient,
    credential: String,
}

impl RemoteSource {
    pub fn new(client: RemotePlaybackClient, credential: impl Into<String>) -> Self {
        Self {
            client,
            credential: credential.into(),
        }
    }
}

#[async_trait]
impl PlaybackSource for RemoteSource {
    fn name(&self) -> &str {
        "spotify"
    }

    async fn now_playing(&self) -> Result<Option<NormalizedTrack>, PlaybackError> {
        self.client.query_now_playing(&self.credential).await
    }

    async fn control(&self, action: ControlAction) -> Result<(), PlaybackError> {
        self.client.control(action, &self.credential).await
    }
}
