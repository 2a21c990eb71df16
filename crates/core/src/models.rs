use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Point-in-time description of the active track and transport state
///
/// Built fresh on every poll and never mutated afterwards. Sources may
/// report `progress_ms` past `duration_ms` for a moment around track changes,
/// so consumers should not assume the ordering holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTrack {
    pub is_playing: bool,
    pub track_name: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub album_art_url: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub progress_ms: u64,
    /// Deep link to the track or player page
    #[serde(default)]
    pub source_url: String,
}

impl NormalizedTrack {
    /// Playback position as a fraction of the track, clamped to [0, 1]
    pub fn progress_fraction(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.progress_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    /// "Artist - Title" label used in logs and the CLI
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.artist, self.track_name)
    }
}

/// Music services the dashboard knows how to read from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Spotify,
    #[serde(rename = "youtubemusic")]
    YoutubeMusic,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Spotify => "spotify",
            ServiceKind::YoutubeMusic => "youtubemusic",
        }
    }
}

/// Error type for unknown service identifiers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseServiceError(pub String);

impl std::fmt::Display for ParseServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown music service '{}'", self.0)
    }
}

impl std::error::Error for ParseServiceError {}

impl FromStr for ServiceKind {
    type Err = ParseServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spotify" => Ok(ServiceKind::Spotify),
            "youtubemusic" => Ok(ServiceKind::YoutubeMusic),
            _ => Err(ParseServiceError(s.to_string())),
        }
    }
}

/// Transport command sent to a playback source
///
/// Serialized lowercase; the session source passes this string into the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Play,
    Pause,
    Next,
    Previous,
}

impl ControlAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAction::Play => "play",
            ControlAction::Pause => "pause",
            ControlAction::Next => "next",
            ControlAction::Previous => "previous",
        }
    }
}

impl std::fmt::Display for ControlAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential sentinel selecting how the live-session source reaches the player.
/// Both modes currently go through tab inspection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionMode {
    #[default]
    Extension,
    MediaSession,
}

impl SessionMode {
    /// Interpret a credential string. Empty means the default mode; anything
    /// that is not a known sentinel yields `None`.
    pub fn from_credential(credential: Option<&str>) -> Option<Self> {
        match credential.map(str::trim) {
            None | Some("") => Some(SessionMode::default()),
            Some("extension") => Some(SessionMode::Extension),
            Some("media-session") => Some(SessionMode::MediaSession),
            Some(_) => None,
        }
    }
}
