use thiserror::Error;

/// Failure kinds a playback source can report
///
/// Every variant is absorbed into "nothing playing" by the facade; the
/// distinction only matters for logging and for callers using a source directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("no active playback session")]
    NoActiveSession,

    #[error("playback source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("remote service error ({}): {reason}", .status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string()))]
    RemoteService { status: Option<u16>, reason: String },
}

impl PlaybackError {
    pub fn remote(status: Option<u16>, reason: impl Into<String>) -> Self {
        PlaybackError::RemoteService {
            status,
            reason: reason.into(),
        }
    }
}
