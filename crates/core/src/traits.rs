use crate::error::PlaybackError;
use crate::models::{ControlAction, NormalizedTrack};
use async_trait::async_trait;

/// A place the dashboard can read the current track from and send transport
/// commands to (a hosted music API, a live browser tab, ...)
#[async_trait]
pub trait PlaybackSource: Send + Sync {
    /// Short identifier used in log lines
    fn name(&self) -> &str;

    /// Current track, or `None` when nothing is playing
    async fn now_playing(&self) -> Result<Option<NormalizedTrack>, PlaybackError>;

    /// Send a transport command
    async fn control(&self, action: ControlAction) -> Result<(), PlaybackError>;

    async fn play(&self) -> Result<(), PlaybackError> {
        self.control(ControlAction::Play).await
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.control(ControlAction::Pause).await
    }

    async fn next(&self) -> Result<(), PlaybackError> {
        self.control(ControlAction::Next).await
    }

    async fn previous(&self) -> Result<(), PlaybackError> {
        self.control(ControlAction::Previous).await
    }
}
