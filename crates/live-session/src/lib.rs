//! Now-playing detection from an open web-player tab
//!
//! There is no public API for the web player, so the track is read straight
//! out of the page markup. The crate is split into:
//! - [`dom`]: an object-safe view of a page document plus an in-memory page
//! - [`selectors`]: the player's selector fallbacks, kept as plain data
//! - [`extract`]: the in-page routines (pure functions over a document)
//! - [`host`]: what a privileged host (browser extension) must provide
//! - [`pattern`]: tab URL match patterns
//! - [`extractor`]: tab iteration and the `PlaybackSource` implementation

pub mod dom;
pub mod extract;
pub mod extractor;
pub mod host;
pub mod pattern;
pub mod selectors;

#[cfg(test)]
mod test_utils;

pub use dom::{DomError, MediaState, NodeId, PageDocument, StaticNode, StaticPage};
pub use extract::{extract_now_playing, run_control, ControlOutcome, ExtractionResult};
pub use extractor::LiveSessionExtractor;
pub use host::{InjectionResult, PageScript, ScriptTask, TabHandle, TabHost};
pub use pattern::{matches_url_pattern, PatternError, UrlPattern};
pub use selectors::{PlayerSelectors, YOUTUBE_MUSIC};
