//! Spotify Web API playback source
//!
//! Reads the "currently playing" endpoint with a caller-supplied bearer token
//! and maps the response onto [`NormalizedTrack`](startpage_core::NormalizedTrack).
//! Token acquisition is left to the caller.

mod client;
mod models;

pub use client::{RemotePlaybackClient, RemoteSource, DEFAULT_API_BASE};
pub use models::*;
