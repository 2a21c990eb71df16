//! Routines that run inside the player page
//!
//! Both entry points catch every [`DomError`] and turn it into a value, so a
//! changed page layout can never take the host down with it.

use crate::dom::{DomError, NodeId, PageDocument};
use crate::selectors::PlayerSelectors;
use serde::{Deserialize, Serialize};
use startpage_core::{ControlAction, NormalizedTrack};

/// Outcome of one extraction attempt against one tab
///
/// Crosses the page/host boundary as JSON, tagged by `outcome`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionResult {
    Track { track: NormalizedTrack },
    NoPlayerFound,
    /// The player is open but has no title loaded
    NoTrackPlaying,
    ExtractionError { message: String },
}

/// Outcome of a transport-control script
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ControlOutcome {
    Clicked,
    NoPlayerFound,
    NoControl,
    Failed { message: String },
}

/// Read the current track out of a player page
pub fn extract_now_playing(doc: &dyn PageDocument, selectors: &PlayerSelectors) -> ExtractionResult {
    match try_extract(doc, selectors) {
        Ok(result) => result,
        Err(e) => ExtractionResult::ExtractionError {
            message: e.to_string(),
        },
    }
}

fn try_extract(
    doc: &dyn PageDocument,
    selectors: &PlayerSelectors,
) -> Result<ExtractionResult, DomError> {
    let Some(player) = doc.query_selector(None, selectors.player_bar)? else {
        return Ok(ExtractionResult::NoPlayerFound);
    };

    let media = match doc.query_selector(None, selectors.media)? {
        Some(node) => Some(doc.media_state(node)?),
        None => None,
    };
    let is_playing = media.is_some_and(|m| !m.paused);

    let title = first_text(doc, player, selectors.title)?.unwrap_or_default();
    if title.is_empty() {
        return Ok(ExtractionResult::NoTrackPlaying);
    }

    let byline = first_text(doc, player, selectors.byline)?.unwrap_or_default();
    let (artist, album) = split_byline(&byline, selectors);

    let album_art_url = resolve_artwork(doc, player, selectors.artwork)?;

    let (duration_ms, progress_ms) = media
        .map(|m| (seconds_to_ms(m.duration), seconds_to_ms(m.current_time)))
        .unwrap_or((0, 0));

    Ok(ExtractionResult::Track {
        track: NormalizedTrack {
            is_playing,
            track_name: title,
            artist,
            album,
            album_art_url,
            duration_ms,
            progress_ms,
            source_url: doc.location()?,
        },
    })
}

/// Trimmed text of the first element found by any of `candidates`
fn first_text(
    doc: &dyn PageDocument,
    scope: NodeId,
    candidates: &[&str],
) -> Result<Option<String>, DomError> {
    for selector in candidates {
        if let Some(node) = doc.query_selector(Some(scope), selector)? {
            return Ok(doc.text_content(node)?.map(|text| text.trim().to_string()));
        }
    }
    Ok(None)
}

/// Split "Artist • Album • Year" into (artist, album)
pub fn split_byline(byline: &str, selectors: &PlayerSelectors) -> (String, String) {
    let mut parts = byline
        .split(selectors.byline_separator)
        .map(str::trim);

    let artist = match parts.next() {
        Some(artist) if !artist.is_empty() => artist.to_string(),
        _ => selectors.unknown_artist.to_string(),
    };
    let album = parts.next().unwrap_or_default().to_string();

    (artist, album)
}

fn resolve_artwork(
    doc: &dyn PageDocument,
    scope: NodeId,
    candidates: &[&str],
) -> Result<String, DomError> {
    for selector in candidates {
        let Some(node) = doc.query_selector(Some(scope), selector)? else {
            continue;
        };

        if let Some(src) = doc.attribute(node, "src")?.filter(|s| !s.trim().is_empty()) {
            return Ok(src.trim().to_string());
        }

        if let Some(url) = doc
            .attribute(node, "srcset")?
            .as_deref()
            .and_then(first_srcset_url)
        {
            return Ok(url);
        }
    }
    Ok(String::new())
}

/// First URL of a responsive image candidate list ("a.jpg 1x, b.jpg 2x")
pub fn first_srcset_url(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
}

/// Media element seconds to whole milliseconds; NaN, infinite and negative become 0
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

/// Click the player control for `action`
///
/// Play and pause share the toggle button. A missing player or button is a no-op.
pub fn run_control(
    doc: &dyn PageDocument,
    selectors: &PlayerSelectors,
    action: ControlAction,
) -> ControlOutcome {
    try_control(doc, selectors, action).unwrap_or_else(|e| ControlOutcome::Failed {
        message: e.to_string(),
    })
}

fn try_control(
    doc: &dyn PageDocument,
    selectors: &PlayerSelectors,
    action: ControlAction,
) -> Result<ControlOutcome, DomError> {
    let Some(player) = doc.query_selector(None, selectors.player_bar)? else {
        return Ok(ControlOutcome::NoPlayerFound);
    };

    let selector = match action {
        ControlAction::Play | ControlAction::Pause => selectors.play_pause,
        ControlAction::Next => selectors.next,
        ControlAction::Previous => selectors.previous,
    };

    match doc.query_selector(Some(player), selector)? {
        Some(button) => {
            doc.click(button)?;
            Ok(ControlOutcome::Clicked)
        }
        None => Ok(ControlOutcome::NoControl),
    }
}
