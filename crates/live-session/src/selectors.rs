/// Where a web player keeps its now-playing state in the DOM
///
/// Lists are tried in order; the first selector that finds an element wins.
/// The player markup is not a public contract, so fallbacks go from the most
/// specific class combination to the loosest one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSelectors {
    /// Root of the player bar; searched from the document
    pub player_bar: &'static str,
    /// Media element carrying transport state; searched from the document
    pub media: &'static str,
    /// Searched inside the player bar
    pub title: &'static [&'static str],
    pub byline: &'static [&'static str],
    pub artwork: &'static [&'static str],
    pub play_pause: &'static str,
    pub next: &'static str,
    pub previous: &'static str,
    /// Separates artist and album in the byline
    pub byline_separator: char,
    /// Used when the byline has no artist part
    pub unknown_artist: &'static str,
}

pub const YOUTUBE_MUSIC: PlayerSelectors = PlayerSelectors {
    player_bar: "ytmusic-player-bar",
    media: "video",
    title: &[".title.ytmusic-player-bar", ".title"],
    byline: &[".byline.ytmusic-player-bar", ".byline"],
    artwork: &["img.image", "#img", "yt-img-shadow img"],
    play_pause: "#play-pause-button",
    next: ".next-button",
    previous: ".previous-button",
    byline_separator: '•',
    unknown_artist: "Unknown Artist",
};
