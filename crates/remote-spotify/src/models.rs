use serde::{Deserialize, Serialize};
use startpage_core::NormalizedTrack;

/// Response from GET /me/player/currently-playing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    /// Absent or null while an ad or an unsupported item is playing
    #[serde(default)]
    pub item: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyTrack {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: SpotifyAlbum,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpotifyImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

impl CurrentlyPlaying {
    /// Map onto the normalized model; `None` when the payload has no track object
    pub fn into_track(self) -> Option<NormalizedTrack> {
        let item = self.item?;

        let artist = item
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        // Spotify lists artwork largest first
        let album_art_url = item
            .album
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .unwrap_or_default();

        Some(NormalizedTrack {
            is_playing: self.is_playing,
            track_name: item.name,
            artist,
            album: item.album.name,
            album_art_url,
            duration_ms: item.duration_ms,
            progress_ms: self.progress_ms.unwrap_or(0),
            source_url: item.external_urls.spotify.unwrap_or_default(),
        })
    }
}
