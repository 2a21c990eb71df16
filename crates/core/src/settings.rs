use serde::{Deserialize, Serialize};

/// Dashboard preferences document
///
/// Stored as one JSON blob. The container-level `#[serde(default)]` means a
/// stored partial document is merged over the defaults on load, so new fields
/// pick up their default values without a migration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub time_format: String, // "12hr" or "24hr"
    pub todoist_api_token: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temp_unit: String,  // "fahrenheit" or "celsius"
    pub speed_unit: String, // "mph" or "kmh"
    pub links_per_column: u32,
    pub link_target: String,
    pub banner: String,
    pub show_banner: bool,
    pub banner_text: String,
    pub banner_text_blur: bool,
    pub show_greeting: bool,
    pub greeting_name: String,
    pub show_github: bool,
    pub github_username: String,
    pub github_token: String,
    pub show_music: bool,
    /// Service identifier handed to the now-playing facade ("spotify", "youtubemusic")
    pub music_service: String,
    /// Bearer token for remote services, or a session sentinel ("extension")
    pub music_token: String,
    pub links: Vec<QuickLink>,
}

/// A quick link shown on the start page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub title: String,
    pub url: String,
}

impl QuickLink {
    fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_format: "12hr".to_string(),
            todoist_api_token: String::new(),
            latitude: None,
            longitude: None,
            temp_unit: "fahrenheit".to_string(),
            speed_unit: "mph".to_string(),
            links_per_column: 4,
            link_target: "_self".to_string(),
            banner: "cbg-1.gif".to_string(),
            show_banner: true,
            banner_text: String::new(),
            banner_text_blur: true,
            show_greeting: true,
            greeting_name: "Raj".to_string(),
            show_github: true,
            github_username: String::new(),
            github_token: String::new(),
            show_music: true,
            music_service: "spotify".to_string(),
            music_token: String::new(),
            links: default_links(),
        }
    }
}

fn default_links() -> Vec<QuickLink> {
    vec![
        QuickLink::new("gmail", "https://mail.google.com"),
        QuickLink::new("calendar", "https://calendar.google.com"),
        QuickLink::new("drive", "https://drive.google.com"),
        QuickLink::new("docs", "https://docs.google.com"),
        QuickLink::new("github", "https://github.com"),
        QuickLink::new("slack", "https://slack.com"),
        QuickLink::new("keep", "https://keep.google.com"),
        QuickLink::new("leetcode", "https://leetcode.com/problemset"),
        QuickLink::new("perplexity", "https://perplexity.ai"),
        QuickLink::new("claude", "https://claude.ai"),
        QuickLink::new("aistudio", "https://aistudio.google.com"),
        QuickLink::new("chatgpt", "https://chat.openai.com"),
        QuickLink::new("youtube", "https://youtube.com"),
        QuickLink::new("reddit", "https://reddit.com"),
        QuickLink::new("twitter", "https://x.com"),
        QuickLink::new("feedly", "https://feedly.com"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.music_service, "spotify");
        assert_eq!(settings.links_per_column, 4);
        assert_eq!(settings.links.len(), 16);
        assert_eq!(settings.links[0].title, "gmail");
        assert!(settings.latitude.is_none());
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let json = r#"{"musicService":"youtubemusic","musicToken":"extension","latitude":52.5}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.music_service, "youtubemusic");
        assert_eq!(settings.music_token, "extension");
        assert_eq!(settings.latitude, Some(52.5));
        // untouched fields keep their defaults
        assert_eq!(settings.temp_unit, "fahrenheit");
        assert!(settings.show_music);
        assert_eq!(settings.links.len(), 16);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{"showGithub":false,"legacyWidget":{"enabled":true}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(!settings.show_github);
    }
}
