use axum::{http::StatusCode, routing::get, Router};
use startpage_live_session::{PageDocument, StaticNode, StaticPage, TabHandle, TabHost};
use startpage_now_playing::NowPlaying;
use startpage_remote_spotify::{RemotePlaybackClient, RemoteSource};
use snapshot_host::SnapshotHost;
use std::sync::Arc;

/// Tab host serving fixed page snapshots, the way a snapshotting extension would
mod snapshot_host {
    use async_trait::async_trait;
    use startpage_live_session::{
        matches_url_pattern, InjectionResult, PageScript, StaticPage, TabHandle, TabHost,
    };

    pub struct SnapshotHost {
        pub tabs: Vec<(TabHandle, StaticPage)>,
    }

    #[async_trait]
    impl TabHost for SnapshotHost {
        async fn query_tabs(&self, url_pattern: &str) -> anyhow::Result<Vec<TabHandle>> {
            Ok(self
                .tabs
                .iter()
                .filter(|(tab, _)| {
                    tab.url
                        .as_deref()
                        .is_some_and(|url| matches_url_pattern(url_pattern, url))
                })
                .map(|(tab, _)| tab.clone())
                .collect())
        }

        async fn execute_in_tab(
            &self,
            tab: &TabHandle,
            script: PageScript,
        ) -> anyhow::Result<Vec<InjectionResult>> {
            let (_, page) = self
                .tabs
                .iter()
                .find(|(t, _)| t.id == tab.id)
                .ok_or_else(|| anyhow::anyhow!("tab {} closed", tab.id))?;
            Ok(vec![InjectionResult {
                result: script.run(page),
            }])
        }
    }
}

async fn spotify_returning(status: StatusCode) -> NowPlaying {
    let app = Router::new().route(
        "/v1/me/player/currently-playing",
        get(move || async move { status }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = RemotePlaybackClient::with_base_url(format!("http://{}/v1", addr));
    NowPlaying::with_source("spotify", Box::new(RemoteSource::new(client, "token")))
}

#[tokio::test]
async fn test_remote_server_error_becomes_none() {
    let facade = spotify_returning(StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(facade.get_now_playing().await, None);
}

#[tokio::test]
async fn test_remote_nothing_playing() {
    let facade = spotify_returning(StatusCode::NO_CONTENT).await;
    assert_eq!(facade.get_now_playing().await, None);
    // control against a route that does not exist: 404, logged and swallowed
    facade.next().await;
}

fn player_tab(id: i64, title: &str) -> (TabHandle, StaticPage) {
    let mut page = StaticPage::new(format!("https://music.youtube.com/watch?v={}", id));
    let bar = page.add_node(None, "ytmusic-player-bar", StaticNode::default());
    page.add_node(Some(bar), ".title", StaticNode::text(title));
    page.add_node(Some(bar), ".byline", StaticNode::text("Portishead • Dummy"));
    page.add_node(Some(bar), "#play-pause-button", StaticNode::default());

    let tab = TabHandle {
        id,
        url: Some(format!("https://music.youtube.com/watch?v={}", id)),
    };
    (tab, page)
}

#[tokio::test]
async fn test_session_source_through_facade() {
    let host = Arc::new(SnapshotHost {
        tabs: vec![player_tab(1, "Glory Box")],
    });
    let facade = NowPlaying::new("youtubemusic", Some("extension"), Some(host.clone() as Arc<dyn TabHost>));
    assert!(facade.is_available());

    let track = facade.get_now_playing().await.unwrap();
    assert_eq!(track.track_name, "Glory Box");
    assert_eq!(track.artist, "Portishead");
    assert_eq!(track.album, "Dummy");
    assert_eq!(track.source_url, "https://music.youtube.com/watch?v=1");

    facade.pause().await;
    let page = &host.tabs[0].1;
    let bar = page.query_selector(None, "ytmusic-player-bar").unwrap().unwrap();
    let toggle = page.query_selector(Some(bar), "#play-pause-button").unwrap().unwrap();
    assert_eq!(page.clicks(), vec![toggle]);
}

#[tokio::test]
async fn test_session_source_rejects_unknown_sentinel() {
    let host: Arc<dyn TabHost> = Arc::new(SnapshotHost {
        tabs: vec![player_tab(1, "Glory Box")],
    });
    let facade = NowPlaying::new("youtubemusic", Some("BQD-spotify-token"), Some(host));
    assert!(!facade.is_available());
    assert_eq!(facade.get_now_playing().await, None);
}
