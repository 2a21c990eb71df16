use crate::{Cli, Command, SettingsAction};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use startpage_contributions::{ContributionSummary, ContributionsClient};
use startpage_core::{ControlAction, NormalizedTrack, Settings};
use startpage_now_playing::NowPlaying;
use startpage_persistence::{SettingsRepository, SqlitePool};
use std::future::Future;
use std::time::Duration;

pub async fn run(cli: &Cli, pool: SqlitePool) -> Result<()> {
    let repo = SettingsRepository::new(pool);
    let settings = repo.load().await?;

    match &cli.command {
        Command::NowPlaying { json, poll } => {
            let facade = music_facade(cli, &settings);
            match poll {
                Some(secs) => poll_now_playing(&facade, *json, Duration::from_secs((*secs).max(1))).await,
                None => {
                    print_now_playing(facade.get_now_playing().await, *json)?;
                    Ok(())
                }
            }
        }
        Command::Play => control(cli, &settings, ControlAction::Play).await,
        Command::Pause => control(cli, &settings, ControlAction::Pause).await,
        Command::Next => control(cli, &settings, ControlAction::Next).await,
        Command::Previous => control(cli, &settings, ControlAction::Previous).await,
        Command::Contributions { months } => contributions(&settings, *months).await,
        Command::Settings { action } => match action {
            SettingsAction::Show => {
                println!("{}", serde_json::to_string_pretty(&settings)?);
                Ok(())
            }
            SettingsAction::Set { key, value } => {
                let updated = apply_setting(&settings, key, value)?;
                repo.save(&updated).await?;
                tracing::info!("Updated setting '{}'", key);
                Ok(())
            }
        },
    }
}

/// The terminal has no extension host, so the session source reports itself unavailable here
fn music_facade(cli: &Cli, settings: &Settings) -> NowPlaying {
    let service = cli.service.as_deref().unwrap_or(settings.music_service.as_str());
    let token = cli.token.as_deref().unwrap_or(settings.music_token.as_str());
    NowPlaying::new(service, Some(token), None)
}

async fn control(cli: &Cli, settings: &Settings, action: ControlAction) -> Result<()> {
    let facade = music_facade(cli, settings);
    if !facade.is_available() {
        tracing::warn!("No usable source for '{}', {} ignored", facade.service(), action);
    }
    facade.dispatch(action).await;
    Ok(())
}

async fn poll_now_playing(facade: &NowPlaying, json: bool, every: Duration) -> Result<()> {
    poll_until(facade, json, every, tokio::signal::ctrl_c()).await
}

/// Print a snapshot every `every` until `shutdown` resolves, even mid-fetch
async fn poll_until<F>(facade: &NowPlaying, json: bool, every: Duration, shutdown: F) -> Result<()>
where
    F: Future,
{
    tokio::pin!(shutdown);
    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            _ = &mut shutdown => break,
            track = facade.get_now_playing() => print_now_playing(track, json)?,
        }
    }

    tracing::info!("Stopping");
    Ok(())
}

fn print_now_playing(track: Option<NormalizedTrack>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&track)?);
        return Ok(());
    }

    match track {
        Some(track) => println!("{}", format_track(&track)),
        None => println!("Nothing playing"),
    }
    Ok(())
}

async fn contributions(settings: &Settings, months: u32) -> Result<()> {
    if settings.github_username.is_empty() || settings.github_token.is_empty() {
        bail!("Set githubUsername and githubToken first (startpage settings set <key> <value>)");
    }

    let client = ContributionsClient::new(&settings.github_username);
    let summary = client
        .recent_contributions(&settings.github_token, months)
        .await
        .context("Failed to fetch GitHub contributions")?;

    println!("{}", format_summary(client.username(), months, &summary));
    Ok(())
}

/// Return a copy of `settings` with one camelCase field replaced
pub fn apply_setting(settings: &Settings, key: &str, raw: &str) -> Result<Settings> {
    let mut document = serde_json::to_value(settings)?;
    let fields = document
        .as_object_mut()
        .ok_or_else(|| anyhow!("settings did not serialize to an object"))?;

    let current = fields
        .get(key)
        .ok_or_else(|| anyhow!("Unknown setting '{}'", key))?;

    // String fields take the raw text so tokens like "123" stay strings
    let value = if current.is_string() {
        Value::String(raw.to_string())
    } else {
        serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    };
    fields.insert(key.to_string(), value);

    serde_json::from_value(document).with_context(|| format!("Invalid value for '{}'", key))
}

pub fn format_track(track: &NormalizedTrack) -> String {
    let state = if track.is_playing { "▶" } else { "⏸" };
    let mut line = format!(
        "{} {} [{} / {}]",
        state,
        track.display_label(),
        format_duration(track.progress_ms),
        format_duration(track.duration_ms)
    );
    if !track.album.is_empty() {
        line.push_str(&format!(" ({})", track.album));
    }
    line
}

/// Milliseconds as m:ss
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn format_summary(username: &str, months: u32, summary: &ContributionSummary) -> String {
    let in_window: u32 = summary
        .weeks
        .iter()
        .flat_map(|w| &w.contribution_days)
        .map(|d| d.contribution_count)
        .sum();

    format!(
        "{}: {} today, {} in the last {} months, {} in the last year",
        username, summary.today_count, in_window, months, summary.total
    )
}
