use crate::models::{ContributionCalendar, GraphQlResponse};
use crate::summary::{summarize, ContributionSummary};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde_json::json;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

const CALENDAR_QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        contributionsCollection {
            contributionCalendar {
                totalContributions
                weeks {
                    contributionDays {
                        contributionCount
                        date
                    }
                }
            }
        }
    }
}
"#;

/// GitHub GraphQL client for one user's contribution calendar
///
/// Requires a personal access token; the GraphQL API has no anonymous access.
#[derive(Clone, Debug)]
pub struct ContributionsClient {
    client: Client,
    base_url: String,
    username: String,
}

impl ContributionsClient {
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_base_url(username, DEFAULT_GITHUB_API)
    }

    pub fn with_base_url(username: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fetch the full contribution calendar (roughly the last year)
    pub async fn fetch_calendar(&self, token: &str) -> Result<ContributionCalendar> {
        let url = format!("{}/graphql", self.base_url);
        tracing::debug!("GitHub GraphQL call for user '{}'", self.username);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("bearer {}", token))
            .header(header::USER_AGENT, "startpage")
            .json(&json!({
                "query": CALENDAR_QUERY,
                "variables": { "login": self.username },
            }))
            .send()
            .await
            .context("Failed to reach GitHub API")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("GitHub API error: {}", status));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .context("Failed to parse GitHub GraphQL response")?;

        if let Some(error) = body.errors.first() {
            return Err(anyhow!("GitHub API error: {}", error.message));
        }

        let user = body
            .data
            .and_then(|data| data.user)
            .ok_or_else(|| anyhow!("GitHub user '{}' not found", self.username))?;

        let calendar = user.contributions_collection.contribution_calendar;
        tracing::info!(
            "Fetched {} weeks of contributions for '{}'",
            calendar.weeks.len(),
            self.username
        );
        Ok(calendar)
    }

    /// Fetch and keep only the last `months` months
    ///
    /// "Today" is the current UTC date, the same calendar the API reports days in.
    pub async fn recent_contributions(&self, token: &str, months: u32) -> Result<ContributionSummary> {
        let calendar = self.fetch_calendar(token).await?;
        Ok(summarize(calendar, months, Utc::now().date_naive()))
    }
}
