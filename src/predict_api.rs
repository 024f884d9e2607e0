use std::env;

use anyhow::{Context, Result, ensure};
use reqwest::Url;
use serde::Deserialize;

use crate::http_client::http_client;
use crate::state::MatchQuery;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Backend base address. Overridable via PREDICT_API_URL so deployments do
/// not bake the address into the binary.
pub fn api_base_url() -> String {
    env::var("PREDICT_API_URL")
        .ok()
        .map(|val| val.trim().trim_end_matches('/').to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchPrediction {
    pub predicted_home_goals: f64,
    pub predicted_away_goals: f64,
    pub predicted_btts: String,
    pub predicted_goals_classification: String,
    pub predicted_over_2_5: String,
    pub predicted_total_goals: f64,
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Option<Vec<String>>,
}

/// One best-effort attempt; no retry, no caching.
pub fn fetch_available_teams(base: &str) -> Result<Vec<String>> {
    let client = http_client()?;

    let url = format!("{base}/available_teams");
    let response = client.get(&url).send().context("request failed")?;
    ensure!(
        response.status().is_success(),
        "teams endpoint returned HTTP {}",
        response.status()
    );

    let body = response.text().context("failed to read response body")?;
    parse_teams_json(&body)
}

pub fn fetch_match_prediction(base: &str, query: &MatchQuery) -> Result<MatchPrediction> {
    let client = http_client()?;

    let url = prediction_url(base, query)?;
    let response = client.get(url).send().context("request failed")?;
    ensure!(
        response.status().is_success(),
        "prediction endpoint returned HTTP {}",
        response.status()
    );

    let body = response.text().context("failed to read response body")?;
    parse_prediction_json(&body)
}

pub fn prediction_url(base: &str, query: &MatchQuery) -> Result<Url> {
    Url::parse_with_params(
        &format!("{base}/predict/match_statistics"),
        [
            ("home_team", query.home_team.as_str()),
            ("away_team", query.away_team.as_str()),
            ("date", query.date.as_str()),
        ],
    )
    .context("invalid prediction url")
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: TeamsResponse = serde_json::from_str(trimmed).context("invalid teams json")?;
    Ok(data.teams.unwrap_or_default())
}

pub fn parse_prediction_json(raw: &str) -> Result<MatchPrediction> {
    serde_json::from_str(raw.trim()).context("invalid prediction json")
}
