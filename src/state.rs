use std::collections::VecDeque;

use chrono::{NaiveDate, Utc};

use crate::predict_api::MatchPrediction;

pub const TEAMS_FAILED_MSG: &str =
    "Failed to load teams. Please check if the API server is running.";
pub const PREDICTION_FAILED_MSG: &str = "Failed to get prediction. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    HomeTeam,
    AwayTeam,
    Date,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub home_team: String,
    pub away_team: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields,
    SameTeams,
    BadDate,
}

impl ValidationError {
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::MissingFields => "Please fill in all fields",
            ValidationError::SameTeams => "Home team and away team must be different",
            ValidationError::BadDate => "Date must be in YYYY-MM-DD format",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetTeams(Vec<String>),
    TeamsFailed,
    SetPrediction {
        seq: u64,
        prediction: MatchPrediction,
    },
    PredictionFailed {
        seq: u64,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchTeams,
    FetchPrediction { seq: u64, query: MatchQuery },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub teams: Vec<String>,
    pub teams_loading: bool,
    pub teams_failed: bool,
    pub focus: FormField,
    pub home_selected: Option<usize>,
    pub away_selected: Option<usize>,
    pub date: String,
    pub prediction: Option<MatchPrediction>,
    pub loading: bool,
    pub error: Option<String>,
    pub request_seq: u64,
    pub in_flight: Option<u64>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            teams: Vec::new(),
            teams_loading: true,
            teams_failed: false,
            focus: FormField::HomeTeam,
            home_selected: None,
            away_selected: None,
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            prediction: None,
            loading: false,
            error: None,
            request_seq: 0,
            in_flight: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn home_team(&self) -> Option<&str> {
        self.home_selected
            .and_then(|idx| self.teams.get(idx))
            .map(String::as_str)
    }

    pub fn away_team(&self) -> Option<&str> {
        self.away_selected
            .and_then(|idx| self.teams.get(idx))
            .map(String::as_str)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::HomeTeam => FormField::AwayTeam,
            FormField::AwayTeam => FormField::Date,
            FormField::Date => FormField::Submit,
            FormField::Submit => FormField::HomeTeam,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormField::HomeTeam => FormField::Submit,
            FormField::AwayTeam => FormField::HomeTeam,
            FormField::Date => FormField::AwayTeam,
            FormField::Submit => FormField::Date,
        };
    }

    /// Cycle the focused selector through the team list. No-op while the
    /// list is still loading or after a failed load (selectors stay
    /// disabled until a retry succeeds).
    pub fn select_next_team(&mut self) {
        self.cycle_team(1);
    }

    pub fn select_prev_team(&mut self) {
        self.cycle_team(-1);
    }

    fn cycle_team(&mut self, step: isize) {
        if self.teams_loading || self.teams.is_empty() {
            return;
        }
        let len = self.teams.len() as isize;
        let slot = match self.focus {
            FormField::HomeTeam => &mut self.home_selected,
            FormField::AwayTeam => &mut self.away_selected,
            _ => return,
        };
        let next = match *slot {
            Some(idx) => (idx as isize + step).rem_euclid(len) as usize,
            None => {
                if step >= 0 {
                    0
                } else {
                    (len - 1) as usize
                }
            }
        };
        *slot = Some(next);
    }

    pub fn date_push(&mut self, ch: char) {
        const MAX_DATE_LEN: usize = 10;
        if (ch.is_ascii_digit() || ch == '-') && self.date.len() < MAX_DATE_LEN {
            self.date.push(ch);
        }
    }

    pub fn date_pop(&mut self) {
        self.date.pop();
    }

    /// Client-side preconditions, checked in order. No network call is
    /// issued unless this returns a query.
    pub fn build_query(&self) -> Result<MatchQuery, ValidationError> {
        let home = self.home_team().unwrap_or("");
        let away = self.away_team().unwrap_or("");
        let date = self.date.trim();

        if home.is_empty() || away.is_empty() || date.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if home == away {
            return Err(ValidationError::SameTeams);
        }
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(ValidationError::BadDate);
        }

        Ok(MatchQuery {
            home_team: home.to_string(),
            away_team: away.to_string(),
            date: date.to_string(),
        })
    }

    /// Start a prediction request: bump the sequence, mark it in flight,
    /// clear the prior error. A newer call supersedes any request still in
    /// flight; its late completion is dropped by token comparison.
    pub fn begin_request(&mut self) -> u64 {
        self.request_seq += 1;
        self.in_flight = Some(self.request_seq);
        self.loading = true;
        self.error = None;
        self.request_seq
    }

    /// Request could not be handed to the provider; undo begin_request.
    pub fn abort_request(&mut self, seq: u64) {
        if self.in_flight == Some(seq) {
            self.in_flight = None;
            self.loading = false;
            self.error = Some(PREDICTION_FAILED_MSG.to_string());
        }
    }

    pub fn begin_teams_load(&mut self) {
        self.teams_loading = true;
        self.teams_failed = false;
        self.error = None;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetTeams(teams) => {
            state.teams = teams;
            state.teams_loading = false;
            state.teams_failed = false;
            state.home_selected = None;
            state.away_selected = None;
            state.push_log(format!("[INFO] Loaded {} teams", state.teams.len()));
        }
        Delta::TeamsFailed => {
            state.teams = Vec::new();
            state.teams_loading = false;
            state.teams_failed = true;
            state.error = Some(TEAMS_FAILED_MSG.to_string());
        }
        Delta::SetPrediction { seq, prediction } => {
            if state.in_flight != Some(seq) {
                state.push_log(format!("[INFO] Dropped stale prediction (seq {seq})"));
                return;
            }
            state.in_flight = None;
            state.loading = false;
            state.error = None;
            state.prediction = Some(prediction);
        }
        Delta::PredictionFailed { seq } => {
            if state.in_flight != Some(seq) {
                state.push_log(format!("[INFO] Dropped stale prediction error (seq {seq})"));
                return;
            }
            state.in_flight = None;
            state.loading = false;
            state.error = Some(PREDICTION_FAILED_MSG.to_string());
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
