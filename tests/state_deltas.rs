use mlfootball_terminal::predict_api::MatchPrediction;
use mlfootball_terminal::state::{
    AppState, Delta, PREDICTION_FAILED_MSG, TEAMS_FAILED_MSG, apply_delta,
};

fn sample_prediction(total: f64) -> MatchPrediction {
    MatchPrediction {
        predicted_home_goals: 1.8,
        predicted_away_goals: 0.9,
        predicted_btts: "Yes".to_string(),
        predicted_goals_classification: "High scoring".to_string(),
        predicted_over_2_5: "Yes".to_string(),
        predicted_total_goals: total,
    }
}

#[test]
fn set_teams_installs_list_and_clears_loading() {
    let mut state = AppState::new();
    assert!(state.teams_loading);

    apply_delta(
        &mut state,
        Delta::SetTeams(vec!["Arsenal".to_string(), "Chelsea".to_string()]),
    );

    assert_eq!(state.teams.len(), 2);
    assert!(!state.teams_loading);
    assert!(!state.teams_failed);
}

#[test]
fn teams_failure_disables_selectors_and_surfaces_error() {
    let mut state = AppState::new();

    apply_delta(&mut state, Delta::TeamsFailed);

    assert!(state.teams.is_empty());
    assert!(!state.teams_loading);
    assert!(state.teams_failed);
    assert_eq!(state.error.as_deref(), Some(TEAMS_FAILED_MSG));

    // Selectors stay inert until a retry succeeds.
    state.select_next_team();
    assert!(state.home_selected.is_none());
}

#[test]
fn begin_request_sets_loading_and_clears_prior_error() {
    let mut state = AppState::new();
    state.error = Some("Please fill in all fields".to_string());

    let seq = state.begin_request();

    assert_eq!(seq, 1);
    assert!(state.loading);
    assert_eq!(state.in_flight, Some(1));
    assert!(state.error.is_none());
}

#[test]
fn matching_prediction_applies_and_clears_loading() {
    let mut state = AppState::new();
    let seq = state.begin_request();

    apply_delta(
        &mut state,
        Delta::SetPrediction {
            seq,
            prediction: sample_prediction(2.7),
        },
    );

    assert!(!state.loading);
    assert!(state.in_flight.is_none());
    let prediction = state.prediction.as_ref().expect("prediction stored");
    assert!((prediction.predicted_total_goals - 2.7).abs() < f64::EPSILON);
}

#[test]
fn stale_prediction_is_dropped() {
    let mut state = AppState::new();
    let first = state.begin_request();
    let second = state.begin_request();

    // The slow first response lands after the second request was issued.
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            seq: first,
            prediction: sample_prediction(1.1),
        },
    );

    assert!(state.loading, "second request is still in flight");
    assert!(state.prediction.is_none());

    apply_delta(
        &mut state,
        Delta::SetPrediction {
            seq: second,
            prediction: sample_prediction(3.4),
        },
    );

    assert!(!state.loading);
    let prediction = state.prediction.as_ref().expect("prediction stored");
    assert!((prediction.predicted_total_goals - 3.4).abs() < f64::EPSILON);
}

#[test]
fn stale_failure_does_not_clobber_newer_request() {
    let mut state = AppState::new();
    let first = state.begin_request();
    let second = state.begin_request();

    apply_delta(&mut state, Delta::PredictionFailed { seq: first });

    assert!(state.loading);
    assert!(state.error.is_none());

    apply_delta(
        &mut state,
        Delta::SetPrediction {
            seq: second,
            prediction: sample_prediction(2.0),
        },
    );
    assert!(state.prediction.is_some());
    assert!(state.error.is_none());
}

#[test]
fn prediction_failure_surfaces_error_and_clears_loading() {
    let mut state = AppState::new();
    state.prediction = Some(sample_prediction(2.7));
    let seq = state.begin_request();

    apply_delta(&mut state, Delta::PredictionFailed { seq });

    assert!(!state.loading);
    assert!(state.in_flight.is_none());
    assert_eq!(state.error.as_deref(), Some(PREDICTION_FAILED_MSG));
    // The previously displayed prediction is kept.
    assert!(state.prediction.is_some());
}

#[test]
fn sequential_submissions_are_independent() {
    let mut state = AppState::new();

    let first = state.begin_request();
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            seq: first,
            prediction: sample_prediction(2.7),
        },
    );
    assert!(!state.loading);

    let second = state.begin_request();
    apply_delta(
        &mut state,
        Delta::SetPrediction {
            seq: second,
            prediction: sample_prediction(0.8),
        },
    );

    assert!(!state.loading);
    let prediction = state.prediction.as_ref().expect("prediction stored");
    assert!((prediction.predicted_total_goals - 0.8).abs() < f64::EPSILON);
}

#[test]
fn abort_request_restores_idle_state() {
    let mut state = AppState::new();
    let seq = state.begin_request();

    state.abort_request(seq);

    assert!(!state.loading);
    assert!(state.in_flight.is_none());
    assert_eq!(state.error.as_deref(), Some(PREDICTION_FAILED_MSG));
}

#[test]
fn log_deltas_are_bounded() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}
