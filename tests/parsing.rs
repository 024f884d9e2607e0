use std::fs;
use std::path::PathBuf;

use mlfootball_terminal::predict_api::{parse_prediction_json, parse_teams_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_teams_fixture() {
    let raw = read_fixture("teams.json");
    let teams = parse_teams_json(&raw).expect("fixture should parse");
    assert_eq!(teams.len(), 4);
    assert_eq!(teams[0], "Arsenal");
    assert_eq!(teams[2], "Manchester United");
}

#[test]
fn teams_null_is_empty() {
    assert!(parse_teams_json("null").expect("null should parse").is_empty());
    assert!(parse_teams_json("  ").expect("blank should parse").is_empty());
}

#[test]
fn teams_key_absent_is_empty() {
    let teams = parse_teams_json("{}").expect("empty object should parse");
    assert!(teams.is_empty());
}

#[test]
fn teams_malformed_body_is_error() {
    assert!(parse_teams_json("<html>502</html>").is_err());
}

#[test]
fn parses_prediction_fixture() {
    let raw = read_fixture("prediction.json");
    let prediction = parse_prediction_json(&raw).expect("fixture should parse");
    assert!((prediction.predicted_home_goals - 1.8).abs() < f64::EPSILON);
    assert!((prediction.predicted_away_goals - 0.9).abs() < f64::EPSILON);
    assert!((prediction.predicted_total_goals - 2.7).abs() < f64::EPSILON);
    assert_eq!(prediction.predicted_btts, "Yes");
    assert_eq!(prediction.predicted_over_2_5, "Yes");
    assert_eq!(prediction.predicted_goals_classification, "High scoring");
}

#[test]
fn prediction_missing_field_is_error() {
    let raw = read_fixture("prediction_missing_field.json");
    assert!(parse_prediction_json(&raw).is_err());
}

#[test]
fn prediction_null_is_error() {
    assert!(parse_prediction_json("null").is_err());
    assert!(parse_prediction_json("").is_err());
}
