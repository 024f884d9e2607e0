use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::predict_api;
use crate::state::{Delta, ProviderCommand};

/// Background worker owning all network I/O. The UI thread sends commands
/// and consumes deltas; it never touches the socket itself.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let base = predict_api::api_base_url();

        // The team list is fetched once at startup, before any command.
        fetch_teams(&base, &tx);

        for cmd in cmd_rx {
            match cmd {
                ProviderCommand::FetchTeams => fetch_teams(&base, &tx),
                ProviderCommand::FetchPrediction { seq, query } => {
                    match predict_api::fetch_match_prediction(&base, &query) {
                        Ok(prediction) => {
                            let _ = tx.send(Delta::SetPrediction { seq, prediction });
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::Log(format!("[WARN] Prediction error: {err}")));
                            let _ = tx.send(Delta::PredictionFailed { seq });
                        }
                    }
                }
            }
        }
    });
}

fn fetch_teams(base: &str, tx: &Sender<Delta>) {
    match predict_api::fetch_available_teams(base) {
        Ok(teams) => {
            let _ = tx.send(Delta::SetTeams(teams));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Teams fetch error: {err}")));
            let _ = tx.send(Delta::TeamsFailed);
        }
    }
}
