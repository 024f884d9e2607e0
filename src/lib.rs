pub mod http_client;
pub mod predict_api;
pub mod provider;
pub mod state;
