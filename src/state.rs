use crate::config::Config;
use crate::models::{DailyRecord, Totals};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Latest upstream data, written by the refresh loop and read by the handlers.
/// Viewer choices (viewport width, trend visibility) arrive with each request.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub today: Option<Totals>,
    pub this_week: Totals,
    pub history: Vec<DailyRecord>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            dashboard: Arc::new(Mutex::new(Dashboard::default())),
        }
    }
}
