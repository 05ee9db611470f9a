pub mod aggregate;
pub mod app;
pub mod chart;
pub mod config;
pub mod counter;
pub mod errors;
pub mod fetcher;
pub mod handlers;
pub mod layout;
pub mod lifecycle;
pub mod models;
pub mod overlay;
pub mod period;
pub mod rough;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use fetcher::CounterClient;
pub use state::AppState;
