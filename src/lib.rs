// Modules
pub mod ai;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod playlist;
pub mod server;

pub use config::AppConfig;
pub use error::ApiError;
pub use server::{build_router, run_server, AppState};
