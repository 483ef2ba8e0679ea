//! dirgate server: HTTP surface for member role/host administration
//! and access checks.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::router;
pub use config::ServerConfig;
pub use error::{ApiError, StartupError};
pub use state::AppState;
