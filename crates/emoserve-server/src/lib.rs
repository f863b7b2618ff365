//! Emoserve Server
//!
//! Axum HTTP layer over the pretrained emotion classifier. Exposed as a
//! library so router-level tests can inject mock classifiers.

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Cli, ServerConfig};
pub use routes::create_router;
pub use state::AppState;
