//! HTTP API handlers for memories-server

pub mod auth;
pub mod health;
pub mod media;
pub mod memories;

pub use auth::{auth_middleware, auth_routes};
pub use health::health_routes;
pub use media::media_routes;
pub use memories::memories_routes;
