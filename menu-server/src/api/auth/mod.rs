//! Authentication Routes

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /login: public (the editor login page posts here)
pub fn router() -> Router<ServerState> {
    Router::new().route("/login", post(handler::login))
}
