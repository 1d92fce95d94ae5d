//! HTTP gateway: device-flow pages and Stremio addon routes over axum.

pub mod auth_routes;
pub mod server;
pub mod state;
pub mod stream_routes;

pub use {
    server::{AppState, build_gateway_app, start_gateway},
    state::{GatewayState, TokenSource, build_http_client},
};
