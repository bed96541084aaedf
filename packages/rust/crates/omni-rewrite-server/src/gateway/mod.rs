//! Gateway namespace: HTTP entrypoint.

mod http;

pub use http::{GatewayHealthResponse, GatewayOptions, GatewayState, router, run_http};
