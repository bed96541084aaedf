//! omni-rewrite gateway: serves the bulk rewrite engine over HTTP.
//!
//! - `POST /query`: preview or commit a regex rewrite across a directory.
//! - `GET /view/*`: raw files under the data root.
//! - `GET /health`: timeout and concurrency state.

#![allow(missing_docs)]

mod config;
mod gateway;

pub use config::{
    DEFAULT_BIND, QuerySettings, RewriteSettings, ServerSettings, load_rewrite_settings,
    load_rewrite_settings_from_paths, rewrite_settings_paths, set_config_home_override,
};
pub use gateway::{GatewayHealthResponse, GatewayOptions, GatewayState, router, run_http};
