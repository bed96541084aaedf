use std::path::PathBuf;

use anyhow::Context;
use omni_rewrite_server::{DEFAULT_BIND, GatewayOptions, RewriteSettings, run_http};

use super::{build_engine, check_dir};
use crate::cli::EngineArgs;

pub(crate) struct ServeCommandRequest {
    pub(crate) bind: Option<String>,
    pub(crate) static_dir: Option<PathBuf>,
    pub(crate) max_concurrent: Option<usize>,
    pub(crate) engine: EngineArgs,
}

pub(crate) async fn run_serve_mode(
    request: ServeCommandRequest,
    settings: &RewriteSettings,
) -> anyhow::Result<()> {
    let engine = build_engine(&request.engine, settings)?;

    let static_dir = request
        .static_dir
        .or_else(|| settings.server.static_dir.as_ref().map(PathBuf::from));
    if let Some(dir) = &static_dir {
        check_dir(dir).with_context(|| format!("static_dir - {}", dir.display()))?;
    }

    let bind = request
        .bind
        .or_else(|| settings.server.bind.clone())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let options = GatewayOptions {
        max_concurrent_queries: request
            .max_concurrent
            .or(settings.server.max_concurrent_queries),
        static_dir,
    };

    run_http(engine, &bind, options).await
}
