mod query;
mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use omni_rewrite::RewriteEngine;
use omni_rewrite_server::RewriteSettings;

use crate::cli::EngineArgs;

pub(crate) use query::{QueryCommandRequest, run_query_mode};
pub(crate) use serve::{ServeCommandRequest, run_serve_mode};

/// Build the engine: CLI flags over settings over built-in defaults.
pub(crate) fn build_engine(
    args: &EngineArgs,
    settings: &RewriteSettings,
) -> anyhow::Result<RewriteEngine> {
    let data_root = args
        .data_dir
        .clone()
        .or_else(|| settings.server.data_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    check_dir(&data_root).with_context(|| format!("data_dir - {}", data_root.display()))?;

    let mut query_settings = settings.query.clone();
    query_settings.timeout_secs = args.timeout_secs.or(query_settings.timeout_secs);
    query_settings.workers = args.workers.or(query_settings.workers);
    query_settings.max_file_size = args.max_file_size.or(query_settings.max_file_size);
    query_settings.replace_mode = args.replace_mode.or(query_settings.replace_mode);
    if args.follow_symlinks {
        query_settings.follow_symlinks = Some(true);
    }

    let config = query_settings.to_query_config(data_root);
    tracing::debug!(?config, "engine configuration");
    Ok(RewriteEngine::new(config)?)
}

/// Fail unless `path` is an existing directory.
pub(crate) fn check_dir(path: &Path) -> anyhow::Result<()> {
    if path.as_os_str().is_empty() {
        bail!("not specified");
    }
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_dir() {
        bail!("not a directory");
    }
    Ok(())
}
