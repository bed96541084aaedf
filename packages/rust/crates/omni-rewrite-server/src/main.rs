//! omni-rewrite CLI: HTTP gateway or one-shot query.
//!
//! Settings from `packages/conf/rewrite.yaml` merged with the user's
//! `omni-rewrite/rewrite.yaml`; flags override both.
//!
//! Logging: set `RUST_LOG=omni_rewrite=debug` (or `info`, `warn`) to see engine logs on stderr.

mod cli;
mod nodes;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_rewrite_server::{load_rewrite_settings, set_config_home_override};

use crate::cli::{Cli, Command};
use crate::nodes::{QueryCommandRequest, ServeCommandRequest, run_query_mode, run_serve_mode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_rewrite=debug,omni_rewrite_server=debug,omni_io=debug,tower_http=debug"
        } else {
            "omni_rewrite=info,omni_rewrite_server=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }
    let settings = load_rewrite_settings();

    match cli.command {
        Command::Serve {
            bind,
            static_dir,
            max_concurrent,
            engine,
        } => {
            run_serve_mode(
                ServeCommandRequest {
                    bind,
                    static_dir,
                    max_concurrent,
                    engine,
                },
                &settings,
            )
            .await
        }
        Command::Query {
            dir,
            suffixes,
            pattern,
            replace,
            commit,
            format,
            engine,
        } => {
            run_query_mode(
                QueryCommandRequest {
                    dir,
                    suffixes,
                    pattern,
                    replace,
                    commit,
                    format,
                    engine,
                },
                &settings,
            )
            .await
        }
    }
}
