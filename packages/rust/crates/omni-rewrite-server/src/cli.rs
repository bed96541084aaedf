use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use omni_rewrite::ReplaceMode;

#[derive(Parser)]
#[command(name = "omni-rewrite")]
#[command(about = "Bulk regex rewrite: preview or commit line-level substitutions across a directory.")]
pub(crate) struct Cli {
    /// Override config directory (same semantics as `PRJ_CONFIG_HOME`).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging for omni-rewrite crates (RUST_LOG still wins).
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Engine flags shared by `serve` and `query`; unset flags fall back to settings.
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct EngineArgs {
    /// Root that relative directories resolve against (default: settings or cwd)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,

    /// Per-query deadline in seconds; 0 disables it (default: 30)
    #[arg(long)]
    pub(crate) timeout_secs: Option<u64>,

    /// Worker threads; 0 = one per core
    #[arg(long)]
    pub(crate) workers: Option<usize>,

    /// Skip files larger than this many bytes (default: 1048576)
    #[arg(long)]
    pub(crate) max_file_size: Option<u64>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub(crate) follow_symlinks: bool,

    /// Replace every match in a line (`all`) or only the first (`first`)
    #[arg(long)]
    pub(crate) replace_mode: Option<ReplaceMode>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// QueryResult JSON, as returned by POST /query.
    #[default]
    Json,
    /// Unified diff per changed file.
    Diff,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run HTTP server (POST /query). Default bind: 0.0.0.0:5432
    Serve {
        /// Listen address (e.g. 0.0.0.0:5432)
        #[arg(long)]
        bind: Option<String>,

        /// Directory with the form's static assets, served at /
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Max concurrent queries (default: settings; omit for no limit)
        #[arg(long)]
        max_concurrent: Option<usize>,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Run one query and print the result. Dry run unless --commit.
    Query {
        /// Directory to scan
        #[arg(long)]
        dir: String,

        /// Whitespace-separated file name suffixes (e.g. ".rs .toml")
        #[arg(long, default_value = "")]
        suffixes: String,

        /// Regular expression matched against each line
        #[arg(long)]
        pattern: String,

        /// Replacement; `$1` / `${name}` expand capture groups
        #[arg(long, default_value = "")]
        replace: String,

        /// Write the rewrites to disk
        #[arg(long)]
        commit: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[command(flatten)]
        engine: EngineArgs,
    },
}
