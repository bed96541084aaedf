//! Runtime settings loader for omni-rewrite.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/rewrite.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/omni-rewrite/rewrite.yaml`
//!
//! Merge precedence is user over system; CLI flags override both.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use omni_rewrite::{QueryConfig, ReplaceMode};
use serde::Deserialize;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/rewrite.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "omni-rewrite/rewrite.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";
static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Default listen address (the form's historical port).
pub const DEFAULT_BIND: &str = "0.0.0.0:5432";

/// Merged settings file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewriteSettings {
    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerSettings,
    /// Engine settings shared by `serve` and `query`.
    #[serde(default)]
    pub query: QuerySettings,
}

/// `server:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSettings {
    /// Listen address.
    pub bind: Option<String>,
    /// Root that relative query directories resolve against.
    pub data_dir: Option<String>,
    /// Directory with the form's static assets.
    pub static_dir: Option<String>,
    /// Limit on queries running at once.
    pub max_concurrent_queries: Option<usize>,
}

/// `query:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuerySettings {
    /// Per-query deadline; 0 disables it.
    pub timeout_secs: Option<u64>,
    /// Worker threads (0 = one per core).
    pub workers: Option<usize>,
    /// Files above this many bytes are skipped.
    pub max_file_size: Option<u64>,
    /// Follow symbolic links while scanning.
    pub follow_symlinks: Option<bool>,
    /// Maximum directory depth.
    pub max_depth: Option<usize>,
    /// `all` or `first` match per line.
    pub replace_mode: Option<ReplaceMode>,
}

impl RewriteSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            server: self.server.merge(overlay.server),
            query: self.query.merge(overlay.query),
        }
    }
}

impl ServerSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            bind: overlay.bind.or(self.bind),
            data_dir: overlay.data_dir.or(self.data_dir),
            static_dir: overlay.static_dir.or(self.static_dir),
            max_concurrent_queries: overlay
                .max_concurrent_queries
                .or(self.max_concurrent_queries),
        }
    }
}

impl QuerySettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            timeout_secs: overlay.timeout_secs.or(self.timeout_secs),
            workers: overlay.workers.or(self.workers),
            max_file_size: overlay.max_file_size.or(self.max_file_size),
            follow_symlinks: overlay.follow_symlinks.or(self.follow_symlinks),
            max_depth: overlay.max_depth.or(self.max_depth),
            replace_mode: overlay.replace_mode.or(self.replace_mode),
        }
    }

    /// Build an engine config rooted at `data_root`, filling gaps with defaults.
    #[must_use]
    pub fn to_query_config(&self, data_root: PathBuf) -> QueryConfig {
        let defaults = QueryConfig::default();
        let timeout = match self.timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.timeout,
        };
        QueryConfig {
            data_root,
            timeout,
            workers: self.workers.unwrap_or(defaults.workers),
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            follow_symlinks: self.follow_symlinks.unwrap_or(defaults.follow_symlinks),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            replace_mode: self.replace_mode.unwrap_or(defaults.replace_mode),
        }
    }
}

/// Load merged settings (user overrides system).
pub fn load_rewrite_settings() -> RewriteSettings {
    let (system_path, user_path) = rewrite_settings_paths();
    load_rewrite_settings_from_paths(&system_path, &user_path)
}

#[doc(hidden)]
pub fn rewrite_settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

#[doc(hidden)]
pub fn load_rewrite_settings_from_paths(system: &Path, user: &Path) -> RewriteSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> RewriteSettings {
    if !path.exists() {
        return RewriteSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return RewriteSettings::default();
        }
    };
    match serde_yaml::from_str::<RewriteSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            RewriteSettings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Set config-home override (used by CLI `--conf`).
///
/// The path can be absolute, or relative to `PRJ_ROOT`/cwd.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if CONFIG_HOME_OVERRIDE.set(path.clone()).is_err()
        && let Some(current) = CONFIG_HOME_OVERRIDE.get()
        && current != &path
    {
        tracing::warn!(
            current = %current.display(),
            ignored = %path.display(),
            "config home override already set; ignoring subsequent value"
        );
    }
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    if let Some(path) = CONFIG_HOME_OVERRIDE.get() {
        return absolutize(project_root, path.clone());
    }

    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}
