//! Config namespace: YAML runtime settings.

mod settings;

pub use settings::{
    DEFAULT_BIND, QuerySettings, RewriteSettings, ServerSettings, load_rewrite_settings,
    load_rewrite_settings_from_paths, rewrite_settings_paths, set_config_home_override,
};
