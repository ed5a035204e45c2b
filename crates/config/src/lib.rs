//! Configuration loading for the pager host: channel table overrides and
//! host adapter settings.
//!
//! Config files are discovered as `pager.{toml,yaml,yml,json}` in the working
//! directory, then in `~/.config/pager/`. `${VAR}` and `${VAR:-fallback}`
//! placeholders are expanded before parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        config_dir, data_dir, discover_and_load, find_or_default_config_path, load_config,
        set_config_dir, write_config_if_absent,
    },
    schema::{ChannelEntry, HostConfig, PagerConfig},
};
