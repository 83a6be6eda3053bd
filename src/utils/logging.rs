//! Logger bootstrap
//!
//! Hosts embedding the catalog call [`init_logging`] once at startup. `RUST_LOG`
//! still wins over the configured level when it is set.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install `env_logger` as the global logger.
///
/// Returns `false` when a logger was already installed, so repeated calls
/// (tests, embedding services with their own logger) are harmless.
pub fn init_logging(default_level: LevelFilter) -> bool {
    let env = Env::default().default_filter_or(default_level.as_str());
    Builder::from_env(env).format_timestamp_millis().try_init().is_ok()
}
