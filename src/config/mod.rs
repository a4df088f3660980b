//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

use std::path::Path;

use tracing::{error, warn};

pub use types::ConfigSnapshot;

/// Load, override and validate the config at `path`.
///
/// Never fails. A broken or incomplete config logs once and yields a
/// snapshot with the bridge disabled, so the host keeps running.
pub fn load_and_validate(path: impl AsRef<Path>) -> ConfigSnapshot {
    let path = path.as_ref();

    if let Err(e) = parser::ensure_default_config(path) {
        warn!("Could not write default configuration: {}", e);
    }

    let raw = match parser::load_config(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Default::default()
        }
    };
    let raw = env::apply_env_overrides(raw);

    if let Err(e) = validate::validate_bridge_settings(&raw) {
        warn!("Discord bridge disabled: {}", e);
    }

    validate::build_snapshot(&raw)
}
