//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `HERALD_CONFIG` - Config file path (default `config.yml`)
//! - `HERALD_DISCORD_TOKEN` - Discord bot token
//! - `HERALD_CHANNEL_ID` - Target Discord channel id

use std::env;

use serde_yaml::Value;

use crate::config::types::RawConfig;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "HERALD";

/// Apply environment variable overrides to a config.
///
/// Lets the bot token stay out of the config file.
pub fn apply_env_overrides(config: RawConfig) -> RawConfig {
    apply_overrides(
        config,
        env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)).ok(),
        env::var(format!("{}_CHANNEL_ID", ENV_PREFIX)).ok(),
    )
}

fn apply_overrides(
    mut config: RawConfig,
    token: Option<String>,
    channel_id: Option<String>,
) -> RawConfig {
    if token.is_none() && channel_id.is_none() {
        return config;
    }

    let bot = config.bot.get_or_insert_with(Default::default);
    if let Some(token) = token {
        bot.token = Some(Value::String(token));
    }
    if let Some(channel_id) = channel_id {
        bot.channel_id = Some(Value::String(channel_id));
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `HERALD_CONFIG`, otherwise returns "config.yml".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "config.yml".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::load_config_str;
    use crate::config::validate::build_snapshot;

    #[test]
    fn test_env_prefix() {
        assert_eq!(ENV_PREFIX, "HERALD");
    }

    #[test]
    fn test_no_overrides_leaves_config_unchanged() {
        let config = load_config_str("bot:\n  token: original\n  channel_id: 7\n").unwrap();
        let snapshot = build_snapshot(&apply_overrides(config, None, None));
        assert_eq!(snapshot.token, "original");
        assert_eq!(snapshot.channel_id, 7);
    }

    #[test]
    fn test_overrides_create_bot_section() {
        let config = RawConfig::default();
        let result = apply_overrides(config, Some("env-token".into()), Some("99".into()));
        let snapshot = build_snapshot(&result);
        assert_eq!(snapshot.token, "env-token");
        assert_eq!(snapshot.channel_id, 99);
        assert!(snapshot.is_enabled());
    }

    #[test]
    fn test_token_override_keeps_file_channel() {
        let config = load_config_str("bot:\n  token: file\n  channel_id: 5\n").unwrap();
        let snapshot = build_snapshot(&apply_overrides(config, Some("env".into()), None));
        assert_eq!(snapshot.token, "env");
        assert_eq!(snapshot.channel_id, 5);
    }
}
