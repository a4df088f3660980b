//! Configuration validation.
//!
//! Turns a lenient `RawConfig` into a typed `ConfigSnapshot` and reports
//! why the bridge would be disabled.

use std::collections::HashMap;
use std::time::Duration;

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::common::error::ConfigError;
use crate::common::EventKey;
use crate::config::types::{ConfigSnapshot, RawConfig, DEFAULT_READY_TIMEOUT_SECS};

/// Build the immutable snapshot. Never fails: bad values degrade to the
/// disabled defaults (empty token, channel id `0`).
pub fn build_snapshot(raw: &RawConfig) -> ConfigSnapshot {
    let bot = raw.bot.clone().unwrap_or_default();

    let token = bot.token.as_ref().and_then(scalar_to_string).unwrap_or_default();
    let channel_id = bot
        .channel_id
        .as_ref()
        .and_then(|v| parse_channel_id(v).ok())
        .unwrap_or(0);

    let timeout_secs = bot
        .ready_timeout_secs
        .as_ref()
        .and_then(parse_ready_timeout)
        .unwrap_or(DEFAULT_READY_TIMEOUT_SECS);
    let ready_timeout = match timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let mut templates = HashMap::new();
    if let Some(ref messages) = raw.messages {
        for (name, value) in messages {
            match name.parse::<EventKey>() {
                Ok(key) => {
                    if let Some(template) = scalar_to_string(value) {
                        templates.insert(key, template);
                    }
                }
                Err(()) => debug!("Ignoring unknown message key '{}'", name),
            }
        }
    }

    ConfigSnapshot {
        token,
        channel_id,
        templates,
        ready_timeout,
    }
}

/// Check the settings the bridge needs to run.
///
/// Returns the first problem found; the caller logs it once and carries on
/// with the bridge disabled.
pub fn validate_bridge_settings(raw: &RawConfig) -> Result<(), ConfigError> {
    let bot = raw.bot.as_ref().ok_or_else(|| ConfigError::MissingField {
        field: "bot".to_string(),
    })?;

    let token = bot.token.as_ref().and_then(scalar_to_string).unwrap_or_default();
    if token.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: "bot.token".to_string(),
        });
    }

    let channel_id = bot.channel_id.as_ref().ok_or_else(|| ConfigError::MissingField {
        field: "bot.channel_id".to_string(),
    })?;
    match parse_channel_id(channel_id)? {
        0 => Err(ConfigError::InvalidValue {
            field: "bot.channel_id".to_string(),
            message: "must be non-zero".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Parse a channel id given as a YAML number or string.
pub fn parse_channel_id(value: &Value) -> Result<u64, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        field: "bot.channel_id".to_string(),
        message,
    };

    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| invalid(format!("'{}' is not an unsigned 64-bit integer", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(format!("'{}': {}", s, e))),
        Value::Null => Ok(0),
        other => Err(invalid(format!("unsupported value {:?}", other))),
    }
}

/// Parse `ready_timeout_secs` given as a YAML number or string.
///
/// `None` for anything else, and the caller uses the default.
fn parse_ready_timeout(value: &Value) -> Option<u64> {
    let secs = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if secs.is_none() {
        warn!(
            "Invalid bot.ready_timeout_secs {:?}; using {}s",
            value, DEFAULT_READY_TIMEOUT_SECS
        );
    }
    secs
}

/// Stringify a YAML scalar. Null, sequences and mappings yield `None`.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::load_config_str;

    fn raw(content: &str) -> RawConfig {
        load_config_str(content).unwrap()
    }

    #[test]
    fn test_valid_config_builds_enabled_snapshot() {
        let config = raw(
            r#"
bot:
  token: "abc.def"
  channel_id: 123456789012345678
messages:
  startup: "Proxy up"
  join: "{player} joined"
"#,
        );

        assert!(validate_bridge_settings(&config).is_ok());
        let snapshot = build_snapshot(&config);
        assert!(snapshot.is_enabled());
        assert_eq!(snapshot.token, "abc.def");
        assert_eq!(snapshot.channel_id, 123456789012345678);
        assert_eq!(snapshot.template(EventKey::Startup), Some("Proxy up"));
        assert_eq!(snapshot.template(EventKey::Join), Some("{player} joined"));
        assert_eq!(snapshot.template(EventKey::Leave), None);
        assert_eq!(
            snapshot.ready_timeout,
            Some(Duration::from_secs(DEFAULT_READY_TIMEOUT_SECS))
        );
    }

    #[test]
    fn test_channel_id_as_string() {
        let config = raw("bot:\n  token: t\n  channel_id: \"987654321\"\n");
        assert_eq!(build_snapshot(&config).channel_id, 987654321);
    }

    #[test]
    fn test_unparseable_channel_id_disables() {
        let config = raw("bot:\n  token: t\n  channel_id: \"general\"\n");
        let snapshot = build_snapshot(&config);
        assert_eq!(snapshot.channel_id, 0);
        assert!(!snapshot.is_enabled());

        let err = validate_bridge_settings(&config).unwrap_err();
        assert!(err.to_string().contains("bot.channel_id"));
    }

    #[test]
    fn test_negative_channel_id_disables() {
        let config = raw("bot:\n  token: t\n  channel_id: -5\n");
        assert_eq!(build_snapshot(&config).channel_id, 0);
        assert!(validate_bridge_settings(&config).is_err());
    }

    #[test]
    fn test_zero_channel_id_fails_validation() {
        let config = raw("bot:\n  token: t\n  channel_id: 0\n");
        let err = validate_bridge_settings(&config).unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let config = raw("bot:\n  channel_id: 1\n");
        let err = validate_bridge_settings(&config).unwrap_err();
        assert!(err.to_string().contains("bot.token"));
        assert!(!build_snapshot(&config).is_enabled());
    }

    #[test]
    fn test_missing_bot_section_fails_validation() {
        let config = raw("messages:\n  join: hi\n");
        let err = validate_bridge_settings(&config).unwrap_err();
        assert!(err.to_string().contains("bot"));
    }

    #[test]
    fn test_numeric_template_is_stringified() {
        let config = raw("messages:\n  startup: 42\n  leave: \"\"\n");
        let snapshot = build_snapshot(&config);
        assert_eq!(snapshot.template(EventKey::Startup), Some("42"));
        assert_eq!(snapshot.template(EventKey::Leave), Some(""));
    }

    #[test]
    fn test_unknown_message_keys_ignored() {
        let config = raw("messages:\n  restart: nope\n  join: hello\n");
        let snapshot = build_snapshot(&config);
        assert_eq!(snapshot.templates.len(), 1);
        assert_eq!(snapshot.template(EventKey::Join), Some("hello"));
    }

    #[test]
    fn test_zero_ready_timeout_waits_forever() {
        let config = raw("bot:\n  ready_timeout_secs: 0\n");
        assert_eq!(build_snapshot(&config).ready_timeout, None);
    }

    #[test]
    fn test_ready_timeout_as_string() {
        let config = raw("bot:\n  ready_timeout_secs: \"45\"\n");
        assert_eq!(
            build_snapshot(&config).ready_timeout,
            Some(Duration::from_secs(45))
        );
    }

    #[test]
    fn test_bad_ready_timeout_keeps_rest_of_config() {
        let config = raw(
            "bot:\n  token: t\n  channel_id: 5\n  ready_timeout_secs: soon\nmessages:\n  join: hi\n",
        );
        let snapshot = build_snapshot(&config);
        assert!(snapshot.is_enabled());
        assert_eq!(snapshot.template(EventKey::Join), Some("hi"));
        assert_eq!(
            snapshot.ready_timeout,
            Some(Duration::from_secs(DEFAULT_READY_TIMEOUT_SECS))
        );
    }
}
