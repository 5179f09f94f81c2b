//! Load configuration via `config` crate with env-override support.

use std::{collections::HashSet, ops::Deref, sync::Arc};

use serde::Deserialize;
use tracing::warn;

use super::types::Res;

/// Default PagerDuty REST API base URL.
fn default_pagerduty_api_url() -> String {
    "https://api.pagerduty.com".to_string()
}

/// Default PagerDuty Events API v2 ingestion URL.
fn default_pagerduty_events_url() -> String {
    "https://events.pagerduty.com/v2/enqueue".to_string()
}

/// Default command token that prefixes every bot command.
fn default_command_prefix() -> String {
    "!pd".to_string()
}

/// Configuration for the pager-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// The shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Configuration values, as deserialized from the file and environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// PagerDuty service whose open incidents are reported (`PAGERDUTY_SERVICE`).
    pub pagerduty_service: String,
    /// PagerDuty schedule whose on-call users are reported (`PAGERDUTY_SCHEDULE`).
    pub pagerduty_schedule: String,
    /// PagerDuty REST API access token (`PAGERDUTY_ACCESS_TOKEN`).
    pub pagerduty_access_token: String,
    /// PagerDuty Events API v2 routing key (`PAGERDUTY_INTEGRATION_KEY`).
    pub pagerduty_integration_key: String,
    /// PagerDuty REST API base URL (`PAGERDUTY_API_URL`).
    #[serde(default = "default_pagerduty_api_url")]
    pub pagerduty_api_url: String,
    /// PagerDuty Events API v2 endpoint (`PAGERDUTY_EVENTS_URL`).
    #[serde(default = "default_pagerduty_events_url")]
    pub pagerduty_events_url: String,
    /// Discord bot token (`DISCORD_TOKEN`).
    pub discord_token: String,
    /// Comma-separated list of channel IDs the bot may act in (`DISCORD_CHANNELS`).
    #[serde(default)]
    pub discord_channels: String,
    /// Command token that prefixes every bot command (`COMMAND_PREFIX`).
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            pagerduty_service: String::new(),
            pagerduty_schedule: String::new(),
            pagerduty_access_token: String::new(),
            pagerduty_integration_key: String::new(),
            pagerduty_api_url: default_pagerduty_api_url(),
            pagerduty_events_url: default_pagerduty_events_url(),
            discord_token: String::new(),
            discord_channels: String::new(),
            command_prefix: default_command_prefix(),
        }
    }
}

impl ConfigInner {
    /// The channel allow-list, parsed from `discord_channels`.
    ///
    /// Entries are trimmed and empty entries are dropped.
    pub fn allowed_channels(&self) -> HashSet<String> {
        self.discord_channels.split(',').map(str::trim).filter(|c| !c.is_empty()).map(str::to_string).collect()
    }
}

impl Config {
    /// Load the configuration from an optional TOML file and the environment, then validate it.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // The environment wins over the file.
        cfg = cfg.add_source(config::Environment::default());

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Checks the loaded values for anything that would make the bot unusable.
    pub fn validate(&self) -> Res<()> {
        let required = [
            ("PAGERDUTY_SERVICE", &self.pagerduty_service),
            ("PAGERDUTY_SCHEDULE", &self.pagerduty_schedule),
            ("PAGERDUTY_ACCESS_TOKEN", &self.pagerduty_access_token),
            ("PAGERDUTY_INTEGRATION_KEY", &self.pagerduty_integration_key),
            ("DISCORD_TOKEN", &self.discord_token),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{name} must be set."));
            }
        }

        if self.command_prefix.is_empty() || self.command_prefix.chars().any(char::is_whitespace) {
            return Err(anyhow::anyhow!("Command prefix must be non-empty and contain no whitespace."));
        }

        if self.allowed_channels().is_empty() {
            warn!("DISCORD_CHANNELS is empty; the bot will not respond in any channel.");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ConfigInner {
        ConfigInner {
            pagerduty_service: "PSERVICE".to_string(),
            pagerduty_schedule: "PSCHEDULE".to_string(),
            pagerduty_access_token: "token".to_string(),
            pagerduty_integration_key: "routing".to_string(),
            discord_token: "discord".to_string(),
            discord_channels: "123".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_allowed_channels_trims_and_drops_empty() {
        let inner = ConfigInner {
            discord_channels: " a, b ,,".to_string(),
            ..Default::default()
        };

        let allowed = inner.allowed_channels();

        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains("a"));
        assert!(allowed.contains("b"));
    }

    #[test]
    fn test_allowed_channels_empty() {
        assert!(ConfigInner::default().allowed_channels().is_empty());
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = Config { inner: Arc::new(complete()) };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_token() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                pagerduty_access_token: " ".to_string(),
                ..complete()
            }),
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PAGERDUTY_ACCESS_TOKEN"));
    }

    #[test]
    fn test_validate_rejects_prefix_with_whitespace() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                command_prefix: "! pd".to_string(),
                ..complete()
            }),
        };

        assert!(config.validate().is_err());
    }

    fn write_config_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pager-bot-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_env_overrides_file() {
        let path = write_config_file(
            "env-override",
            r#"
            pagerduty_service = "SVCFILE"
            pagerduty_schedule = "SCHEDFILE"
            pagerduty_access_token = "token"
            pagerduty_integration_key = "routing"
            discord_token = "discord"
            discord_channels = "111, 222"
            "#,
        );

        // Only this test sets PAGERDUTY_SERVICE.
        unsafe { std::env::set_var("PAGERDUTY_SERVICE", "FROMENV") };
        let config = Config::load(Some(&path));
        unsafe { std::env::remove_var("PAGERDUTY_SERVICE") };
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.pagerduty_service, "FROMENV");
        assert_eq!(config.pagerduty_schedule, "SCHEDFILE");
        assert_eq!(config.command_prefix, "!pd");
        assert_eq!(config.allowed_channels(), HashSet::from(["111".to_string(), "222".to_string()]));
    }

    #[test]
    fn test_load_rejects_missing_value() {
        let path = write_config_file(
            "missing-value",
            r#"
            pagerduty_schedule = "SCHEDFILE"
            pagerduty_access_token = "token"
            pagerduty_integration_key = "routing"
            pagerduty_service = "SVCFILE"
            discord_token = ""
            "#,
        );

        let result = Config::load(Some(&path));
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn test_defaults() {
        let inner = ConfigInner::default();

        assert_eq!(inner.command_prefix, "!pd");
        assert_eq!(inner.pagerduty_api_url, "https://api.pagerduty.com");
        assert_eq!(inner.pagerduty_events_url, "https://events.pagerduty.com/v2/enqueue");
    }
}
