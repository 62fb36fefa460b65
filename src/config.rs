//! Server configuration
//!
//! Defaults can be overridden by an optional TOML file (path taken from
//! `MINIGAME_CONFIG`) and then by individual `MINIGAME_*` environment variables.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "MINIGAME_CONFIG";

/// Number of clients matched into one lobby
pub const PLAYERS_PER_LOBBY: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub host: String,
    pub port: u16,
    /// Countdown length before a match starts
    pub countdown_seconds: u32,
    /// Real time between two countdown ticks
    pub tick_millis: u64,
    /// Fallback tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

/// The part of the configuration the lobby coordinator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchmakingSettings {
    pub countdown_seconds: u32,
    pub tick: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8070,
            countdown_seconds: 10,
            tick_millis: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        ServerConfig::default().matchmaking_settings()
    }
}

impl ServerConfig {
    /// Load configuration from the optional file and the environment
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `MINIGAME_*` overrides from the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("MINIGAME_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("MINIGAME_PORT") {
            self.port = port
                .parse()
                .map_err(|_| anyhow!("Invalid MINIGAME_PORT value: {}", port))?;
        }
        if let Some(seconds) = lookup("MINIGAME_COUNTDOWN_SECONDS") {
            self.countdown_seconds = seconds
                .parse()
                .map_err(|_| anyhow!("Invalid MINIGAME_COUNTDOWN_SECONDS value: {}", seconds))?;
        }
        if let Some(millis) = lookup("MINIGAME_TICK_MILLIS") {
            self.tick_millis = millis
                .parse()
                .map_err(|_| anyhow!("Invalid MINIGAME_TICK_MILLIS value: {}", millis))?;
        }
        if let Some(level) = lookup("MINIGAME_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(anyhow!("host must not be empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("port must be greater than 0"));
        }
        if self.countdown_seconds == 0 {
            return Err(anyhow!("countdown_seconds must be at least 1"));
        }
        if self.tick_millis == 0 {
            return Err(anyhow!("tick_millis must be at least 1"));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn matchmaking_settings(&self) -> MatchmakingSettings {
        MatchmakingSettings {
            countdown_seconds: self.countdown_seconds,
            tick: Duration::from_millis(self.tick_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_client() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8070");
        assert_eq!(
            config.matchmaking_settings(),
            MatchmakingSettings {
                countdown_seconds: 10,
                tick: Duration::from_secs(1),
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str("host = \"0.0.0.0\"\ncountdown_seconds = 5\n").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.countdown_seconds, 5);
        assert_eq!(config.port, 8070);
        assert_eq!(config.tick_millis, 1000);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("MINIGAME_PORT", "9000"),
                ("MINIGAME_TICK_MILLIS", "250"),
                ("MINIGAME_LOG_LEVEL", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.matchmaking_settings().tick, Duration::from_millis(250));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("MINIGAME_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("MINIGAME_PORT"));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = ServerConfig {
            countdown_seconds: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ServerConfig::from_file("/nonexistent/minigame.toml").is_err());
    }
}
