//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Relay server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// REST backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Real-time channel configuration.
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

/// Relay server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

/// REST backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL every resource path is appended to.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Real-time channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket URL of the relay.
    #[serde(default = "default_realtime_url")]
    pub url: String,
    /// Quiet period before a row or tax edit is broadcast.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_realtime_url(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_realtime_url() -> String {
    "ws://localhost:8090/ws".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

impl RealtimeConfig {
    /// Debounce window as a `Duration`.
    #[must_use]
    pub const fn debounce_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.realtime.debounce_ms, 500);
        assert_eq!(
            config.realtime.debounce_window(),
            std::time::Duration::from_millis(500)
        );
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TALLY__BACKEND__API_BASE_URL", Some("https://api.example.test")),
                ("TALLY__REALTIME__URL", Some("wss://rt.example.test/ws")),
                ("TALLY__REALTIME__DEBOUNCE_MS", Some("250")),
                ("TALLY__SERVER__PORT", Some("9100")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.backend.api_base_url, "https://api.example.test");
                assert_eq!(config.realtime.url, "wss://rt.example.test/ws");
                assert_eq!(config.realtime.debounce_ms, 250);
                assert_eq!(config.server.port, 9100);
                assert_eq!(config.server.host, "0.0.0.0");
            },
        );
    }

    #[test]
    fn test_load_without_overrides_uses_defaults() {
        temp_env::with_vars_unset(
            [
                "TALLY__BACKEND__API_BASE_URL",
                "TALLY__REALTIME__URL",
                "TALLY__REALTIME__DEBOUNCE_MS",
                "TALLY__SERVER__PORT",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.backend.api_base_url, "http://localhost:5000/api");
                assert_eq!(config.realtime.debounce_ms, 500);
            },
        );
    }
}
