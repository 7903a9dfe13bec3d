//! Configuration management
//!
//! This module handles loading and parsing configuration for the inkpost
//! content service. Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Auth configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port for the REST listener
    #[serde(default = "default_port")]
    pub port: u16,
    /// Port for the RPC listener
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,
    /// CORS allowed origin (for cookie-based auth)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rpc_port: default_rpc_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_rpc_port() -> u16 {
    50051
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for signing session tokens. Override in production.
    #[serde(default = "default_secret")]
    pub secret: String,
    /// Token validity window in seconds, mirrored in the cookie's Max-Age
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

fn default_secret() -> String {
    "secret-key".to_string()
}

fn default_token_ttl() -> i64 {
    3600
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Per-call timeout for store operations, in milliseconds
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            op_timeout_ms: default_op_timeout_ms(),
        }
    }
}

fn default_op_timeout_ms() -> u64 {
    10_000
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - INKPOST_SERVER_HOST
    /// - INKPOST_SERVER_PORT
    /// - INKPOST_SERVER_RPC_PORT
    /// - INKPOST_SERVER_CORS_ORIGIN
    /// - INKPOST_AUTH_SECRET
    /// - INKPOST_AUTH_TOKEN_TTL_SECS
    /// - INKPOST_STORE_OP_TIMEOUT_MS
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("INKPOST_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("INKPOST_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(port) = std::env::var("INKPOST_SERVER_RPC_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.rpc_port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("INKPOST_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(secret) = std::env::var("INKPOST_AUTH_SECRET") {
            self.auth.secret = secret;
        }
        if let Ok(ttl) = std::env::var("INKPOST_AUTH_TOKEN_TTL_SECS") {
            if let Ok(ttl) = ttl.parse::<i64>() {
                self.auth.token_ttl_secs = ttl;
            }
        }

        if let Ok(timeout) = std::env::var("INKPOST_STORE_OP_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.store.op_timeout_ms = timeout;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_KEYS: &[&str] = &[
        "INKPOST_SERVER_HOST",
        "INKPOST_SERVER_PORT",
        "INKPOST_SERVER_RPC_PORT",
        "INKPOST_SERVER_CORS_ORIGIN",
        "INKPOST_AUTH_SECRET",
        "INKPOST_AUTH_TOKEN_TTL_SECS",
        "INKPOST_STORE_OP_TIMEOUT_MS",
    ];

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        let guard = super::CONFIG_ENV_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
        guard
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.rpc_port, 50051);
        assert_eq!(config.auth.secret, "secret-key");
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.store.op_timeout_ms, 10_000);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 3000\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.token_ttl_secs, 3600);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 9000
  rpc_port: 9001
  cors_origin: "https://blog.example"
auth:
  secret: "not-the-default"
  token_ttl_secs: 600
store:
  op_timeout_ms: 250
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.rpc_port, 9001);
        assert_eq!(config.server.cors_origin, "https://blog.example");
        assert_eq!(config.auth.secret, "not-the-default");
        assert_eq!(config.auth.token_ttl_secs, 600);
        assert_eq!(config.store.op_timeout_ms, 250);
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: not_a_number\n").unwrap();

        let result = Config::load(file.path());

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("parse") || err_msg.contains("invalid"));
    }

    #[test]
    fn test_env_override_server_config() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  host: \"0.0.0.0\"\n  port: 8080\n").unwrap();

        std::env::set_var("INKPOST_SERVER_HOST", "192.168.1.1");
        std::env::set_var("INKPOST_SERVER_PORT", "4000");
        std::env::set_var("INKPOST_SERVER_RPC_PORT", "4001");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.rpc_port, 4001);

        std::env::remove_var("INKPOST_SERVER_HOST");
        std::env::remove_var("INKPOST_SERVER_PORT");
        std::env::remove_var("INKPOST_SERVER_RPC_PORT");
    }

    #[test]
    fn test_env_override_auth_config() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "auth:\n  secret: \"from-file\"\n").unwrap();

        std::env::set_var("INKPOST_AUTH_SECRET", "from-env");
        std::env::set_var("INKPOST_AUTH_TOKEN_TTL_SECS", "120");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.auth.secret, "from-env");
        assert_eq!(config.auth.token_ttl_secs, 120);

        std::env::remove_var("INKPOST_AUTH_SECRET");
        std::env::remove_var("INKPOST_AUTH_TOKEN_TTL_SECS");
    }

    #[test]
    fn test_env_override_invalid_port_ignored() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8080\n").unwrap();

        std::env::set_var("INKPOST_SERVER_PORT", "not_a_number");

        let config = Config::load_with_env(file.path()).unwrap();

        // Keeps the file value when the env var is unparseable.
        assert_eq!(config.server.port, 8080);

        std::env::remove_var("INKPOST_SERVER_PORT");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_host_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
                .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d)),
            Just("localhost".to_string()),
            Just("0.0.0.0".to_string()),
            "[a-z][a-z0-9]{0,10}",
        ]
    }

    fn valid_config_strategy() -> impl Strategy<Value = Config> {
        (
            valid_host_strategy(),
            1u16..=65535,
            1u16..=65535,
            "[a-z0-9-]{8,32}",
            1i64..=86_400,
            1u64..=60_000,
        )
            .prop_map(|(host, port, rpc_port, secret, ttl, timeout)| Config {
                server: ServerConfig {
                    host,
                    port,
                    rpc_port,
                    cors_origin: "http://localhost:3000".to_string(),
                },
                auth: AuthConfig {
                    secret,
                    token_ttl_secs: ttl,
                },
                store: StoreConfig {
                    op_timeout_ms: timeout,
                },
            })
    }

    fn malformed_yaml_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("server:\n  port: not_a_number".to_string()),
            Just("server:\n  port: [1, 2, 3]".to_string()),
            Just("server:\n  port: 99999999999999999999".to_string()),
            Just("auth:\n  token_ttl_secs: maybe".to_string()),
            Just("store:\n  op_timeout_ms: -5".to_string()),
            Just("server: [invalid, list, for, server]".to_string()),
            Just("auth: \"just_a_string\"".to_string()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Serializing a config to YAML and loading it back yields an
        /// equivalent config.
        #[test]
        fn config_roundtrips_through_yaml(config in valid_config_strategy()) {
            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");

            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.server.host, parsed.server.host);
            prop_assert_eq!(config.server.port, parsed.server.port);
            prop_assert_eq!(config.server.rpc_port, parsed.server.rpc_port);
            prop_assert_eq!(config.auth.secret, parsed.auth.secret);
            prop_assert_eq!(config.auth.token_ttl_secs, parsed.auth.token_ttl_secs);
            prop_assert_eq!(config.store.op_timeout_ms, parsed.store.op_timeout_ms);
        }

        /// Malformed config files produce a descriptive error, never a
        /// silent fallback to defaults.
        #[test]
        fn malformed_config_is_rejected(yaml in malformed_yaml_strategy()) {
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let result = Config::load(file.path());

            prop_assert!(result.is_err(), "Malformed YAML should produce an error");
            prop_assert!(result.unwrap_err().to_string().len() > 10);
        }
    }
}
