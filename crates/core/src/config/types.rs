use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub librarian: LibrarianConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Gateway server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built web UI (served with SPA fallback).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web/dist")
}

/// Marketplace backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the REST API, e.g. "http://localhost:5000/api"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

/// Librarian (generative model) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarianConfig {
    /// Model API key. Absent or blank selects offline mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Custom API base URL (for proxies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Simulated round trip of the offline librarian, in milliseconds.
    #[serde(default = "default_offline_latency")]
    pub offline_latency_ms: u64,
}

impl Default for LibrarianConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: None,
            timeout_secs: default_llm_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            offline_latency_ms: default_offline_latency(),
        }
    }
}

impl LibrarianConfig {
    /// The API key, if one is actually set.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_offline_latency() -> u64 {
    1500
}

/// Local session storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// JSON file holding the bearer token and last known user.
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from("bookbridge-session.json")
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub librarian: SanitizedLibrarianConfig,
    pub session: SessionConfig,
}

/// Librarian config with the API key hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLibrarianConfig {
    pub mode: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub offline_latency_ms: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let librarian = &config.librarian;
        let configured = librarian.credential().is_some();
        Self {
            server: config.server.clone(),
            backend: config.backend.clone(),
            librarian: SanitizedLibrarianConfig {
                mode: if configured { "online" } else { "offline" }.to_string(),
                model: librarian.model.clone(),
                api_base: librarian.api_base.clone(),
                api_key_configured: configured,
                timeout_secs: librarian.timeout_secs,
                offline_latency_ms: librarian.offline_latency_ms,
            },
            session: config.session.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[backend]
api_url = "https://bookbridge.example.com/api"

[librarian]
api_key = "secret"
model = "gemini-2.0-flash"
offline_latency_ms = 0

[session]
path = "/tmp/session.json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.backend.api_url, "https://bookbridge.example.com/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.librarian.credential(), Some("secret"));
        assert_eq!(config.librarian.model, "gemini-2.0-flash");
        assert_eq!(config.librarian.offline_latency_ms, 0);
        assert_eq!(config.session.path, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.backend.api_url, "http://localhost:5000/api");
        assert!(config.librarian.credential().is_none());
        assert_eq!(config.librarian.offline_latency_ms, 1500);
    }

    #[test]
    fn test_blank_api_key_is_not_a_credential() {
        let config = LibrarianConfig {
            api_key: Some("  ".to_string()),
            ..LibrarianConfig::default()
        };
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let mut config = Config::default();
        config.librarian.api_key = Some("super-secret".to_string());

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.librarian.api_key_configured);
        assert_eq!(sanitized.librarian.mode, "online");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_sanitized_config_offline() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(!sanitized.librarian.api_key_configured);
        assert_eq!(sanitized.librarian.mode, "offline");
    }
}
