//! Configuration Module
//!
//! Handles loading the proxy configuration from environment variables.
//! The cache version and shell manifest are deploy-time constants: they are
//! read once at startup and never change for the lifetime of a worker.

use std::env;

/// Namespace identifier used when `CACHE_VERSION` is unset.
pub const DEFAULT_CACHE_VERSION: &str = "scorekeeper-v1";

/// Resources cached on install when `SHELL_MANIFEST` is unset.
pub const DEFAULT_SHELL_MANIFEST: [&str; 3] = ["./", "./index.html", "./manifest.json"];

/// Shell entry point served to offline navigations.
pub const DEFAULT_SHELL_FALLBACK: &str = "./index.html";

/// Proxy configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the current cache namespace
    pub cache_version: String,
    /// Ordered shell resources, relative to `upstream_origin`
    pub shell_manifest: Vec<String>,
    /// Shell entry point returned to offline navigation requests
    pub shell_fallback: String,
    /// Base URL of the upstream application
    pub upstream_origin: String,
    /// HTTP server port
    pub server_port: u16,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_VERSION` - Current namespace identifier (default: scorekeeper-v1)
    /// - `SHELL_MANIFEST` - Comma-separated shell paths (default: ./,./index.html,./manifest.json)
    /// - `SHELL_FALLBACK` - Offline navigation fallback (default: ./index.html)
    /// - `UPSTREAM_ORIGIN` - Upstream base URL (default: http://127.0.0.1:8080/)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_version: env::var("CACHE_VERSION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_version),
            shell_manifest: env::var("SHELL_MANIFEST")
                .ok()
                .map(|v| parse_manifest(&v))
                .unwrap_or(defaults.shell_manifest),
            shell_fallback: env::var("SHELL_FALLBACK")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.shell_fallback),
            upstream_origin: env::var("UPSTREAM_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_origin),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            upstream_timeout: env::var("UPSTREAM_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.upstream_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            shell_manifest: DEFAULT_SHELL_MANIFEST.iter().map(|p| p.to_string()).collect(),
            shell_fallback: DEFAULT_SHELL_FALLBACK.to_string(),
            upstream_origin: "http://127.0.0.1:8080/".to_string(),
            server_port: 3000,
            upstream_timeout: 30,
        }
    }
}

/// Splits a comma-separated manifest, dropping blank entries.
fn parse_manifest(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_version, "scorekeeper-v1");
        assert_eq!(
            config.shell_manifest,
            vec!["./", "./index.html", "./manifest.json"]
        );
        assert_eq!(config.shell_fallback, "./index.html");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.upstream_timeout, 30);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_VERSION");
        env::remove_var("SHELL_MANIFEST");
        env::remove_var("SHELL_FALLBACK");
        env::remove_var("UPSTREAM_ORIGIN");
        env::remove_var("SERVER_PORT");
        env::remove_var("UPSTREAM_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.cache_version, DEFAULT_CACHE_VERSION);
        assert_eq!(config.shell_manifest.len(), 3);
        assert_eq!(config.upstream_origin, "http://127.0.0.1:8080/");
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_parse_manifest_trims_and_skips_blanks() {
        let manifest = parse_manifest(" ./ , ./app.js,, ./style.css ");
        assert_eq!(manifest, vec!["./", "./app.js", "./style.css"]);
    }
}
