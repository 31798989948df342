//! Configuration for the proxy, loaded from environment variables.
//!
//! The proxy needs to know where to listen, where the NASA API lives, which
//! API key to attach, and which directory holds the static client assets.

use std::path::PathBuf;

/// Key NASA accepts for low-volume unauthenticated use.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Errors that can occur while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Name of the offending variable.
        name: &'static str,
        /// Parser message.
        reason: String,
    },
}

/// Complete proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Upstream NASA API settings.
    pub nasa: NasaConfig,
    /// Directory served for every path that is not an API route.
    pub public_dir: PathBuf,
}

/// Where and how to reach the NASA API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasaConfig {
    /// Base URL without trailing slash (e.g. `https://api.nasa.gov`).
    pub api_url: String,
    /// Key appended to every request as `api_key`.
    pub api_key: String,
}

impl Default for NasaConfig {
    fn default() -> Self {
        Self {
            api_url: String::from("https://api.nasa.gov"),
            api_key: String::from(DEMO_API_KEY),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 3000,
            nasa: NasaConfig::default(),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl ProxyConfig {
    /// Load configuration from the process environment.
    ///
    /// All variables are optional:
    /// - `NASA_API_KEY` -- API key, falling back to `API_KEY` (default `DEMO_KEY`)
    /// - `NASA_API_URL` -- API base URL (default `https://api.nasa.gov`)
    /// - `PROXY_HOST` -- bind address (default `0.0.0.0`)
    /// - `PROXY_PORT` -- listen port (default `3000`)
    /// - `PUBLIC_DIR` -- static asset directory (default `public`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PROXY_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: "PROXY_PORT",
                reason: format!("{e}"),
            })?,
            None => defaults.port,
        };

        let api_url = lookup("NASA_API_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or(defaults.nasa.api_url);

        Ok(Self {
            host: lookup("PROXY_HOST").unwrap_or(defaults.host),
            port,
            nasa: NasaConfig {
                api_url,
                api_key: lookup("NASA_API_KEY")
                    .or_else(|| lookup("API_KEY"))
                    .unwrap_or(defaults.nasa.api_key),
            },
            public_dir: lookup("PUBLIC_DIR").map_or(defaults.public_dir, PathBuf::from),
        })
    }

    /// Whether requests will go out with the shared demo key.
    pub fn uses_demo_key(&self) -> bool {
        self.nasa.api_key == DEMO_API_KEY
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ProxyConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ProxyConfig::default());
        assert_eq!(config.port, 3000);
        assert!(config.uses_demo_key());
    }

    #[test]
    fn reads_every_variable() {
        let config = ProxyConfig::from_lookup(lookup_from(&[
            ("NASA_API_KEY", "abc123"),
            ("NASA_API_URL", "http://127.0.0.1:9000/"),
            ("PROXY_HOST", "127.0.0.1"),
            ("PROXY_PORT", "8081"),
            ("PUBLIC_DIR", "/srv/marsview"),
        ]))
        .unwrap();

        assert_eq!(config.nasa.api_key, "abc123");
        assert_eq!(config.nasa.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.public_dir, PathBuf::from("/srv/marsview"));
        assert!(!config.uses_demo_key());
    }

    #[test]
    fn legacy_api_key_is_a_fallback() {
        let config = ProxyConfig::from_lookup(lookup_from(&[("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.nasa.api_key, "legacy");

        let config = ProxyConfig::from_lookup(lookup_from(&[
            ("API_KEY", "legacy"),
            ("NASA_API_KEY", "current"),
        ]))
        .unwrap();
        assert_eq!(config.nasa.api_key, "current");
    }

    #[test]
    fn rejects_bad_port() {
        let err = ProxyConfig::from_lookup(lookup_from(&[("PROXY_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PROXY_PORT"));
    }
}
