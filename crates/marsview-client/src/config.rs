//! Configuration for the client, loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Marsview proxy.
    pub proxy_url: String,
    /// Quiet period before a scheduled render runs.
    pub render_debounce: Duration,
    /// File each rendered page is written to.
    pub render_output: PathBuf,
    /// Directory overriding the built-in view templates.
    pub templates_dir: Option<PathBuf>,
    /// Directory of canned responses; when set, the proxy is not used.
    pub fixture_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: String::from("http://localhost:3000"),
            render_debounce: Duration::from_millis(20),
            render_output: PathBuf::from("public/index.html"),
            templates_dir: None,
            fixture_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// All variables are optional:
    /// - `PROXY_URL` -- proxy base URL (default `http://localhost:3000`)
    /// - `RENDER_DEBOUNCE_MS` -- render debounce in milliseconds (default `20`)
    /// - `RENDER_OUTPUT` -- page file to write (default `public/index.html`)
    /// - `TEMPLATES_DIR` -- template directory (default: built-in templates)
    /// - `FIXTURE_DIR` -- serve canned JSON from this directory instead of the proxy
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let render_debounce = match lookup("RENDER_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|e| {
                ClientError::Config(format!("RENDER_DEBOUNCE_MS={raw:?}: {e}"))
            })?),
            None => defaults.render_debounce,
        };

        Ok(Self {
            proxy_url: lookup("PROXY_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.proxy_url),
            render_debounce,
            render_output: lookup("RENDER_OUTPUT").map_or(defaults.render_output, PathBuf::from),
            templates_dir: lookup("TEMPLATES_DIR").map(PathBuf::from),
            fixture_dir: lookup("FIXTURE_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.render_debounce, Duration::from_millis(20));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PROXY_URL", "http://proxy:8080/"),
            ("RENDER_DEBOUNCE_MS", " 50 "),
            ("RENDER_OUTPUT", "/tmp/page.html"),
            ("TEMPLATES_DIR", "themes/dark"),
            ("FIXTURE_DIR", "fixtures"),
        ]))
        .unwrap();

        assert_eq!(config.proxy_url, "http://proxy:8080");
        assert_eq!(config.render_debounce, Duration::from_millis(50));
        assert_eq!(config.render_output, PathBuf::from("/tmp/page.html"));
        assert_eq!(config.templates_dir, Some(PathBuf::from("themes/dark")));
        assert_eq!(config.fixture_dir, Some(PathBuf::from("fixtures")));
    }

    #[test]
    fn invalid_debounce_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("RENDER_DEBOUNCE_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("RENDER_DEBOUNCE_MS"));
    }
}
