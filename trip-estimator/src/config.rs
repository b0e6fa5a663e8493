//! Server configuration from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;

use crate::cache::CacheConfig;
use crate::estimate::EstimatorConfig;
use crate::mappls::MapplsConfig;

/// Default per-call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default bound on concurrent provider requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Everything `main` needs to assemble the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub mappls: MapplsConfig,
    pub estimator: EstimatorConfig,
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Missing credentials are logged and left empty; provider calls will
    /// then fail. Unparseable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let credential = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| {
                    warn!("{name} not set. Mappls API calls will fail.");
                    String::new()
                })
        };

        let api_key = credential("MAPPLS_API_KEY");
        let client_id = credential("MAPPLS_CLIENT_ID");
        let client_secret = credential("MAPPLS_CLIENT_SECRET");

        let timeout_secs = parse_or(&lookup, "MAPPLS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS).max(1);
        let max_concurrent =
            parse_or(&lookup, "MAPPLS_MAX_CONCURRENT", DEFAULT_MAX_CONCURRENT).max(1);
        let bind_addr = parse_or(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 5000)),
        );

        let mut mappls = MapplsConfig::new(api_key, client_id, client_secret)
            .with_timeout(timeout_secs)
            .with_max_concurrent(max_concurrent);
        if let Some(url) = lookup("MAPPLS_BASE_URL").filter(|v| !v.is_empty()) {
            mappls = mappls.with_base_url(url);
        }

        Self {
            bind_addr,
            mappls,
            estimator: EstimatorConfig::default()
                .with_call_timeout(Duration::from_secs(timeout_secs)),
            cache: CacheConfig::default(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "invalid {name}, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.mappls.api_key, "");
        assert_eq!(config.mappls.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.mappls.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.estimator.call_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_credentials_and_limits() {
        let config = config_from(&[
            ("MAPPLS_API_KEY", "key"),
            ("MAPPLS_CLIENT_ID", "id"),
            ("MAPPLS_CLIENT_SECRET", "secret"),
            ("MAPPLS_TIMEOUT_SECS", "4"),
            ("MAPPLS_MAX_CONCURRENT", "2"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ]);

        assert_eq!(config.mappls.api_key, "key");
        assert_eq!(config.mappls.client_id, "id");
        assert_eq!(config.mappls.client_secret, "secret");
        assert_eq!(config.mappls.timeout_secs, 4);
        assert_eq!(config.mappls.max_concurrent, 2);
        assert_eq!(config.estimator.call_timeout, Duration::from_secs(4));
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config_from(&[
            ("MAPPLS_TIMEOUT_SECS", "soon"),
            ("MAPPLS_MAX_CONCURRENT", "0"),
            ("BIND_ADDR", "nowhere"),
        ]);

        assert_eq!(config.mappls.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.mappls.max_concurrent, 1);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn base_url_override() {
        let config = config_from(&[("MAPPLS_BASE_URL", "http://127.0.0.1:9000")]);
        assert_eq!(config.mappls.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(
            config.mappls.token_url,
            "http://127.0.0.1:9000/api/security/oauth/token"
        );
    }
}
