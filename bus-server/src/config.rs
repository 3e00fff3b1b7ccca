//! Server configuration from environment variables.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::time::Duration;

use crate::store::StoreConfig;

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));

/// Default static assets directory.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("set either BUS_DATABASE_URL or BUS_DEMO_DATA")]
    MissingSource,

    #[error("BUS_DATABASE_URL and BUS_DEMO_DATA are mutually exclusive")]
    ConflictingSource,

    #[error("invalid {var} {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where route data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreSource {
    /// A relational database reached through sqlx
    Database(StoreConfig),

    /// A JSON fixture served from memory
    Demo(PathBuf),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub static_dir: String,
    pub source: StoreSource,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            source: StoreSource::Demo(PathBuf::from("data/sample_routes.json")),
        }
    }
}

impl ServerConfig {
    /// Create a config serving from `source` with default settings.
    pub fn new(source: StoreSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Set the listen address.
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Set the static assets directory.
    pub fn with_static_dir(mut self, dir: impl Into<String>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let source = match (get("BUS_DATABASE_URL"), get("BUS_DEMO_DATA")) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingSource),
            (None, None) => return Err(ConfigError::MissingSource),
            (None, Some(path)) => StoreSource::Demo(PathBuf::from(path)),
            (Some(url), None) => {
                let mut store = StoreConfig::new(url);
                if let Some(n) = get("BUS_MAX_CONNECTIONS") {
                    store = store.with_max_connections(parse_var("BUS_MAX_CONNECTIONS", &n)?);
                }
                if let Some(secs) = get("BUS_ACQUIRE_TIMEOUT_SECS") {
                    let secs: u64 = parse_var("BUS_ACQUIRE_TIMEOUT_SECS", &secs)?;
                    store = store.with_acquire_timeout(Duration::from_secs(secs));
                }
                StoreSource::Database(store)
            }
        };

        let mut config = Self::new(source);
        if let Some(addr) = get("BUS_LISTEN_ADDR") {
            config = config.with_listen_addr(parse_var("BUS_LISTEN_ADDR", &addr)?);
        }
        if let Some(dir) = get("BUS_STATIC_DIR") {
            config = config.with_static_dir(dir);
        }
        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn demo_mode_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("BUS_DEMO_DATA", "data/routes.json")])).unwrap();

        assert_eq!(
            config.source,
            StoreSource::Demo(PathBuf::from("data/routes.json"))
        );
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.static_dir, DEFAULT_STATIC_DIR);
    }

    #[test]
    fn database_mode_with_pool_settings() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BUS_DATABASE_URL", "mysql://root@localhost/redbus_travel"),
            ("BUS_MAX_CONNECTIONS", "12"),
            ("BUS_ACQUIRE_TIMEOUT_SECS", "2"),
            ("BUS_LISTEN_ADDR", "0.0.0.0:8080"),
            ("BUS_STATIC_DIR", "/srv/static"),
        ]))
        .unwrap();

        let StoreSource::Database(store) = &config.source else {
            panic!("expected database source, got {:?}", config.source);
        };
        assert_eq!(store.url, "mysql://root@localhost/redbus_travel");
        assert_eq!(store.max_connections, 12);
        assert_eq!(store.acquire_timeout, Duration::from_secs(2));
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.static_dir, "/srv/static");
    }

    #[test]
    fn exactly_one_source() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingSource)
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("BUS_DEMO_DATA", "  ")])),
            Err(ConfigError::MissingSource)
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[
                ("BUS_DATABASE_URL", "sqlite::memory:"),
                ("BUS_DEMO_DATA", "data/routes.json"),
            ])),
            Err(ConfigError::ConflictingSource)
        ));
    }

    #[test]
    fn invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("BUS_DEMO_DATA", "data/routes.json"),
            ("BUS_LISTEN_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert!(err.to_string().starts_with("invalid BUS_LISTEN_ADDR"));

        let err = ServerConfig::from_lookup(lookup(&[
            ("BUS_DATABASE_URL", "sqlite::memory:"),
            ("BUS_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "BUS_MAX_CONNECTIONS",
                ..
            }
        ));
    }
}
