//! Server configuration, read from `DIRGATE_*` environment variables.

use dirgate_authz::AuthzConfig;
use dirgate_db::DbConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    pub db: DbConfig,
    pub authz: AuthzConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            db: DbConfig::default(),
            authz: AuthzConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let string = |key: &str, default: String| lookup(key).unwrap_or(default);
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(default)
        };

        Self {
            bind_addr: string("DIRGATE_BIND_ADDR", defaults.bind_addr),
            db: DbConfig {
                url: string("DIRGATE_DB_URL", defaults.db.url),
                namespace: string("DIRGATE_DB_NAMESPACE", defaults.db.namespace),
                database: string("DIRGATE_DB_DATABASE", defaults.db.database),
                username: string("DIRGATE_DB_USERNAME", defaults.db.username),
                password: string("DIRGATE_DB_PASSWORD", defaults.db.password),
            },
            authz: AuthzConfig {
                honor_wildcard_host: flag(
                    "DIRGATE_HONOR_WILDCARD_HOST",
                    defaults.authz.honor_wildcard_host,
                ),
                allow_wildcard_assignment: flag(
                    "DIRGATE_ALLOW_WILDCARD_ASSIGNMENT",
                    defaults.authz.allow_wildcard_assignment,
                ),
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn unset_keys_use_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.db.namespace, "dirgate");
        assert!(config.authz.honor_wildcard_host);
    }

    #[test]
    fn keys_override_defaults() {
        let env: HashMap<&str, &str> = [
            ("DIRGATE_BIND_ADDR", "127.0.0.1:9000"),
            ("DIRGATE_DB_URL", "db:8000"),
            ("DIRGATE_HONOR_WILDCARD_HOST", "off"),
            ("DIRGATE_ALLOW_WILDCARD_ASSIGNMENT", "garbage"),
        ]
        .into();
        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.db.url, "db:8000");
        assert!(!config.authz.honor_wildcard_host);
        // Unparseable flags fall back to the default.
        assert!(config.authz.allow_wildcard_assignment);
    }
}
