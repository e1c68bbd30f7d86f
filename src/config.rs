use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` when `DATABASE_URL` is unset or empty; registrations then fail
    /// with a configuration error instead of the process refusing to start.
    pub database: Option<DbConfig>,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|url| DbConfig {
                url,
                max_connections: lookup("DB_MAX_CONNECTIONS")
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(10),
            });

        let port = match lookup("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT {:?}: {}", v, e))?,
            None => 8080,
        };

        Ok(Self {
            database,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_any_variables() {
        let cfg = config_from(&[]).expect("config");
        assert!(cfg.database.is_none());
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn empty_database_url_counts_as_missing() {
        let cfg = config_from(&[("DATABASE_URL", "  ")]).expect("config");
        assert!(cfg.database.is_none());
    }

    #[test]
    fn database_url_and_pool_size_are_read() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://app@db/fih"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "3000"),
        ])
        .expect("config");
        let db = cfg.database.expect("database configured");
        assert_eq!(db.url, "postgres://app@db/fih");
        assert_eq!(db.max_connections, 4);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn unparseable_pool_size_falls_back_to_default() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://app@db/fih"),
            ("DB_MAX_CONNECTIONS", "lots"),
        ])
        .expect("config");
        assert_eq!(cfg.database.unwrap().max_connections, 10);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config_from(&[("APP_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }
}
