pub mod logger;

use crate::{config::logger::LoggerConfig, handler, postgres, usecase};
use envconfig::Envconfig;
use strum::EnumString;

#[derive(EnumString, Debug, Clone, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Envconfig, Debug)]
pub struct Config {
    #[envconfig(from = "STORE_BACKEND", default = "postgres")]
    pub store: StoreBackend,
    #[envconfig(nested)]
    pub handler: handler::config::Config,
    #[envconfig(nested)]
    pub usecase: usecase::config::Config,
    #[envconfig(nested)]
    pub postgres: postgres::config::Config,
    #[envconfig(nested)]
    pub logger: LoggerConfig,
}

pub fn load() -> anyhow::Result<Config> {
    let cfg = Config::init_from_env()?;
    cfg.usecase.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::logger::LogFormat;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let cfg = Config::init_from_hashmap(&HashMap::new()).unwrap();

        assert_eq!(cfg.store, StoreBackend::Postgres);
        assert_eq!(cfg.handler.port, 8080);
        assert_eq!(cfg.handler.short_url("abc123"), "http://localhost:8080/r/abc123");
        assert_eq!(cfg.usecase.code_length, 6);
        assert_eq!(cfg.usecase.max_code_attempts, 10);
        assert_eq!(cfg.usecase.default_ttl(), Some(chrono::TimeDelta::hours(24)));
        assert!(cfg.postgres.dsn.is_none());
        assert_eq!(cfg.logger.format, LogFormat::Json);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<String, String> = [
            ("STORE_BACKEND", "memory"),
            ("BASE_URL", "https://sho.rt/"),
            ("LINK_DEFAULT_TTL_MINUTES", "0"),
            ("RUST_LOG_FORMAT", "TEXT"),
            ("POSTGRES_DSN", "postgres://u:p@localhost/db"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = Config::init_from_hashmap(&vars).unwrap();

        assert_eq!(cfg.store, StoreBackend::Memory);
        assert_eq!(cfg.handler.short_url("abc123"), "https://sho.rt/r/abc123");
        assert_eq!(cfg.usecase.default_ttl(), None);
        assert_eq!(cfg.logger.format, LogFormat::Text);
        assert_eq!(cfg.postgres.dsn.as_deref(), Some("postgres://u:p@localhost/db"));
        assert!(cfg.usecase.validate().is_ok());
    }

    #[test]
    fn test_rejects_unusable_code_settings() {
        let load = |key: &str, value: &str| {
            let vars = HashMap::from([(key.to_string(), value.to_string())]);
            Config::init_from_hashmap(&vars).unwrap()
        };

        assert!(load("LINK_CODE_LENGTH", "16").usecase.validate().is_ok());
        assert!(load("LINK_CODE_LENGTH", "1").usecase.validate().is_ok());
        assert!(load("LINK_CODE_LENGTH", "0").usecase.validate().is_err());
        assert!(load("LINK_CODE_LENGTH", "20").usecase.validate().is_err());
        assert!(load("LINK_MAX_CODE_ATTEMPTS", "0").usecase.validate().is_err());
    }
}
