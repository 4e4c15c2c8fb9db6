use std::time::Duration;

use anyhow::{Result, bail};
use chrono::TimeDelta;
use envconfig::Envconfig;

use crate::domain::code::MAX_CODE_LENGTH;

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    /// Lifetime of a link created without `expires_in`. `0` keeps it forever.
    #[envconfig(from = "LINK_DEFAULT_TTL_MINUTES", default = "1440")]
    pub default_ttl_minutes: u32,

    #[envconfig(from = "LINK_CODE_LENGTH", default = "6")]
    pub code_length: usize,

    #[envconfig(from = "LINK_MAX_CODE_ATTEMPTS", default = "10")]
    pub max_code_attempts: u32,

    #[envconfig(from = "STORE_TIMEOUT_MS", default = "2000")]
    pub store_timeout_ms: u64,
}

impl Config {
    /// Rejects settings under which issued codes could not be looked up again.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CODE_LENGTH).contains(&self.code_length) {
            bail!(
                "LINK_CODE_LENGTH must be between 1 and {}, got {}",
                MAX_CODE_LENGTH,
                self.code_length
            );
        }
        if self.max_code_attempts == 0 {
            bail!("LINK_MAX_CODE_ATTEMPTS must be at least 1");
        }
        Ok(())
    }

    pub fn default_ttl(&self) -> Option<TimeDelta> {
        match self.default_ttl_minutes {
            0 => None,
            minutes => Some(TimeDelta::minutes(i64::from(minutes))),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_minutes: 1440,
            code_length: crate::domain::code::DEFAULT_CODE_LENGTH,
            max_code_attempts: 10,
            store_timeout_ms: 2000,
        }
    }
}
