use envconfig::Envconfig;
use strum::EnumString;

#[derive(EnumString, Debug, Clone, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Envconfig, Debug, Clone)]
pub struct LoggerConfig {
    #[envconfig(from = "RUST_LOG_FORMAT", default = "json")]
    pub format: LogFormat,
}
