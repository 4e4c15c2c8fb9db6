use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    #[envconfig(from = "POSTGRES_DSN")]
    pub dsn: Option<String>,

    #[envconfig(from = "POSTGRES_POOL_SIZE", default = "16")]
    pub pool_size: usize,
}
