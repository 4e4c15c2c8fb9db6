use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    #[envconfig(from = "BASE_URL", default = "http://localhost:8080")]
    pub base_url: String,
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,
}

impl Config {
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.base_url.trim_end_matches('/'), code)
    }
}
