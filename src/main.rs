use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clicklink::{
    config::{self, Config, StoreBackend, logger::LoggerConfig},
    domain::repository::Repository,
    handler::{handlers::Handler, routes},
    memory, postgres,
    usecase::usecase::Usecase,
};
use tracing_subscriber::{EnvFilter, fmt::time::ChronoUtc};

fn build_logger(config: &LoggerConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_timer(ChronoUtc::rfc_3339())
        .with_env_filter(filter);

    match config.format {
        config::logger::LogFormat::Json => builder.json().init(),
        config::logger::LogFormat::Text => builder.init(),
    }
}

async fn serve<T>(repo: T, cfg: Config) -> std::io::Result<()>
where
    T: Repository + Send + Sync + 'static,
{
    let port = cfg.handler.port;
    let usecase = Usecase::new(repo, cfg.usecase);
    let handler = web::Data::new(Handler::new(usecase, cfg.handler));

    tracing::info!(port, "Listening");
    HttpServer::new(move || {
        App::new()
            .app_data(handler.clone())
            .configure(routes::configure::<T>)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Failed to load configuration: {}", err);
            std::process::exit(1);
        }
    };
    build_logger(&cfg.logger);

    tracing::debug!(
        store = ?cfg.store,
        base_url = cfg.handler.base_url.as_str(),
        usecase = ?cfg.usecase,
        "Configuration loaded successfully"
    );

    match cfg.store {
        StoreBackend::Postgres => {
            let db = match postgres::db::DB::new(cfg.postgres.clone()).await {
                Ok(db) => db,
                Err(err) => {
                    tracing::error!(error = %err, "Failed to connect to Postgres");
                    std::process::exit(1);
                }
            };
            serve(Arc::new(db), cfg).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on restart");
            serve(Arc::new(memory::db::DB::new()), cfg).await
        }
    }
}
