use actix_web::{HttpRequest, web};

use crate::{
    domain::repository::Repository,
    handler::handlers::{Handler, HandlerError, ShortenParams},
};

/// Mounts every endpoint for a `Handler<T>` registered as app data.
pub fn configure<T: Repository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| HandlerError::ParamError(err.to_string()).into()),
    )
    .service(
        web::scope("/health")
            .route(
                "/readyz",
                web::get().to(|handler: web::Data<Handler<T>>| async move {
                    handler.readyz().await
                }),
            )
            .route(
                "/livez",
                web::get().to(|handler: web::Data<Handler<T>>| async move {
                    handler.livez().await
                }),
            ),
    )
    .service(
        web::scope("/api").service(
            web::scope("/v1")
                .route(
                    "/shorten",
                    web::post().to(
                        |handler: web::Data<Handler<T>>,
                         req: HttpRequest,
                         info: web::Json<ShortenParams>| async move {
                            handler.shorten(req, info).await
                        },
                    ),
                )
                .route(
                    "/stats/{code}",
                    web::get().to(
                        |handler: web::Data<Handler<T>>, path: web::Path<String>| async move {
                            handler.stats(path).await
                        },
                    ),
                )
                .route(
                    "/links/{code}",
                    web::delete().to(
                        |handler: web::Data<Handler<T>>, path: web::Path<String>| async move {
                            handler.delete_link(path).await
                        },
                    ),
                ),
        ),
    )
    .route(
        "/r/{code}",
        web::get().to(
            |handler: web::Data<Handler<T>>, req: HttpRequest, path: web::Path<String>| async move {
                handler.redirect(req, path).await
            },
        ),
    );
}
