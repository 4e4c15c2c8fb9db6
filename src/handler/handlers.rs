use std::net::SocketAddr;

use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    http::{StatusCode, header},
    web::{self, Redirect},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::{
    domain::{
        code::Code,
        error::DomainError,
        models::{ClickSummary, RequestMeta, Resolution},
        repository::Repository,
    },
    handler::config::Config,
    usecase::usecase::Usecase,
};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Parameter error: {0}")]
    ParamError(String),
    #[error("Internal error: {0}")]
    Internal(DomainError),
    #[error("URL not found")]
    NotFound,
    #[error("URL expired")]
    Expired,
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => HandlerError::ParamError(msg),
            DomainError::NotFound => HandlerError::NotFound,
            DomainError::Expired(_) => HandlerError::Expired,
            other => HandlerError::Internal(other),
        }
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::ParamError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerError::NotFound => StatusCode::NOT_FOUND,
            HandlerError::Expired => StatusCode::GONE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            HandlerError::Internal(e) => {
                tracing::error!("Internal Server Error: {:?}", e);
                e.to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "detail": detail }))
    }
}

pub struct Handler<T: Repository> {
    usecase: Usecase<T>,
    config: Config,
}

impl<T: Repository> Handler<T> {
    pub fn new(usecase: Usecase<T>, config: Config) -> Self {
        Handler { usecase, config }
    }

    fn extract_request_meta(req: &HttpRequest) -> RequestMeta {
        let ip = req.connection_info().realip_remote_addr().map(|addr| {
            addr.parse::<SocketAddr>()
                .map(|s| s.ip().to_string())
                .unwrap_or_else(|_| addr.to_string())
        });
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };
        RequestMeta {
            ip,
            user_agent: header_value(header::USER_AGENT),
            referer: header_value(header::REFERER),
        }
    }

    pub async fn livez(&self) -> HttpResponse {
        HttpResponse::Ok().body("Ok")
    }

    pub async fn readyz(&self) -> HttpResponse {
        match self.usecase.ready().await {
            Ok(()) => HttpResponse::Ok().body("Ok"),
            Err(e) => {
                tracing::warn!(error = %e, "Readiness check failed");
                HttpResponse::ServiceUnavailable().body("Unavailable")
            }
        }
    }

    pub async fn shorten(
        &self,
        req: HttpRequest,
        info: web::Json<ShortenParams>,
    ) -> Result<web::Json<ShortenResponse>, HandlerError> {
        let link = self
            .usecase
            .create_link(&info.url, info.expires_in)
            .await?;

        let meta = Self::extract_request_meta(&req);
        tracing::info!(
            event = "short_url_created",
            code = link.code.as_str(),
            ip = meta.ip.as_deref().unwrap_or(""),
            user_agent = meta.user_agent.as_deref().unwrap_or(""),
            original_url = link.original_url.as_str()
        );

        Ok(web::Json(ShortenResponse {
            short_url: self.config.short_url(link.code.as_str()),
            code: link.code,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }))
    }

    pub async fn redirect(
        &self,
        req: HttpRequest,
        path: web::Path<String>,
    ) -> Result<Redirect, HandlerError> {
        let code = path.into_inner();
        let meta = Self::extract_request_meta(&req);

        let log_access = |status_code: u16| {
            tracing::info!(
                event = "short_url_access",
                code = code.as_str(),
                status_code,
                ip = meta.ip.as_deref().unwrap_or(""),
                user_agent = meta.user_agent.as_deref().unwrap_or(""),
                referer = meta.referer.as_deref().unwrap_or("")
            );
        };

        match self.usecase.resolve(&code, meta.clone()).await? {
            Resolution::Redirect(url) => {
                log_access(307);
                Ok(Redirect::to(url.to_string()).temporary())
            }
            Resolution::NotFound => {
                log_access(404);
                Err(DomainError::NotFound.into())
            }
            Resolution::Expired { expires_at } => {
                log_access(410);
                Err(DomainError::Expired(expires_at).into())
            }
        }
    }

    pub async fn stats(
        &self,
        path: web::Path<String>,
    ) -> Result<web::Json<StatsResponse>, HandlerError> {
        let view = self.usecase.stats(&path.into_inner()).await?;

        Ok(web::Json(StatsResponse {
            code: view.link.code,
            original_url: view.link.original_url,
            created_at: view.link.created_at,
            expires_at: view.link.expires_at,
            total_clicks: view.total_clicks,
            last_click_at: view.last_click_at,
            clicks: view.clicks,
        }))
    }

    pub async fn delete_link(&self, path: web::Path<String>) -> Result<HttpResponse, HandlerError> {
        let code = path.into_inner();
        self.usecase.delete_link(&code).await?;
        tracing::info!(event = "short_url_deleted", code = code.as_str());
        Ok(HttpResponse::NoContent().finish())
    }
}

#[derive(Deserialize)]
pub struct ShortenParams {
    pub url: String,
    /// Minutes until the link expires.
    pub expires_in: Option<i64>,
}

#[derive(Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub code: Code,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub code: Code,
    pub original_url: Url,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub total_clicks: u64,
    pub last_click_at: Option<DateTime<Utc>>,
    pub clicks: Vec<ClickSummary>,
}
