use chrono::Utc;

use crate::{
    domain::{
        error::DomainError,
        models::{RequestMeta, Resolution},
        repository::Repository,
    },
    usecase::usecase::Usecase,
};

impl<R: Repository> Usecase<R> {
    /// Looks up `code`, applies the expiry check and records the visit.
    ///
    /// Click logging never blocks the redirect: if it fails or times out the
    /// failure is logged and the target is returned anyway.
    pub async fn resolve(&self, code: &str, meta: RequestMeta) -> Result<Resolution, DomainError> {
        let Some(link) = self.find_by_code(code).await? else {
            return Ok(Resolution::NotFound);
        };

        let now = Utc::now();
        if let Some(expires_at) = link.expires_at {
            if link.is_expired_at(now) {
                return Ok(Resolution::Expired { expires_at });
            }
        }

        if let Err(err) = self.record_click(link.id, meta).await {
            let err = DomainError::RecordingFailure(err.to_string());
            tracing::warn!(
                event = "click_recording_failed",
                code = link.code.as_str(),
                error = %err
            );
        }

        Ok(Resolution::Redirect(link.original_url))
    }
}
