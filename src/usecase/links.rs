use chrono::{TimeDelta, Utc};
use url::Url;

use crate::{
    domain::{
        code::Code,
        error::DomainError,
        models::{Link, NewLink},
        repository::Repository,
    },
    usecase::usecase::Usecase,
};

/// Accepts absolute http(s) URLs only.
pub fn parse_url(raw: &str) -> Result<Url, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::Validation(
            "The 'url' parameter is required.".to_string(),
        ));
    }

    let url = Url::parse(raw)
        .map_err(|e| DomainError::Validation(format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::Validation(format!(
            "Unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    if url.host().is_none() {
        return Err(DomainError::Validation("URL must have a host.".to_string()));
    }
    Ok(url)
}

impl<R: Repository> Usecase<R> {
    /// Stores a new link for `original_url`, probing salted codes until the
    /// store accepts one. `expires_in_minutes` overrides the default TTL.
    pub async fn create_link(
        &self,
        original_url: &str,
        expires_in_minutes: Option<i64>,
    ) -> Result<Link, DomainError> {
        let original_url = parse_url(original_url)?;
        let created_at = Utc::now();

        let ttl = match expires_in_minutes {
            Some(minutes) if minutes < 0 => {
                return Err(DomainError::Validation(
                    "expires_in must not be negative.".to_string(),
                ));
            }
            Some(minutes) => Some(TimeDelta::try_minutes(minutes).ok_or_else(|| {
                DomainError::Validation("expires_in is too large.".to_string())
            })?),
            None => self.config.default_ttl(),
        };
        let expires_at = match ttl {
            Some(ttl) => Some(created_at.checked_add_signed(ttl).ok_or_else(|| {
                DomainError::Validation("expires_in is too large.".to_string())
            })?),
            None => None,
        };

        for attempt in 0..self.config.max_code_attempts {
            let code =
                Code::generate_salted(original_url.as_str(), self.config.code_length, attempt);
            let new_link = NewLink {
                code: code.clone(),
                original_url: original_url.clone(),
                created_at,
                expires_at,
                custom: false,
            };

            if let Some(link) = self
                .bounded("insert_link", self.repo.insert_link(new_link))
                .await?
            {
                return Ok(link);
            }
            tracing::debug!(
                event = "code_collision",
                code = code.as_str(),
                attempt,
                "Code already taken"
            );
        }

        tracing::error!(
            event = "code_space_exhausted",
            attempts = self.config.max_code_attempts,
            original_url = original_url.as_str(),
            "No free code left for URL"
        );
        Err(DomainError::CodeSpaceExhausted(
            self.config.max_code_attempts,
        ))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Link>, DomainError> {
        if !Code::is_well_formed(code) {
            return Ok(None);
        }
        self.bounded("find_by_code", self.repo.find_by_code(code))
            .await
    }

    /// Deletes the link and, with it, its click log.
    pub async fn delete_link(&self, code: &str) -> Result<(), DomainError> {
        if !Code::is_well_formed(code) {
            return Err(DomainError::NotFound);
        }
        match self
            .bounded("delete_by_code", self.repo.delete_by_code(code))
            .await?
        {
            true => Ok(()),
            false => Err(DomainError::NotFound),
        }
    }
}
