use chrono::Utc;

use crate::{
    domain::{
        error::DomainError,
        models::{Click, NewClick, RequestMeta},
        repository::Repository,
    },
    usecase::usecase::Usecase,
};

impl<R: Repository> Usecase<R> {
    /// Appends one click for `link_id`. Fails with `NotFound` if the link has
    /// been deleted in the meantime.
    pub async fn record_click(
        &self,
        link_id: i64,
        meta: RequestMeta,
    ) -> Result<Click, DomainError> {
        let meta = meta.bounded();
        let click = NewClick {
            link_id,
            occurred_at: Utc::now(),
            ip: meta.ip,
            user_agent: meta.user_agent,
            referer: meta.referer,
        };

        self.bounded("insert_click", self.repo.insert_click(click))
            .await?
            .ok_or(DomainError::NotFound)
    }
}
