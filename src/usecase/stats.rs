use crate::{
    domain::{code::Code, error::DomainError, models::StatsView, repository::Repository},
    usecase::usecase::Usecase,
};

impl<R: Repository> Usecase<R> {
    /// Click totals and history for `code`. Count, last click and the list
    /// all come from the same read, so they always agree.
    pub async fn stats(&self, code: &str) -> Result<StatsView, DomainError> {
        if !Code::is_well_formed(code) {
            return Err(DomainError::NotFound);
        }

        let (link, clicks) = self
            .bounded("link_with_clicks", self.repo.link_with_clicks(code))
            .await?
            .ok_or(DomainError::NotFound)?;

        Ok(StatsView::from_snapshot(link, clicks))
    }
}
