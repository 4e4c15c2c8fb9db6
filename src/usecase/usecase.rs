use std::future::Future;

use crate::{
    domain::{error::DomainError, repository::Repository},
    usecase::config::Config,
};

pub struct Usecase<R: Repository> {
    pub(crate) repo: R,
    pub(crate) config: Config,
}

impl<R: Repository> Usecase<R> {
    pub fn new(repo: R, config: Config) -> Self {
        Usecase { repo, config }
    }

    pub async fn ready(&self) -> Result<(), DomainError> {
        self.bounded("ping", self.repo.ping()).await
    }

    /// Runs one store call under the configured timeout.
    pub(crate) async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.config.store_timeout(), fut)
            .await
            .map_err(|_| DomainError::Timeout(op))?
            .map_err(DomainError::Store)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::usecase::testing::{TestRepo, usecase};

    #[tokio::test]
    async fn test_ready() {
        let uc = usecase(TestRepo::default());
        assert!(uc.ready().await.is_ok());
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let uc = usecase(TestRepo::default());
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), anyhow::Error>(())
        };

        let err = uc.bounded("slow", slow).await.unwrap_err();
        assert!(matches!(err, DomainError::Timeout("slow")));
    }
}
