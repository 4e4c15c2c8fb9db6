use std::{sync::Arc, time::Duration};

use anyhow::{Result, anyhow};

use crate::{
    domain::{
        models::{Click, Link, NewClick, NewLink},
        repository::{ClickRepository, LinkRepository},
    },
    memory::db::DB,
    usecase::{config::Config, usecase::Usecase},
};

/// Memory store with switches for the failure modes a real store can hit.
#[derive(Clone, Default)]
pub struct TestRepo {
    pub db: Arc<DB>,
    pub always_conflict: bool,
    pub fail_clicks: bool,
    pub click_delay: Option<Duration>,
}

pub fn usecase(repo: TestRepo) -> Usecase<TestRepo> {
    Usecase::new(
        repo,
        Config {
            store_timeout_ms: 50,
            ..Config::default()
        },
    )
}

impl LinkRepository for TestRepo {
    async fn insert_link(&self, link: NewLink) -> Result<Option<Link>> {
        if self.always_conflict {
            return Ok(None);
        }
        self.db.insert_link(link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        self.db.find_by_code(code).await
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool> {
        self.db.delete_by_code(code).await
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}

impl ClickRepository for TestRepo {
    async fn insert_click(&self, click: NewClick) -> Result<Option<Click>> {
        if let Some(delay) = self.click_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_clicks {
            return Err(anyhow!("clicks table unavailable"));
        }
        self.db.insert_click(click).await
    }

    async fn link_with_clicks(&self, code: &str) -> Result<Option<(Link, Vec<Click>)>> {
        self.db.link_with_clicks(code).await
    }
}
