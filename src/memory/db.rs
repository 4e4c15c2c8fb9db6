use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use anyhow::Result;
use tokio::sync::RwLock;

use crate::domain::{
    models::{Click, Link, NewClick, NewLink},
    repository::{ClickRepository, LinkRepository},
};

#[derive(Default)]
struct Tables {
    links: HashMap<String, Link>,
    link_ids: HashSet<i64>,
    // keyed by link id, append-only
    clicks: HashMap<i64, Vec<Click>>,
    next_link_id: i64,
    next_click_id: i64,
}

/// Process-local store with the same guarantees as the postgres one:
/// unique codes, clicks bound to a live link, cascade on delete.
#[derive(Default)]
pub struct DB {
    tables: RwLock<Tables>,
}

impl DB {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkRepository for Arc<DB> {
    async fn insert_link(&self, link: NewLink) -> Result<Option<Link>> {
        let mut tables = self.tables.write().await;
        if tables.links.contains_key(link.code.as_str()) {
            return Ok(None);
        }

        tables.next_link_id += 1;
        let stored = Link {
            id: tables.next_link_id,
            code: link.code,
            original_url: link.original_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            custom: link.custom,
        };
        tables.link_ids.insert(stored.id);
        tables
            .links
            .insert(stored.code.0.clone(), stored.clone());
        Ok(Some(stored))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        Ok(self.tables.read().await.links.get(code).cloned())
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(link) = tables.links.remove(code) else {
            return Ok(false);
        };
        tables.link_ids.remove(&link.id);
        tables.clicks.remove(&link.id);
        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

impl ClickRepository for Arc<DB> {
    async fn insert_click(&self, click: NewClick) -> Result<Option<Click>> {
        let mut tables = self.tables.write().await;
        if !tables.link_ids.contains(&click.link_id) {
            return Ok(None);
        }

        tables.next_click_id += 1;
        let stored = Click {
            id: tables.next_click_id,
            link_id: click.link_id,
            occurred_at: click.occurred_at,
            ip: click.ip,
            user_agent: click.user_agent,
            referer: click.referer,
        };
        tables
            .clicks
            .entry(stored.link_id)
            .or_default()
            .push(stored.clone());
        Ok(Some(stored))
    }

    async fn link_with_clicks(&self, code: &str) -> Result<Option<(Link, Vec<Click>)>> {
        let tables = self.tables.read().await;
        let Some(link) = tables.links.get(code) else {
            return Ok(None);
        };
        let clicks = tables.clicks.get(&link.id).cloned().unwrap_or_default();
        Ok(Some((link.clone(), clicks)))
    }
}
