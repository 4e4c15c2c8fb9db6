use std::{str::FromStr, sync::Arc, time::Duration};

use crate::{
    domain::{
        code::Code,
        models::{Click, Link, NewClick, NewLink},
        repository::{ClickRepository, LinkRepository},
    },
    postgres::{
        config::Config,
        schema::{CLICKS_TABLE_NAME, MIGRATIONS, URLS_TABLE_NAME},
    },
};
use anyhow::{Result, anyhow};
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use const_format::formatcp;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_pg_mapper::FromTokioPostgresRow;
use tokio_pg_mapper_derive::PostgresMapper;
use tokio_postgres::{IsolationLevel, NoTls, Row, error::SqlState};
use url::Url;

const LINK_COLUMNS: &str = "id, code, original_url, created_at, expires_at, custom";
const CLICK_COLUMNS: &str = "id, url_id, occurred_at, ip, user_agent, referer";

const INSERT_LINK_QUERY: &str = formatcp!(
    r#"
    INSERT INTO {URLS_TABLE_NAME} (code, original_url, created_at, expires_at, custom)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (code) DO NOTHING
    RETURNING {LINK_COLUMNS}
"#,
);
const FIND_LINK_QUERY: &str = formatcp!(
    r#"
    SELECT {LINK_COLUMNS} FROM {URLS_TABLE_NAME} WHERE code = $1
"#,
);
const DELETE_LINK_QUERY: &str = formatcp!(
    r#"
    DELETE FROM {URLS_TABLE_NAME} WHERE code = $1
"#,
);
const INSERT_CLICK_QUERY: &str = formatcp!(
    r#"
    INSERT INTO {CLICKS_TABLE_NAME} (url_id, occurred_at, ip, user_agent, referer)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING {CLICK_COLUMNS}
"#,
);
const LIST_CLICKS_QUERY: &str = formatcp!(
    r#"
    SELECT {CLICK_COLUMNS} FROM {CLICKS_TABLE_NAME}
    WHERE url_id = $1
    ORDER BY occurred_at ASC, id ASC
"#,
);

#[derive(PostgresMapper)]
#[pg_mapper(table = "urls")]
struct LinkRow {
    id: i64,
    code: String,
    original_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    custom: bool,
}

impl TryFrom<LinkRow> for Link {
    type Error = anyhow::Error;

    fn try_from(row: LinkRow) -> Result<Self> {
        Ok(Link {
            id: row.id,
            code: Code::new(row.code),
            original_url: Url::parse(&row.original_url)?,
            created_at: row.created_at,
            expires_at: row.expires_at,
            custom: row.custom,
        })
    }
}

#[derive(PostgresMapper)]
#[pg_mapper(table = "clicks")]
struct ClickRow {
    id: i64,
    url_id: i64,
    occurred_at: DateTime<Utc>,
    ip: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
}

impl From<ClickRow> for Click {
    fn from(row: ClickRow) -> Self {
        Click {
            id: row.id,
            link_id: row.url_id,
            occurred_at: row.occurred_at,
            ip: row.ip,
            user_agent: row.user_agent,
            referer: row.referer,
        }
    }
}

fn link_from_row(row: &Row) -> Result<Link> {
    LinkRow::from_row_ref(row)?.try_into()
}

fn click_from_row(row: &Row) -> Result<Click> {
    Ok(ClickRow::from_row_ref(row)?.into())
}

pub struct DB {
    pub pool: Pool,
}

impl DB {
    pub async fn new(config: Config) -> Result<Self> {
        let dsn = config
            .dsn
            .as_deref()
            .ok_or_else(|| anyhow!("POSTGRES_DSN must be set for the postgres store"))?;
        let pg_config = tokio_postgres::Config::from_str(dsn)?;
        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager).max_size(config.pool_size).build()?;
        let db = Self { pool };

        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(5))
            .with_factor(2.0)
            .with_jitter()
            .with_max_times(5);

        (|| async { db.migrate().await })
            .retry(retry_policy)
            .sleep(tokio::time::sleep)
            .notify(|err, dur| {
                tracing::warn!(error = %err, retry_in = ?dur, "Postgres not ready, retrying");
            })
            .await?;

        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        let client = self.pool.get().await?;
        for (table, query) in MIGRATIONS {
            client
                .batch_execute(query)
                .await
                .map_err(|e| anyhow!("Failed to migrate table '{}': {}", table, e))?;
        }
        tracing::debug!("Postgres schema is up to date");
        Ok(())
    }
}

impl LinkRepository for Arc<DB> {
    async fn insert_link(&self, link: NewLink) -> Result<Option<Link>> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(INSERT_LINK_QUERY).await?;
        let row = client
            .query_opt(
                &stmt,
                &[
                    &link.code.as_str(),
                    &link.original_url.as_str(),
                    &link.created_at,
                    &link.expires_at,
                    &link.custom,
                ],
            )
            .await?;

        row.as_ref().map(link_from_row).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(FIND_LINK_QUERY).await?;
        let row = client.query_opt(&stmt, &[&code]).await?;

        row.as_ref().map(link_from_row).transpose()
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(DELETE_LINK_QUERY).await?;
        let deleted = client.execute(&stmt, &[&code]).await?;
        Ok(deleted > 0)
    }

    async fn ping(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }
}

impl ClickRepository for Arc<DB> {
    async fn insert_click(&self, click: NewClick) -> Result<Option<Click>> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(INSERT_CLICK_QUERY).await?;
        let result = client
            .query_one(
                &stmt,
                &[
                    &click.link_id,
                    &click.occurred_at,
                    &click.ip,
                    &click.user_agent,
                    &click.referer,
                ],
            )
            .await;

        match result {
            Ok(row) => click_from_row(&row).map(Some),
            // the link was deleted between lookup and insert
            Err(e) if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn link_with_clicks(&self, code: &str) -> Result<Option<(Link, Vec<Click>)>> {
        let mut client = self.pool.get().await?;
        let tx = client
            .build_transaction()
            .isolation_level(IsolationLevel::RepeatableRead)
            .read_only(true)
            .start()
            .await?;

        let find = tx.prepare_cached(FIND_LINK_QUERY).await?;
        let Some(row) = tx.query_opt(&find, &[&code]).await? else {
            tx.commit().await?;
            return Ok(None);
        };
        let link = link_from_row(&row)?;

        let list = tx.prepare_cached(LIST_CLICKS_QUERY).await?;
        let clicks = tx
            .query(&list, &[&link.id])
            .await?
            .iter()
            .map(click_from_row)
            .collect::<Result<Vec<_>>>()?;

        tx.commit().await?;
        Ok(Some((link, clicks)))
    }
}
