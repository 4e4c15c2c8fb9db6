//! Store tests against a live database. Run with
//! `POSTGRES_DSN=postgres://... cargo test -- --ignored`.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use url::Url;

use clicklink::{
    domain::{
        code::Code,
        models::{NewClick, NewLink},
        repository::{ClickRepository, LinkRepository},
    },
    postgres::{config::Config, db::DB},
};

async fn connect() -> Arc<DB> {
    let config = Config {
        dsn: std::env::var("POSTGRES_DSN").ok(),
        pool_size: 4,
    };
    Arc::new(DB::new(config).await.expect("Failed to connect to Postgres"))
}

fn unique_code() -> Code {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    Code::generate(&nanos.to_string(), 12)
}

fn new_link(code: &Code) -> NewLink {
    NewLink {
        code: code.clone(),
        original_url: Url::parse("https://example.com/a").unwrap(),
        created_at: Utc::now(),
        expires_at: Some(Utc::now() + TimeDelta::hours(1)),
        custom: false,
    }
}

fn new_click(link_id: i64) -> NewClick {
    NewClick {
        link_id,
        occurred_at: Utc::now(),
        ip: Some("203.0.113.7".to_string()),
        user_agent: Some("curl/8.5.0".to_string()),
        referer: None,
    }
}

#[tokio::test]
#[ignore = "requires POSTGRES_DSN"]
async fn test_unique_code_constraint() {
    let db = connect().await;
    let code = unique_code();

    let first = db.insert_link(new_link(&code)).await.unwrap();
    let second = db.insert_link(new_link(&code)).await.unwrap();

    let first = first.unwrap();
    assert_eq!(first.code, code);
    assert!(second.is_none());
    assert_eq!(db.find_by_code(code.as_str()).await.unwrap(), Some(first));

    db.delete_by_code(code.as_str()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires POSTGRES_DSN"]
async fn test_clicks_snapshot_and_cascade() {
    let db = connect().await;
    let code = unique_code();
    let link = db.insert_link(new_link(&code)).await.unwrap().unwrap();

    for _ in 0..3 {
        assert!(db.insert_click(new_click(link.id)).await.unwrap().is_some());
    }
    let (stored, clicks) = db.link_with_clicks(code.as_str()).await.unwrap().unwrap();
    assert_eq!(stored.id, link.id);
    assert_eq!(clicks.len(), 3);
    assert!(clicks.windows(2).all(|w| w[0].occurred_at <= w[1].occurred_at));

    assert!(db.delete_by_code(code.as_str()).await.unwrap());
    assert!(db.link_with_clicks(code.as_str()).await.unwrap().is_none());
    assert!(db.insert_click(new_click(link.id)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires POSTGRES_DSN"]
async fn test_ping() {
    let db = connect().await;
    assert!(db.ping().await.is_ok());
}
