//! Table definitions. Each entity owns its DDL; `DB::migrate` applies them in
//! dependency order.

use const_format::formatcp;

pub const URLS_TABLE_NAME: &str = "urls";
pub const CLICKS_TABLE_NAME: &str = "clicks";

pub const CREATE_URLS_TABLE_QUERY: &str = formatcp!(
    r#"
    CREATE TABLE IF NOT EXISTS {URLS_TABLE_NAME} (
        id bigserial PRIMARY KEY,
        code varchar(16) NOT NULL UNIQUE,
        original_url text NOT NULL,
        created_at timestamptz NOT NULL,
        expires_at timestamptz,
        custom boolean NOT NULL DEFAULT false
    )
"#,
);

pub const CREATE_CLICKS_TABLE_QUERY: &str = formatcp!(
    r#"
    CREATE TABLE IF NOT EXISTS {CLICKS_TABLE_NAME} (
        id bigserial PRIMARY KEY,
        url_id bigint NOT NULL REFERENCES {URLS_TABLE_NAME} (id) ON DELETE CASCADE,
        occurred_at timestamptz NOT NULL,
        ip varchar(64),
        user_agent varchar(256),
        referer varchar(256)
    )
"#,
);

pub const CREATE_CLICKS_INDEX_QUERY: &str = formatcp!(
    r#"
    CREATE INDEX IF NOT EXISTS {CLICKS_TABLE_NAME}_url_id_occurred_at_idx
        ON {CLICKS_TABLE_NAME} (url_id, occurred_at)
"#,
);

pub const MIGRATIONS: &[(&str, &str)] = &[
    (URLS_TABLE_NAME, CREATE_URLS_TABLE_QUERY),
    (CLICKS_TABLE_NAME, CREATE_CLICKS_TABLE_QUERY),
    (CLICKS_TABLE_NAME, CREATE_CLICKS_INDEX_QUERY),
];
