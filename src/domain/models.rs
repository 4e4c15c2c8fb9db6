use crate::domain::code::Code;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

pub const MAX_IP_LEN: usize = 64;
pub const MAX_USER_AGENT_LEN: usize = 256;
pub const MAX_REFERER_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub code: Code, // pathになる
    pub original_url: Url,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub custom: bool,
}

impl Link {
    /// A link is gone from the instant its expiry is reached, so the boundary
    /// instant itself counts as expired and a zero TTL never resolves.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: Code,
    pub original_url: Url,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub custom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Client details captured from a redirect request.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl RequestMeta {
    /// Cuts every field down to its column width.
    pub fn bounded(self) -> Self {
        Self {
            ip: self.ip.map(|s| truncate(s, MAX_IP_LEN)),
            user_agent: self.user_agent.map(|s| truncate(s, MAX_USER_AGENT_LEN)),
            referer: self.referer.map(|s| truncate(s, MAX_REFERER_LEN)),
        }
    }
}

fn truncate(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Redirect(Url),
    NotFound,
    Expired { expires_at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickSummary {
    pub click_id: i64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub link: Link,
    pub total_clicks: u64,
    pub last_click_at: Option<DateTime<Utc>>,
    pub clicks: Vec<ClickSummary>,
}

impl StatsView {
    /// Builds the view from one read of a link's click log.
    pub fn from_snapshot(link: Link, mut clicks: Vec<Click>) -> Self {
        clicks.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at).then(a.id.cmp(&b.id)));
        let clicks: Vec<ClickSummary> = clicks
            .into_iter()
            .map(|c| ClickSummary {
                click_id: c.id,
                time: c.occurred_at,
            })
            .collect();

        Self {
            link,
            total_clicks: clicks.len() as u64,
            last_click_at: clicks.last().map(|c| c.time),
            clicks,
        }
    }
}
