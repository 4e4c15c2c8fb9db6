use crate::domain::models::{Click, Link, NewClick, NewLink};
use anyhow::Result;

pub trait LinkRepository {
    /// Inserts `link` unless its code is already taken, in which case `None`
    /// is returned and nothing is written. The check and the write are atomic.
    async fn insert_link(&self, link: NewLink) -> Result<Option<Link>>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>>;

    /// Removes the link and every click recorded against it.
    async fn delete_by_code(&self, code: &str) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

pub trait ClickRepository {
    /// Appends a click. `None` when the owning link no longer exists.
    async fn insert_click(&self, click: NewClick) -> Result<Option<Click>>;

    /// The link behind `code` together with all of its clicks, read from one
    /// consistent view of the store.
    async fn link_with_clicks(&self, code: &str) -> Result<Option<(Link, Vec<Click>)>>;
}

/// Everything the usecases need from a store.
pub trait Repository: LinkRepository + ClickRepository {}

impl<T: LinkRepository + ClickRepository> Repository for T {}
