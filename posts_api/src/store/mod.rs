use std::future::Future;

use thiserror::Error;

use crate::models::{Post, PostId};
use crate::token::TokenHash;

#[cfg(test)]
pub mod memory;
pub mod supabase;

pub use supabase::SupabaseStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    Config(String),
    /// Carries no request URL; see the `From` impl below.
    #[error(transparent)]
    Transport(reqwest::Error),
    /// The store answered with an error; `message` is its own wording.
    #[error("{message}")]
    Response { status: u16, message: String },
    #[error("unexpected store response: {0}")]
    Decode(#[from] serde_json::Error),
}

// Transport error text reaches API clients, so the store URL and its
// query string are stripped here.
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// The persistence operations the delete endpoint needs.
pub trait PostStore: Send + Sync + 'static {
    /// Fetches the id and stored token hash of a post, or `None` when no
    /// post has that id.
    fn fetch_by_id(
        &self,
        id: PostId,
    ) -> impl Future<Output = Result<Option<Post>, StoreError>> + Send;

    /// Deletes the post with `id`, provided its stored hash still equals
    /// `expected_hash`. Returns whether a row was removed.
    fn delete_by_id(
        &self,
        id: PostId,
        expected_hash: &TokenHash,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
