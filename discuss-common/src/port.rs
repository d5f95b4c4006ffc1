//! Capabilities actions need from the outside world.
//!
//! Actions are generic over these so tests can hand in in-memory fakes.

use crate::model::{
    auth::Session,
    post::{CreatePost, PartialPost},
    topic::Topic,
};
use thiserror::Error;

/// A failure reported by a [`ForumStore`].
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum StoreError {
    #[error("{0}")]
    Described(String),
    #[error("The store failed without a message")]
    Unknown,
}

impl StoreError {
    /// The underlying message, if the failure carried one worth showing.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            StoreError::Described(message) if !message.is_empty() => Some(message.as_str()),
            StoreError::Described(_) | StoreError::Unknown => None,
        }
    }
}

pub trait SessionResolver: Send + Sync {
    /// The session of the current caller. Lookup failures resolve to `None`.
    fn resolve(&self) -> impl Future<Output = Option<Session>> + Send;
}

pub trait ForumStore: Send + Sync {
    /// First topic with the given slug. Slugs are unique in the database store.
    fn find_topic_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Topic>, StoreError>> + Send;

    fn create_post(
        &self,
        post: &CreatePost,
    ) -> impl Future<Output = Result<PartialPost, StoreError>> + Send;
}

pub trait PathCache: Send + Sync {
    /// Drops whatever is cached for `path` so the next read recomputes it.
    fn invalidate(&self, path: &str) -> impl Future<Output = ()> + Send;
}
