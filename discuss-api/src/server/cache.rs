//! Rendered page bodies keyed by their display path.

use axum::body::Bytes;
use discuss_common::port::PathCache;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct PageCache {
    inner: RwLock<Pages>,
}

#[derive(Debug, Default)]
struct Pages {
    by_path: HashMap<String, Bytes>,
    generation: u64,
}

/// Snapshot of the cache state taken before rendering a page.
///
/// A page rendered from data read after an invalidation may not be stored with a
/// ticket taken before it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RenderTicket(u64);

impl PageCache {
    pub async fn get(&self, path: &str) -> Option<Bytes> {
        self.inner.read().await.by_path.get(path).cloned()
    }

    pub async fn ticket(&self) -> RenderTicket {
        RenderTicket(self.inner.read().await.generation)
    }

    /// Stores a rendered page unless the cache was invalidated since `ticket` was taken.
    pub async fn insert(&self, ticket: RenderTicket, path: String, page: Bytes) -> bool {
        let mut pages = self.inner.write().await;
        if pages.generation != ticket.0 {
            debug!(path, "Discarding page rendered before an invalidation");
            return false;
        }

        pages.by_path.insert(path, page);
        true
    }
}

impl PathCache for PageCache {
    async fn invalidate(&self, path: &str) {
        let mut pages = self.inner.write().await;
        pages.generation = pages.generation.wrapping_add(1);
        if pages.by_path.remove(path).is_some() {
            debug!(path, "Invalidated cached page");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::server::cache::PageCache;
    use axum::body::Bytes;
    use discuss_common::port::PathCache;

    #[tokio::test]
    async fn insert_get_invalidate() {
        let cache = PageCache::default();
        let ticket = cache.ticket().await;

        assert!(
            cache
                .insert(ticket, "/topics/general".to_owned(), Bytes::from_static(b"{}"))
                .await
        );
        assert_eq!(
            cache.get("/topics/general").await,
            Some(Bytes::from_static(b"{}"))
        );
        assert_eq!(cache.get("/topics/other").await, None);

        cache.invalidate("/topics/general").await;
        assert_eq!(cache.get("/topics/general").await, None);
    }

    #[tokio::test]
    async fn stale_render_is_not_stored() {
        let cache = PageCache::default();
        let ticket = cache.ticket().await;

        cache.invalidate("/topics/general").await;

        assert!(
            !cache
                .insert(ticket, "/topics/general".to_owned(), Bytes::from_static(b"{}"))
                .await
        );
        assert_eq!(cache.get("/topics/general").await, None);
    }

    #[tokio::test]
    async fn invalidating_one_path_keeps_others() {
        let cache = PageCache::default();
        let ticket = cache.ticket().await;
        cache
            .insert(ticket, "/topics/rust".to_owned(), Bytes::from_static(b"[]"))
            .await;

        cache.invalidate("/topics/general").await;

        assert!(cache.get("/topics/rust").await.is_some());
    }
}
