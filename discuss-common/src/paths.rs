//! Display paths of forum pages. These double as page cache keys.

use crate::model::{Id, post::PostMarker};
use std::fmt::Display;

#[must_use]
pub fn topic_show(topic_slug: &str) -> String {
    format!("/topics/{topic_slug}")
}

#[must_use]
pub fn post_create(topic_slug: &str) -> String {
    format!("/topics/{topic_slug}/posts/new")
}

#[must_use]
pub fn post_show(topic_slug: &str, post_id: Id<PostMarker>) -> String {
    format!("/topics/{topic_slug}/posts/{post_id}")
}

/// Where to send the client after an action completed.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct NavigationTarget(String);

impl NavigationTarget {
    #[must_use]
    pub fn new(path: String) -> Self {
        Self(path)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NavigationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::Id, paths};

    #[test]
    fn paths() {
        assert_eq!(paths::topic_show("general"), "/topics/general");
        assert_eq!(paths::post_create("general"), "/topics/general/posts/new");
        assert_eq!(
            paths::post_show("general", Id::new(42)),
            "/topics/general/posts/42"
        );
    }
}
