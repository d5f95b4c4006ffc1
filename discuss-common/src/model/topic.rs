use crate::model::Id;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::Display;
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct TopicMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Topic {
    pub id: Id<TopicMarker>,
    pub slug: TopicSlug,
    pub description: String,
}

/// URL-safe topic name: lowercase ASCII letters, digits and hyphens, never empty.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct TopicSlug(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The topic slug is invalid: {0:?}")]
pub struct InvalidTopicSlugError(String);

impl TopicSlug {
    pub fn new(slug: String) -> Result<Self, InvalidTopicSlugError> {
        if Self::is_valid(&slug) {
            Ok(Self(slug))
        } else {
            Err(InvalidTopicSlugError(slug))
        }
    }

    #[must_use]
    pub fn is_valid(slug: &str) -> bool {
        !slug.is_empty()
            && slug
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Display for TopicSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TopicSlug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        TopicSlug::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"a topic slug"))
    }
}
