use discuss_common::model::{
    ModelValidationError,
    auth::Authentication,
    post::{Post, PostContent},
    topic::{Topic, TopicSlug},
    user::{User, UserHandle},
};
use sqlx::FromRow;
use time::{Duration, PrimitiveDateTime};

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct UserRecord {
    pub user_id: i64,
    pub handle: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct TopicRecord {
    pub topic_id: i64,
    pub slug: String,
    pub description: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, FromRow)]
pub(crate) struct FullPostRecord {
    pub post_id: i64,
    pub topic_id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub handle: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct AuthenticationRecord {
    pub user_id: i64,
    pub token_hash: Vec<u8>,
    pub created_at: PrimitiveDateTime,
    pub expires_after_seconds: Option<i64>,
}

impl TryFrom<UserRecord> for User {
    type Error = ModelValidationError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.user_id.cast_unsigned().into(),
            handle: UserHandle::new(value.handle)?,
        })
    }
}

impl TryFrom<TopicRecord> for Topic {
    type Error = ModelValidationError;

    fn try_from(value: TopicRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.topic_id.cast_unsigned().into(),
            slug: TopicSlug::new(value.slug)?,
            description: value.description,
        })
    }
}

impl TryFrom<FullPostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: FullPostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_id.cast_unsigned().into(),
            topic_id: value.topic_id.cast_unsigned().into(),
            author: User {
                id: value.user_id.cast_unsigned().into(),
                handle: UserHandle::new(value.handle)?,
            },
            content: PostContent {
                title: value.title,
                content: value.content,
            },
        })
    }
}

impl TryFrom<AuthenticationRecord> for Authentication {
    type Error = ModelValidationError;

    fn try_from(value: AuthenticationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user: value.user_id.cast_unsigned().into(),
            token_hash: value.token_hash.try_into()?,
            created_at: value.created_at.as_utc(),
            expires_after: value
                .expires_after_seconds
                .map(|seconds| Duration::seconds(seconds).try_into())
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::record::{AuthenticationRecord, FullPostRecord, TopicRecord};
    use discuss_common::model::{
        ModelValidationError, auth::Authentication, post::Post, topic::Topic,
    };
    use time::macros::datetime;

    #[test]
    fn topic_record_with_bad_slug_is_rejected() {
        let record = TopicRecord {
            topic_id: 1,
            slug: "Not A Slug".to_owned(),
            description: String::new(),
        };
        assert!(matches!(
            Topic::try_from(record),
            Err(ModelValidationError::TopicSlug(_))
        ));
    }

    #[test]
    fn post_record_conversion() {
        let post = Post::try_from(FullPostRecord {
            post_id: 42,
            topic_id: 2,
            title: "Valid Title".to_owned(),
            content: "This is long enough content.".to_owned(),
            user_id: 9,
            handle: "ferris".to_owned(),
        })
        .unwrap();

        assert_eq!(u64::from(post.id), 42);
        assert_eq!(u64::from(post.topic_id), 2);
        assert_eq!(post.author.handle.get(), "ferris");
        assert_eq!(post.content.title, "Valid Title");
    }

    #[test]
    fn authentication_record_validation() {
        let record = AuthenticationRecord {
            user_id: 9,
            token_hash: vec![0; 32],
            created_at: datetime!(2025-06-01 12:00),
            expires_after_seconds: Some(3600),
        };
        assert!(Authentication::try_from(record.clone()).is_ok());

        let short_hash = AuthenticationRecord {
            token_hash: vec![0; 3],
            ..record.clone()
        };
        assert!(matches!(
            Authentication::try_from(short_hash),
            Err(ModelValidationError::TokenHash(_))
        ));

        let negative_expiry = AuthenticationRecord {
            expires_after_seconds: Some(-1),
            ..record
        };
        assert!(matches!(
            Authentication::try_from(negative_expiry),
            Err(ModelValidationError::NonPositiveDuration(_))
        ));
    }
}
