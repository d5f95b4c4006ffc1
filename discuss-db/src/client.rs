use crate::record::{AuthenticationRecord, FullPostRecord, TopicRecord, UserRecord};
use discuss_common::model::{
    Id, ModelValidationError,
    auth::{Authentication, SessionTokenHash},
    post::{CreatePost, PartialPost, Post, PostMarker},
    topic::{Topic, TopicMarker},
    user::{User, UserMarker},
};
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions, query_as, query_scalar};
use thiserror::Error;
use tracing::debug;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("Migrating the database failed: {0}")]
    Migrate(#[from] MigrateError),
}

#[derive(Debug, Clone)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        debug!("Database migrations applied");

        Ok(())
    }

    pub async fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(
            "
            SELECT
                users.user_id,
                users.handle
            FROM
                users.users
            WHERE
                users.user_id = $1
            ",
        )
        .bind(user_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let user = record.map(User::try_from).transpose()?;
        Ok(user)
    }

    pub async fn fetch_auth(&self, token_hash: &SessionTokenHash) -> Result<Option<Authentication>> {
        let record = query_as::<_, AuthenticationRecord>(
            "
            SELECT
                authentications.user_id,
                authentications.token_hash,
                authentications.created_at,
                authentications.expires_after_seconds
            FROM
                users.authentications
            WHERE
                authentications.token_hash = $1
            ",
        )
        .bind(token_hash.0.as_slice())
        .fetch_optional(&self.pool)
        .await?;

        let authentication = record.map(Authentication::try_from).transpose()?;
        Ok(authentication)
    }

    pub async fn fetch_topic_by_slug(&self, slug: &str) -> Result<Option<Topic>> {
        let record = query_as::<_, TopicRecord>(
            "
            SELECT
                topics.topic_id,
                topics.slug,
                topics.description
            FROM
                topics.topics
            WHERE
                topics.slug = $1
            LIMIT 1
            ",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        let topic = record.map(Topic::try_from).transpose()?;
        Ok(topic)
    }

    /// All posts of a topic, newest first.
    pub async fn fetch_topic_posts(&self, topic_id: Id<TopicMarker>) -> Result<Vec<Post>> {
        let records = query_as::<_, FullPostRecord>(
            "
            SELECT
                posts.post_id,
                posts.topic_id,
                posts.title,
                posts.content,
                users.user_id,
                users.handle
            FROM
                posts.posts NATURAL JOIN users.users
            WHERE
                posts.topic_id = $1
            ORDER BY
                posts.created_at DESC,
                posts.post_id DESC
            ",
        )
        .bind(topic_id.get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;
        Ok(posts)
    }

    pub async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, FullPostRecord>(
            "
            SELECT
                posts.post_id,
                posts.topic_id,
                posts.title,
                posts.content,
                users.user_id,
                users.handle
            FROM
                posts.posts NATURAL JOIN users.users
            WHERE
                posts.post_id = $1
            ",
        )
        .bind(post_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    pub async fn create_post(&self, post: &CreatePost) -> Result<PartialPost> {
        let returned_id = query_scalar::<_, i64>(
            "
            INSERT INTO posts.posts (topic_id, user_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING posts.post_id
            ",
        )
        .bind(post.topic_id.get().cast_signed())
        .bind(post.author_id.get().cast_signed())
        .bind(&post.content.title)
        .bind(&post.content.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(PartialPost {
            id: returned_id.cast_unsigned().into(),
            topic_id: post.topic_id,
            author_id: post.author_id,
            content: post.content.clone(),
        })
    }
}
