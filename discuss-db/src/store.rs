use crate::client::{DbClient, DbError};
use discuss_common::{
    model::{
        post::{CreatePost, PartialPost},
        topic::Topic,
    },
    port::{ForumStore, StoreError},
};

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlx(sqlx::Error::Database(err)) => {
                StoreError::Described(err.message().to_owned())
            }
            other => StoreError::Described(other.to_string()),
        }
    }
}

impl ForumStore for DbClient {
    async fn find_topic_by_slug(&self, slug: &str) -> Result<Option<Topic>, StoreError> {
        Ok(self.fetch_topic_by_slug(slug).await?)
    }

    async fn create_post(&self, post: &CreatePost) -> Result<PartialPost, StoreError> {
        Ok(DbClient::create_post(self, post).await?)
    }
}
