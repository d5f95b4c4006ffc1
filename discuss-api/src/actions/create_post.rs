//! Creating a post in a topic from a submitted form.
//!
//! The steps run strictly in order: validate the form, resolve the caller, look up
//! the topic, store the post. The first failing step ends the action with a
//! [`FieldErrors`] report and nothing is stored. Only a stored post invalidates
//! the cached topic page and yields a [`NavigationTarget`] to the new post.

use crate::actions::FormState;
use discuss_common::{
    form::{FieldErrors, Submission},
    model::{
        auth::Session,
        post::{CreatePost, PartialPost, PostContent},
    },
    paths::{self, NavigationTarget},
    port::{ForumStore, PathCache, SessionResolver, StoreError},
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum CreatePostError {
    #[error("The submission failed validation")]
    Validation(FieldErrors),
    #[error("You must be signed in")]
    Unauthenticated,
    #[error("{}", store_message(.0, "Failed to look up topic"))]
    TopicLookup(StoreError),
    #[error("Topic not found")]
    TopicNotFound,
    #[error("{}", store_message(.0, "Failed to create a post"))]
    Persistence(StoreError),
}

fn store_message<'a>(err: &'a StoreError, fallback: &'a str) -> &'a str {
    err.message().unwrap_or(fallback)
}

impl From<CreatePostError> for FieldErrors {
    fn from(err: CreatePostError) -> Self {
        match err {
            CreatePostError::Validation(errors) => errors,
            other => FieldErrors::form(other.to_string()),
        }
    }
}

/// Runs the create post action for the topic identified by `topic_slug`.
///
/// `_previous` is the state the form was last drawn with; it does not influence
/// the outcome.
pub async fn create_post(
    sessions: &impl SessionResolver,
    store: &impl ForumStore,
    cache: &impl PathCache,
    topic_slug: &str,
    _previous: &FormState,
    submission: &Submission,
) -> Result<NavigationTarget, FieldErrors> {
    let post = match store_post(sessions, store, topic_slug, submission).await {
        Ok(post) => post,
        Err(err) => {
            match &err {
                CreatePostError::TopicLookup(_) | CreatePostError::Persistence(_) => {
                    warn!(error = %err, topic = topic_slug, "Storing post failed");
                }
                _ => debug!(error = %err, topic = topic_slug, "Rejected post submission"),
            }
            return Err(err.into());
        }
    };

    info!(post_id = %post.id, author_id = %post.author_id, topic = topic_slug, "Created post");

    cache.invalidate(&paths::topic_show(topic_slug)).await;
    Ok(NavigationTarget::new(paths::post_show(topic_slug, post.id)))
}

async fn store_post(
    sessions: &impl SessionResolver,
    store: &impl ForumStore,
    topic_slug: &str,
    submission: &Submission,
) -> Result<PartialPost, CreatePostError> {
    let content = PostContent::validate(submission).map_err(CreatePostError::Validation)?;

    let author_id = sessions
        .resolve()
        .await
        .as_ref()
        .and_then(Session::user_id)
        .ok_or(CreatePostError::Unauthenticated)?;

    let topic = store
        .find_topic_by_slug(topic_slug)
        .await
        .map_err(CreatePostError::TopicLookup)?
        .ok_or(CreatePostError::TopicNotFound)?;

    let post = CreatePost {
        topic_id: topic.id,
        author_id,
        content,
    };
    store
        .create_post(&post)
        .await
        .map_err(CreatePostError::Persistence)
}
