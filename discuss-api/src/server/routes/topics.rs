use crate::server::{Result, ServerError, ServerRouter, cache::PageCache};
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    routing::{RouterExt, TypedPath},
};
use discuss_common::{
    model::{post::Post, topic::Topic},
    paths,
};
use discuss_db::client::DbClient;
use headers::ContentType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_topic)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/topics/{slug}", rejection(ServerError))]
struct GetTopicPath {
    slug: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct TopicPage {
    topic: Topic,
    posts: Vec<Post>,
}

async fn get_topic(
    GetTopicPath { slug }: GetTopicPath,
    State(db): State<Arc<DbClient>>,
    State(cache): State<Arc<PageCache>>,
) -> Result<Response> {
    let path = paths::topic_show(&slug);

    let body = if let Some(body) = cache.get(&path).await {
        debug!(path = %path, "Serving cached topic page");
        body
    } else {
        let ticket = cache.ticket().await;

        let topic = db
            .fetch_topic_by_slug(&slug)
            .await?
            .ok_or(ServerError::TopicBySlugNotFound(slug))?;
        let posts = db.fetch_topic_posts(topic.id).await?;

        let body = Bytes::from(serde_json::to_vec(&TopicPage { topic, posts })?);
        cache.insert(ticket, path, body.clone()).await;
        body
    };

    Ok((TypedHeader(ContentType::json()), body).into_response())
}
