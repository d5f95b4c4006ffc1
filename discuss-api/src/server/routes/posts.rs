use crate::{
    actions::{FormState, create_post},
    server::{
        Result, ServerError, ServerRouter, cache::PageCache, form::Form, json::Json,
        session::BearerSession,
    },
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::routing::{RouterExt, TypedPath};
use discuss_common::{
    form::{FieldErrors, Submission},
    model::{
        Id,
        post::{Post, PostMarker},
    },
    paths::NavigationTarget,
};
use discuss_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_post)
        .typed_post(submit_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/topics/{slug}/posts/{id}", rejection(ServerError))]
struct GetPostPath {
    slug: String,
    id: Id<PostMarker>,
}

async fn get_post(
    GetPostPath { slug, id }: GetPostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Post>> {
    let topic = db
        .fetch_topic_by_slug(&slug)
        .await?
        .ok_or(ServerError::TopicBySlugNotFound(slug))?;

    let post = db
        .fetch_post(id)
        .await?
        .filter(|post| post.topic_id == topic.id)
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/topics/{slug}/posts/new", rejection(ServerError))]
struct CreatePostPath {
    slug: String,
}

/// Redirects to the new post on success, otherwise answers with the form errors.
async fn submit_post(
    CreatePostPath { slug }: CreatePostPath,
    State(db): State<Arc<DbClient>>,
    State(cache): State<Arc<PageCache>>,
    session: BearerSession,
    Form(submission): Form<Submission>,
) -> Response {
    let outcome = create_post::create_post(
        &session,
        &*db,
        &*cache,
        &slug,
        &FormState::default(),
        &submission,
    )
    .await;

    form_response(outcome)
}

fn form_response(outcome: Result<NavigationTarget, FieldErrors>) -> Response {
    match outcome {
        Ok(target) => Redirect::to(target.as_str()).into_response(),
        Err(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormState::from(errors)),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::server::{
        ServerState,
        routes::posts::{CreatePostPath, GetPostPath, form_response},
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use discuss_common::{
        model::Id,
        paths::{self, NavigationTarget},
    };
    use discuss_db::client::DbClient;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://discuss@127.0.0.1:1/discuss")
            .unwrap();
        crate::server::routes().with_state(ServerState::new(DbClient::new(pool)))
    }

    async fn submit(form: &'static str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri("/topics/general/posts/new")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();

        app().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn invalid_fields_are_unprocessable() {
        let response = submit("title=Hi&content=too+short").await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_text(response).await,
            r#"{"errors":{"title":["String must contain at least 3 character(s)"],"content":["String must contain at least 10 character(s)"]}}"#
        );
    }

    #[tokio::test]
    async fn anonymous_submission_is_unprocessable() {
        let response = submit("title=Hello&content=Long+enough+content").await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_text(response).await,
            r#"{"errors":{"_form":["You must be signed in"]}}"#
        );
    }

    #[test]
    fn success_redirects_to_the_post() {
        let response = form_response(Ok(NavigationTarget::new(paths::post_show(
            "general",
            Id::new(7),
        ))));

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/topics/general/posts/7"
        );
    }

    #[test]
    fn routes_match_display_paths() {
        assert_eq!(
            CreatePostPath {
                slug: "general".to_owned()
            }
            .to_string(),
            paths::post_create("general")
        );
        assert_eq!(
            GetPostPath {
                slug: "general".to_owned(),
                id: Id::new(7),
            }
            .to_string(),
            paths::post_show("general", Id::new(7))
        );
    }
}
