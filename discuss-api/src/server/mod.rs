use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{FormRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use cache::PageCache;
use discuss_common::model::{
    Id,
    auth::{SessionTokenDecodeError, SessionTokenHashError},
    post::PostMarker,
};
use discuss_db::client::{DbClient, DbError};
use json::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

mod cache;
mod form;
mod json;
mod routes;
mod session;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
    pub page_cache: Arc<PageCache>,
}

impl ServerState {
    #[must_use]
    pub fn new(db_client: DbClient) -> Self {
        Self {
            db_client: Arc::new(db_client),
            page_cache: Arc::default(),
        }
    }
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming form rejected: {0}")]
    FormRejection(#[from] FormRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("The provided session token could not be decoded: {0}")]
    InvalidSessionToken(#[from] SessionTokenDecodeError),
    #[error("The session token could not be hashed: {0}")]
    SessionTokenHash(#[from] SessionTokenHashError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Topic with slug {0:?} was not found.")]
    TopicBySlugNotFound(String),
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::TopicBySlugNotFound(_)
            | ServerError::PostByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::FormRejection(rejection) => rejection.status(),
            ServerError::InvalidSessionToken(_) => StatusCode::UNAUTHORIZED,
            ServerError::JsonResponse(_)
            | ServerError::Database(_)
            | ServerError::SessionTokenHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
        };
        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::server::ServerError;
    use axum::http::StatusCode;
    use discuss_common::model::{
        Id,
        auth::{SessionTokenDecodeError, TokenPart},
    };

    #[test]
    fn statuses() {
        assert_eq!(
            ServerError::TopicBySlugNotFound("general".to_owned()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::PostByIdNotFound(Id::new(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::InvalidSessionToken(SessionTokenDecodeError::MissingPart(TokenPart::Salt))
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
