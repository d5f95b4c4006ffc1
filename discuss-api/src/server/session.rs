use crate::server::ServerError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use discuss_common::{
    model::auth::{Session, SessionToken, SessionUser},
    port::SessionResolver,
};
use discuss_db::client::DbClient;
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use std::{convert::Infallible, sync::Arc};
use time::UtcDateTime;
use tracing::debug;

/// Session of the caller, taken from an `Authorization: Bearer` header.
///
/// Extraction never fails and does not touch the database. The token is only
/// checked once an action asks for the session.
#[derive(Clone, Debug)]
pub struct BearerSession {
    db: Arc<DbClient>,
    token: Option<String>,
}

impl BearerSession {
    async fn lookup(&self, token: &str) -> Result<Option<Session>, ServerError> {
        let token: SessionToken = token.parse()?;
        let token_hash = token.secret.digest()?;

        let Some(authentication) = self.db.fetch_auth(&token_hash).await? else {
            return Ok(None);
        };

        if !authentication.admits(&token, UtcDateTime::now()) {
            return Ok(None);
        }

        let user = self.db.fetch_user(authentication.user).await?;
        Ok(Some(Session {
            user: user.map(SessionUser::from),
        }))
    }
}

impl SessionResolver for BearerSession {
    async fn resolve(&self) -> Option<Session> {
        let token = self.token.as_deref()?;

        match self.lookup(token).await {
            Ok(session) => session,
            Err(err) => {
                debug!(error = %err, "Could not resolve session");
                None
            }
        }
    }
}

impl<S> FromRequestParts<S> for BearerSession
where
    Arc<DbClient>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|authorization| authorization.token().to_owned());

        Ok(Self {
            db: Arc::<DbClient>::from_ref(state),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::server::session::BearerSession;
    use axum::{extract::FromRequestParts, http::Request};
    use discuss_common::port::SessionResolver;
    use discuss_db::client::DbClient;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn unreachable_db() -> Arc<DbClient> {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://discuss@127.0.0.1:1/discuss")
            .unwrap();
        Arc::new(DbClient::new(pool))
    }

    async fn extract(request: Request<()>) -> BearerSession {
        let (mut parts, ()) = request.into_parts();
        BearerSession::from_request_parts(&mut parts, &unreachable_db())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn no_header_means_no_session() {
        let session = extract(Request::new(())).await;

        assert_eq!(session.token, None);
        assert_eq!(session.resolve().await, None);
    }

    #[tokio::test]
    async fn bearer_token_is_captured() {
        let request = Request::builder()
            .header("authorization", "Bearer 17:abc:def")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.token.as_deref(), Some("17:abc:def"));
    }

    #[tokio::test]
    async fn malformed_token_resolves_to_no_session() {
        let request = Request::builder()
            .header("authorization", "Bearer not-a-token")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.resolve().await, None);
    }
}
