use crate::server::ServerError;
use axum::{Form as AxumForm, extract::FromRequest};

/// `application/x-www-form-urlencoded` body, rejected with a [`ServerError`].
#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(AxumForm), rejection(ServerError))]
pub struct Form<T>(pub T);
