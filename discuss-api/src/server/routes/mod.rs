use crate::server::ServerRouter;

mod posts;
mod topics;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .merge(topics::routes())
        .merge(posts::routes())
}
