//! PostgreSQL backed storage for the discuss forum.

pub mod client;
mod record;
mod store;
