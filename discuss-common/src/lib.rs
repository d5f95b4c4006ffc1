//! Domain model and pure logic shared by the discuss server and its store.

pub mod form;
pub mod model;
pub mod paths;
pub mod port;
pub mod util;
