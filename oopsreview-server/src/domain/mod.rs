pub(crate) mod app;
pub(crate) mod error;
pub(crate) mod object_id;
pub(crate) mod post;
pub(crate) mod user;
