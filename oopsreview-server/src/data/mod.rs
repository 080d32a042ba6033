pub(crate) mod post_repository;
pub(crate) mod query;
pub(crate) mod repositories;
