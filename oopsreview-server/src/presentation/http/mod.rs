pub(crate) mod app_error;
pub(crate) mod assembler;
pub(crate) mod envelope;
pub(crate) mod handlers;
pub(crate) mod middleware;
