use std::sync::Arc;

use crate::application::post_service::PostService;

pub(crate) mod http;
pub(crate) mod http_handlers;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<PostService>,
    pub(crate) session_cookie_name: Arc<str>,
}

impl AppState {
    pub(crate) fn new(post_service: Arc<PostService>, session_cookie_name: &str) -> Self {
        Self {
            post_service,
            session_cookie_name: Arc::from(session_cookie_name),
        }
    }
}
