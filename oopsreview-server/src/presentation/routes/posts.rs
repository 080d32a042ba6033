use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{create_post, get_post, list_posts, update_post};
use crate::presentation::http::middleware::session::session_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_posts))
        .route("/{id}", get(get_post).put(update_post));

    // только создание требует сессию
    let protected = Router::new()
        .route("/", post(create_post))
        .layer(middleware::from_fn_with_state(state, session_middleware));

    public.merge(protected)
}
