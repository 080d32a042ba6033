use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

#[cfg(test)]
mod test_support;

use application::post_service::PostService;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.db_max_connections).await?;
    run_migrations(&pool).await?;

    let repo = Arc::new(PostgresPostRepository::new(pool));
    let post_service = Arc::new(PostService::new(repo, settings.db_default_limit));
    let state = AppState::new(post_service, &settings.session_cookie_name);

    info!(
        default_limit = settings.db_default_limit,
        cookie = %settings.session_cookie_name,
        "starting oopsreview server"
    );
    server::run_http(&settings, state).await
}
