use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::assembler::{AppDto, AuthorDto, PostDto, PostListDto};
use crate::presentation::http::handlers::posts::{CreatePostDto, UpdatePostDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post
    ),
    components(
        schemas(
            CreatePostDto,
            UpdatePostDto,
            AuthorDto,
            AppDto,
            PostDto,
            PostListDto
        )
    ),
    tags(
        (name = "posts", description = "Post endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "oopsreview_session",
                "URL-encoded JSON object carrying the user `_id`",
            ))),
        );
        openapi.components = Some(components);
    }
}
