use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::data::query::ListPostsParams;
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::assembler::{PostDto, PostListDto, assemble_list, assemble_post};
use crate::presentation::http::envelope::Envelope;
use crate::presentation::http::middleware::session::SessionUser;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ListPostsQuery {
    /// Offset into the result set (not a page number).
    pub(crate) page: Option<String>,
    pub(crate) limit: Option<String>,
    /// Exact author username.
    pub(crate) username: Option<String>,
    /// `"true"` sorts by views instead of creation time.
    pub(crate) featured: Option<String>,
    /// Accepted for compatibility; ignored.
    pub(crate) lastid: Option<String>,
    /// Load-more cursor: only posts created strictly before this epoch second.
    pub(crate) lastcreatedon: Option<String>,
    /// Substring of the comma-joined tags.
    pub(crate) tag: Option<String>,
    /// Case-insensitive regular expression over the title; an invalid one is matched literally.
    pub(crate) keyword: Option<String>,
}

impl From<ListPostsQuery> for ListPostsParams {
    fn from(query: ListPostsQuery) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            username: query.username,
            featured: query.featured,
            lastid: query.lastid,
            lastcreatedon: query.lastcreatedon,
            tag: query.tag,
            keyword: query.keyword,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    /// Comma separated, e.g. `"rust, web"`.
    #[serde(default)]
    pub(crate) tags: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: Option<String>,
    #[validate(length(min = 1))]
    pub(crate) content: Option<String>,
    pub(crate) tags: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/post",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts listed", body = Envelope<PostListDto>),
        (status = 204, description = "No post available"),
        (status = 500, description = "Storage failure")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<Response> {
    let params = ListPostsParams::from(query);
    let records = state.post_service.list_posts(&params).await?;

    let response = match assemble_list(records) {
        Some(list) => Envelope::with_data(StatusCode::OK, "success", list).respond(StatusCode::OK),
        None => Envelope::message(StatusCode::NO_CONTENT, "no post available")
            .respond(StatusCode::NO_CONTENT),
    };
    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/post/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "24-hex-character post id")
    ),
    responses(
        (status = 200, description = "Post found (pre-increment view count), or envelope status 204 when missing", body = Envelope<PostDto>),
        (status = 500, description = "Storage failure")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    match state.post_service.get_post(&id).await {
        Ok(record) => Ok(
            Envelope::with_data(StatusCode::OK, "success", assemble_post(record))
                .respond(StatusCode::OK),
        ),
        // клиенты ждут HTTP 200 с кодом 204 в теле
        Err(DomainError::NotFound(_)) => {
            Ok(Envelope::message(StatusCode::NO_CONTENT, "post not found").respond(StatusCode::OK))
        }
        Err(err) => Err(err.into()),
    }
}

#[utoipa::path(
    post,
    path = "/api/post",
    tag = "posts",
    security(
        ("session_cookie" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created"),
        (status = 400, description = "Validation error or duplicated title"),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Storage failure")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    session: SessionUser,
    payload: Result<Json<CreatePostDto>, JsonRejection>,
) -> AppResult<Response> {
    let Json(dto) = payload?;
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        content: dto.content,
        tags: dto.tags,
    };

    state
        .post_service
        .create_post(session.user_id, req)
        .await?;

    Ok(Envelope::message(StatusCode::CREATED, "Post Created").respond(StatusCode::CREATED))
}

#[utoipa::path(
    put,
    path = "/api/post/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "24-hex-character post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 201, description = "Post updated"),
        (status = 204, description = "Post not found"),
        (status = 400, description = "Validation error or duplicated title"),
        (status = 500, description = "Storage failure")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostDto>, JsonRejection>,
) -> AppResult<Response> {
    let Json(dto) = payload?;
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
        tags: dto.tags,
    };

    match state.post_service.update_post(&id, req).await {
        Ok(()) => {
            Ok(Envelope::message(StatusCode::CREATED, "Post Updated").respond(StatusCode::CREATED))
        }
        Err(DomainError::NotFound(_)) => Ok(Envelope::message(
            StatusCode::NO_CONTENT,
            "Post not found",
        )
        .respond(StatusCode::NO_CONTENT)),
        Err(err) => Err(err.into()),
    }
}
