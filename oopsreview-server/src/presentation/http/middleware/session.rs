use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use tracing::debug;

use crate::domain::object_id::ObjectId;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct SessionUser {
    pub(crate) user_id: ObjectId,
}

#[derive(Debug, Deserialize)]
struct SessionCookie {
    #[serde(rename = "_id")]
    id: String,
}

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

pub(crate) async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let raw = request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| find_cookie(header, &state.session_cookie_name))
        .ok_or(AppError::Unauthorized)?;

    let user_id = parse_session_value(raw).ok_or_else(|| {
        debug!(cookie = %state.session_cookie_name, "malformed session cookie");
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(SessionUser { user_id });

    Ok(next.run(request).await)
}

fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"'))
    })
}

fn parse_session_value(raw: &str) -> Option<ObjectId> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let json = decoded.strip_prefix("j:").unwrap_or(&decoded);
    let session: SessionCookie = serde_json::from_str(json).ok()?;
    ObjectId::parse(&session.id).ok()
}
