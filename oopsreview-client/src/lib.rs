//! Клиентская библиотека для работы с oopsreview-server по HTTP.
//!
//! `OopsClient` хранит идентификатор пользователя и отправляет его в
//! сессионной cookie при создании постов.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{OopsClientError, OopsClientResult};
pub use models::{App, Author, ListPostsQuery, NewPost, Post, PostUpdate};

use http_client::HttpClient;

/// Имя сессионной cookie по умолчанию.
pub const DEFAULT_SESSION_COOKIE: &str = "oopsreview_session";

#[derive(Debug, Clone)]
/// Клиент блога обзоров.
pub struct OopsClient {
    http: HttpClient,
    cookie_name: String,
    session: Option<String>,
}

impl OopsClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:19090`.
    pub fn new(base_url: impl Into<String>) -> OopsClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            session: None,
        })
    }

    /// Меняет имя сессионной cookie (должно совпадать с `SESSION_COOKIE_NAME` сервера).
    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    /// Устанавливает пользователя, от имени которого создаются посты.
    pub fn set_session(&mut self, user_id: impl Into<String>) -> OopsClientResult<()> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(OopsClientError::InvalidRequest(
                "user id must not be empty".to_string(),
            ));
        }
        self.session = Some(user_id);
        Ok(())
    }

    /// Возвращает текущего пользователя сессии, если он установлен.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Сбрасывает сессию.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Возвращает список постов.
    pub async fn list_posts(&self, query: &ListPostsQuery) -> OopsClientResult<Vec<Post>> {
        self.http.list_posts(query).await
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: &str) -> OopsClientResult<Post> {
        self.http.get_post(id).await
    }

    /// Создаёт пост.
    ///
    /// Требует установленную сессию.
    pub async fn create_post(&self, post: &NewPost) -> OopsClientResult<()> {
        let user_id = self.session.as_deref().ok_or(OopsClientError::Unauthorized)?;
        let cookie = http_client::session_cookie(&self.cookie_name, user_id)?;
        self.http.create_post(&cookie, post).await
    }

    /// Частично обновляет пост.
    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> OopsClientResult<()> {
        self.http.update_post(id, update).await
    }
}
