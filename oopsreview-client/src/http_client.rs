use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{OopsClientError, OopsClientResult};
use crate::models::{ListPostsQuery, NewPost, Post, PostUpdate};

/// Ответ сервера всегда завёрнут в `{status, message, data?}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: u16,
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PostListDto {
    result: Vec<Post>,
}

#[derive(Debug, Serialize)]
struct SessionDto<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API `oopsreview-server`.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> OopsClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `Ok(None)` означает «нет содержимого»: HTTP 204 или конверт со статусом 204.
    async fn execute<T>(&self, request: RequestBuilder) -> OopsClientResult<Option<Envelope<T>>>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(OopsClientError::from_reqwest)?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response
            .bytes()
            .await
            .map_err(OopsClientError::from_reqwest)?;
        decode_envelope(status, &body)
    }

    /// Возвращает список постов; пустой список, если подходящих постов нет.
    pub async fn list_posts(&self, query: &ListPostsQuery) -> OopsClientResult<Vec<Post>> {
        let request = self
            .client
            .request(Method::GET, self.endpoint("/api/post"))
            .query(query);

        let envelope = self.execute::<PostListDto>(request).await?;
        Ok(envelope
            .and_then(|envelope| envelope.data)
            .map(|list| list.result)
            .unwrap_or_default())
    }

    /// Получает пост по идентификатору. Сервер при этом увеличивает счётчик просмотров.
    pub async fn get_post(&self, id: &str) -> OopsClientResult<Post> {
        let request = self
            .client
            .request(Method::GET, self.endpoint(&format!("/api/post/{id}")));

        self.execute::<Post>(request)
            .await?
            .ok_or(OopsClientError::NotFound)?
            .data
            .ok_or_else(|| OopsClientError::InvalidResponse("post payload is missing".to_string()))
    }

    /// Создаёт пост от имени пользователя из сессионной cookie.
    pub async fn create_post(&self, cookie: &str, post: &NewPost) -> OopsClientResult<()> {
        let request = self
            .client
            .request(Method::POST, self.endpoint("/api/post"))
            .header(header::COOKIE, cookie)
            .json(post);

        self.execute::<serde_json::Value>(request).await?;
        Ok(())
    }

    /// Частично обновляет пост.
    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> OopsClientResult<()> {
        let request = self
            .client
            .request(Method::PUT, self.endpoint(&format!("/api/post/{id}")))
            .json(update);

        self.execute::<serde_json::Value>(request)
            .await?
            .ok_or(OopsClientError::NotFound)?;
        Ok(())
    }
}

fn decode_envelope<T>(status: StatusCode, body: &[u8]) -> OopsClientResult<Option<Envelope<T>>>
where
    T: DeserializeOwned,
{
    let envelope = serde_json::from_slice::<Envelope<T>>(body);

    if !status.is_success() {
        let message = envelope.ok().map(|envelope| envelope.message);
        return Err(OopsClientError::from_status(status.as_u16(), message));
    }

    let envelope =
        envelope.map_err(|err| OopsClientError::InvalidResponse(err.to_string()))?;
    match envelope.status {
        204 => Ok(None),
        200..=299 => Ok(Some(envelope)),
        other => Err(OopsClientError::from_status(other, Some(envelope.message))),
    }
}

/// Собирает значение заголовка `Cookie` для сессии пользователя.
pub(crate) fn session_cookie(cookie_name: &str, user_id: &str) -> OopsClientResult<String> {
    let json = serde_json::to_string(&SessionDto { id: user_id })
        .map_err(|err| OopsClientError::InvalidRequest(err.to_string()))?;
    Ok(format!(
        "{cookie_name}={}",
        utf8_percent_encode(&json, NON_ALPHANUMERIC)
    ))
}
