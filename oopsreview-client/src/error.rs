use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `oopsreview-client`.
pub enum OopsClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется сессия (cookie не установлена или отклонена сервером).
    #[error("unauthorized")]
    Unauthorized,

    /// Пост не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос, ошибка валидации или дубликат заголовка.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Ошибка на стороне сервера (например, недоступна база данных).
    #[error("server error: {0}")]
    Server(String),

    /// Ответ сервера не удалось разобрать.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Результат операций `oopsreview-client`.
pub type OopsClientResult<T> = Result<T, OopsClientError>;

impl OopsClientError {
    pub(crate) fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            401 | 403 => Self::Unauthorized,
            204 | 404 => Self::NotFound,
            500..=599 => Self::Server(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16(), None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::OopsClientError;

    #[test]
    fn from_status_maps_known_codes() {
        assert!(matches!(
            OopsClientError::from_status(401, None),
            OopsClientError::Unauthorized
        ));
        assert!(matches!(
            OopsClientError::from_status(204, None),
            OopsClientError::NotFound
        ));
        assert!(matches!(
            OopsClientError::from_status(500, Some("db".to_string())),
            OopsClientError::Server(message) if message == "db"
        ));
        assert!(matches!(
            OopsClientError::from_status(400, None),
            OopsClientError::InvalidRequest(message) if message == "http status 400"
        ));
    }
}
