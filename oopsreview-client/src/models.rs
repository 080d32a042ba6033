use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Автор поста.
pub struct Author {
    /// Идентификатор пользователя (24 hex-символа).
    #[serde(rename = "_id")]
    pub id: String,
    /// Логин.
    pub username: String,
    /// Полное имя.
    pub fullname: Option<String>,
    /// Ссылка на аватар.
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Приложение, к которому относится обзор.
pub struct App {
    /// Идентификатор приложения.
    #[serde(rename = "_id")]
    pub id: String,
    /// Название.
    pub title: String,
    /// Логотип.
    pub logo: Option<String>,
    /// Ссылка.
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    #[serde(rename = "_id")]
    pub id: String,
    /// Заголовок (уникален).
    pub title: String,
    /// Содержимое.
    pub content: String,
    /// Теги.
    pub tags: Vec<String>,
    /// Количество комментариев.
    pub comments: i64,
    /// Количество просмотров.
    pub views: i64,
    /// Время создания, секунды от эпохи.
    pub created_on: i64,
    /// Время последнего изменения, секунды от эпохи.
    pub updated_on: i64,
    /// Черновик.
    pub draft: bool,
    /// Автор; `None`, если пользователь удалён.
    pub author: Option<Author>,
    /// Приложение (только в детальном ответе).
    #[serde(default)]
    pub app: Option<App>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Параметры списка постов. Незаданные поля не передаются серверу.
pub struct ListPostsQuery {
    /// Смещение (не номер страницы).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Размер выборки.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Фильтр по логину автора.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Сортировка по просмотрам.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Только посты, созданные раньше этой отметки (секунды).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastcreatedon: Option<i64>,
    /// Подстрока тегов.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Подстрока заголовка без учёта регистра.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
/// Данные нового поста.
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Содержимое.
    pub content: String,
    /// Теги через запятую.
    pub tags: String,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное обновление поста: `None` оставляет поле без изменений.
pub struct PostUpdate {
    /// Новый заголовок.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Новое содержимое.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Новые теги через запятую.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}
