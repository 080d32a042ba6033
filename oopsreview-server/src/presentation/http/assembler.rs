use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::app::App;
use crate::domain::post::{Post, PostRecord};
use crate::domain::user::User;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthorDto {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) fullname: Option<String>,
    pub(crate) avatar: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AppDto {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) logo: Option<String>,
    pub(crate) link: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) tags: Vec<String>,
    pub(crate) comments: i64,
    pub(crate) views: i64,
    /// Epoch seconds.
    pub(crate) created_on: i64,
    /// Epoch seconds.
    pub(crate) updated_on: i64,
    pub(crate) draft: bool,
    /// `null` when the author no longer exists.
    pub(crate) author: Option<AuthorDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) app: Option<AppDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostListDto {
    pub(crate) result: Vec<PostDto>,
}

impl From<User> for AuthorDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            fullname: user.fullname,
            avatar: user.avatar,
        }
    }
}

impl From<App> for AppDto {
    fn from(app: App) -> Self {
        Self {
            id: app.id.to_string(),
            title: app.title,
            logo: app.logo,
            link: app.link,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        let tags = post.tag_list();
        Self {
            id: post.id.to_string(),
            title: post.title,
            content: post.content,
            tags,
            comments: post.comments,
            views: post.views,
            created_on: post.created_on,
            updated_on: post.updated_on,
            draft: post.draft,
            author: None,
            app: None,
        }
    }
}

pub(crate) fn assemble_post(record: PostRecord) -> PostDto {
    let author = record.author.map(AuthorDto::from);
    let app = record.app.map(AppDto::from);

    let mut dto = PostDto::from(record.post);
    dto.author = author;
    dto.app = app;
    dto
}

pub(crate) fn assemble_list(records: Vec<PostRecord>) -> Option<PostListDto> {
    if records.is_empty() {
        return None;
    }

    Some(PostListDto {
        result: records.into_iter().map(assemble_post).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::{assemble_list, assemble_post};
    use crate::domain::object_id::ObjectId;
    use crate::domain::post::{Post, PostRecord};
    use crate::domain::user::User;

    fn record(title: &str, author: Option<User>) -> PostRecord {
        let user_id = ObjectId::parse("5a9f1c2b3d4e5f6a7b8c9d0e").expect("valid id");
        PostRecord {
            post: Post {
                id: ObjectId::new(),
                title: title.to_string(),
                content: "body".to_string(),
                tags: "cat,dog".to_string(),
                comments: 2,
                views: 5,
                created_on: 100,
                updated_on: 200,
                draft: false,
                user_id,
                app_id: None,
            },
            author,
            app: None,
        }
    }

    fn author() -> User {
        User {
            id: ObjectId::parse("5a9f1c2b3d4e5f6a7b8c9d0e").expect("valid id"),
            username: "yussan".to_string(),
            fullname: Some("Yusuf".to_string()),
            avatar: None,
        }
    }

    #[test]
    fn assemble_post_attaches_author() {
        let dto = assemble_post(record("Hello", Some(author())));

        assert_eq!(dto.title, "Hello");
        assert_eq!(dto.tags, vec!["cat".to_string(), "dog".to_string()]);
        assert_eq!(dto.views, 5);
        let author = dto.author.expect("author must be attached");
        assert_eq!(author.username, "yussan");
        assert_eq!(author.id, "5a9f1c2b3d4e5f6a7b8c9d0e");
    }

    #[test]
    fn assemble_post_tolerates_missing_author() {
        let dto = assemble_post(record("Orphan", None));
        assert!(dto.author.is_none());

        let json = serde_json::to_value(&dto).expect("must serialize");
        assert!(json["author"].is_null());
        assert!(json.get("app").is_none());
        assert!(json["_id"].is_string());
    }

    #[test]
    fn assemble_list_signals_empty_and_keeps_order() {
        assert!(assemble_list(Vec::new()).is_none());

        let list = assemble_list(vec![
            record("first", Some(author())),
            record("second", None),
        ])
        .expect("list must not be empty");
        let titles: Vec<_> = list.result.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
