use super::app::App;
use super::error::DomainError;
use super::object_id::ObjectId;
use super::user::User;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Post {
    pub(crate) id: ObjectId,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) tags: String,
    pub(crate) comments: i64,
    pub(crate) views: i64,
    pub(crate) created_on: i64,
    pub(crate) updated_on: i64,
    pub(crate) draft: bool,
    pub(crate) user_id: ObjectId,
    pub(crate) app_id: Option<ObjectId>,
}

impl Post {
    pub(crate) fn compose(
        req: CreatePostRequest,
        user_id: ObjectId,
        now: i64,
    ) -> Result<Self, DomainError> {
        let req = req.validate()?;

        Ok(Self {
            id: ObjectId::new(),
            title: req.title,
            content: req.content,
            tags: req.tags,
            comments: 0,
            views: 0,
            created_on: now,
            updated_on: now,
            draft: false,
            user_id,
            app_id: None,
        })
    }

    pub(crate) fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PostRecord {
    pub(crate) post: Post,
    pub(crate) author: Option<User>,
    pub(crate) app: Option<App>,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) tags: String,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            tags: normalize_tags(&self.tags),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) tags: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: self.title.as_deref().map(normalize_title).transpose()?,
            content: self.content.as_deref().map(normalize_content).transpose()?,
            tags: self.tags.as_deref().map(normalize_tags),
        })
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

// пробелы схлопываются только вокруг запятых
fn normalize_tags(raw: &str) -> String {
    let pieces: Vec<&str> = raw.split(',').collect();
    let last = pieces.len() - 1;

    pieces
        .iter()
        .enumerate()
        .map(|(idx, piece)| match (idx == 0, idx == last) {
            (true, true) => *piece,
            (true, false) => piece.trim_end(),
            (false, true) => piece.trim_start(),
            (false, false) => piece.trim(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::{CreatePostRequest, DomainError, ObjectId, Post, UpdatePostRequest, normalize_tags};

    #[test]
    fn normalize_tags_collapses_spaces_around_commas() {
        assert_eq!(normalize_tags("rust , web,  async"), "rust,web,async");
        assert_eq!(normalize_tags("rust,\tweb"), "rust,web");
    }

    #[test]
    fn normalize_tags_keeps_outer_whitespace_and_single_tag() {
        assert_eq!(normalize_tags(" rust , web "), " rust,web ");
        assert_eq!(normalize_tags("  solo  "), "  solo  ");
        assert_eq!(normalize_tags(""), "");
    }

    #[test]
    fn create_post_request_validate_rejects_empty_title() {
        let req = CreatePostRequest {
            title: "   ".to_string(),
            content: "valid content".to_string(),
            tags: String::new(),
        };

        let err = req.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn create_post_request_validate_rejects_empty_content() {
        let req = CreatePostRequest {
            title: "title".to_string(),
            content: " ".to_string(),
            tags: String::new(),
        };

        let err = req.validate().expect_err("content must be rejected");
        assert_validation_field(err, "content");
    }

    #[test]
    fn compose_sets_counters_and_timestamps() {
        let author = ObjectId::parse("5a9f1c2b3d4e5f6a7b8c9d0e").expect("valid id");
        let req = CreatePostRequest {
            title: "  Hello  ".to_string(),
            content: " body ".to_string(),
            tags: "a , b".to_string(),
        };

        let post = Post::compose(req, author, 1_700_000_000).expect("must compose");

        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "body");
        assert_eq!(post.tags, "a,b");
        assert_eq!(post.comments, 0);
        assert_eq!(post.views, 0);
        assert_eq!(post.created_on, 1_700_000_000);
        assert_eq!(post.updated_on, 1_700_000_000);
        assert!(!post.draft);
        assert_eq!(post.user_id, author);
        assert_eq!(post.app_id, None);
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        let req = UpdatePostRequest {
            title: Some("  New title ".to_string()),
            content: None,
            tags: Some("x ,y".to_string()),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title.as_deref(), Some("New title"));
        assert_eq!(validated.content, None);
        assert_eq!(validated.tags.as_deref(), Some("x,y"));

        let err = UpdatePostRequest {
            content: Some(String::new()),
            ..Default::default()
        }
        .validate()
        .expect_err("empty content must fail");
        assert_validation_field(err, "content");
    }

    #[test]
    fn tag_list_splits_and_drops_empty_entries() {
        let author = ObjectId::parse("5a9f1c2b3d4e5f6a7b8c9d0e").expect("valid id");
        let req = CreatePostRequest {
            title: "t".to_string(),
            content: "c".to_string(),
            tags: "cat,,dog, ".to_string(),
        };
        let post = Post::compose(req, author, 1).expect("must compose");

        assert_eq!(post.tag_list(), vec!["cat".to_string(), "dog".to_string()]);
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
