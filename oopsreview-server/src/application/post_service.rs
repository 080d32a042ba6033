use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::data::post_repository::{PostPatch, PostRepository};
use crate::data::query::{ListPipeline, ListPostsParams};
use crate::domain::error::DomainError;
use crate::domain::object_id::ObjectId;
use crate::domain::post::{CreatePostRequest, Post, PostRecord, UpdatePostRequest};

pub(crate) struct PostService {
    repo: Arc<dyn PostRepository>,
    default_limit: i64,
}

impl PostService {
    pub(crate) fn new(repo: Arc<dyn PostRepository>, default_limit: i64) -> Self {
        Self {
            repo,
            default_limit,
        }
    }

    pub(crate) async fn list_posts(
        &self,
        params: &ListPostsParams,
    ) -> Result<Vec<PostRecord>, DomainError> {
        let pipeline = ListPipeline::build(params, self.default_limit);
        self.repo.list_posts(&pipeline).await
    }

    pub(crate) async fn get_post(&self, raw_id: &str) -> Result<PostRecord, DomainError> {
        let id = parse_post_id(raw_id)?;

        let record = self
            .repo
            .get_post(&id)
            .await?
            .ok_or_else(|| post_not_found(raw_id))?;

        // в ответ уходит значение до инкремента
        if let Err(err) = self.repo.increment_views(&id).await {
            warn!(post_id = %id, error = %err, "failed to increment post views");
        }

        Ok(record)
    }

    pub(crate) async fn create_post(
        &self,
        author_id: ObjectId,
        req: CreatePostRequest,
    ) -> Result<ObjectId, DomainError> {
        let post = Post::compose(req, author_id, now())?;

        // уникальность гарантирует индекс, проверка лишь экономит вставку
        if self.repo.exists_by_title(&post.title).await? {
            return Err(DomainError::AlreadyExists("title".to_string()));
        }
        self.repo.insert_post(&post).await?;

        info!(post_id = %post.id, author_id = %author_id, "post created");
        Ok(post.id)
    }

    pub(crate) async fn update_post(
        &self,
        raw_id: &str,
        req: UpdatePostRequest,
    ) -> Result<(), DomainError> {
        let id = parse_post_id(raw_id)?;
        let req = req.validate()?;

        if !self.repo.exists_by_id(&id).await? {
            return Err(post_not_found(raw_id));
        }

        let patch = PostPatch {
            title: req.title,
            content: req.content,
            tags: req.tags,
            updated_on: now(),
        };
        if !self.repo.update_post(&id, patch).await? {
            return Err(post_not_found(raw_id));
        }

        info!(post_id = %id, "post updated");
        Ok(())
    }
}

fn parse_post_id(raw_id: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse(raw_id).map_err(|_| post_not_found(raw_id))
}

fn post_not_found(raw_id: &str) -> DomainError {
    DomainError::NotFound(format!("post id: {raw_id}"))
}

fn now() -> i64 {
    Utc::now().timestamp()
}
