use async_trait::async_trait;

use crate::data::query::ListPipeline;
use crate::domain::error::DomainError;
use crate::domain::object_id::ObjectId;
use crate::domain::post::{Post, PostRecord};

#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) tags: Option<String>,
    pub(crate) updated_on: i64,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn list_posts(&self, pipeline: &ListPipeline) -> Result<Vec<PostRecord>, DomainError>;
    async fn get_post(&self, id: &ObjectId) -> Result<Option<PostRecord>, DomainError>;
    async fn increment_views(&self, id: &ObjectId) -> Result<(), DomainError>;
    async fn exists_by_title(&self, title: &str) -> Result<bool, DomainError>;
    async fn exists_by_id(&self, id: &ObjectId) -> Result<bool, DomainError>;
    async fn insert_post(&self, post: &Post) -> Result<(), DomainError>;
    async fn update_post(&self, id: &ObjectId, patch: PostPatch) -> Result<bool, DomainError>;
}
