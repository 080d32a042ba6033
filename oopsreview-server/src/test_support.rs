use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use regex::RegexBuilder;

use crate::data::post_repository::{PostPatch, PostRepository};
use crate::data::query::{ListPipeline, SortOrder, Stage};
use crate::domain::app::App;
use crate::domain::error::DomainError;
use crate::domain::object_id::ObjectId;
use crate::domain::post::{Post, PostRecord};
use crate::domain::user::User;

#[derive(Default)]
pub(crate) struct RepoState {
    pub(crate) posts: Vec<Post>,
    pub(crate) users: Vec<User>,
    pub(crate) apps: Vec<App>,
    pub(crate) calls: usize,
    pub(crate) fail_storage: bool,
    pub(crate) fail_increment: bool,
    pub(crate) blind_title_check: bool,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryPostRepo {
    state: Arc<Mutex<RepoState>>,
}

impl InMemoryPostRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, RepoState> {
        self.state.lock().expect("repo state mutex poisoned")
    }

    pub(crate) fn add_user(&self, username: &str) -> ObjectId {
        let user = User {
            id: ObjectId::new(),
            username: username.to_string(),
            fullname: Some(format!("{username} fullname")),
            avatar: None,
        };
        let id = user.id;
        self.state().users.push(user);
        id
    }

    pub(crate) fn add_app(&self, title: &str) -> ObjectId {
        let app = App {
            id: ObjectId::new(),
            title: title.to_string(),
            logo: None,
            link: Some("https://apps.example.com".to_string()),
        };
        let id = app.id;
        self.state().apps.push(app);
        id
    }

    pub(crate) fn add_post(&self, seed: PostSeed<'_>) -> ObjectId {
        let post = Post {
            id: ObjectId::new(),
            title: seed.title.to_string(),
            content: format!("{} content", seed.title),
            tags: seed.tags.to_string(),
            comments: 0,
            views: seed.views,
            created_on: seed.created_on,
            updated_on: seed.created_on,
            draft: false,
            user_id: seed.user_id,
            app_id: seed.app_id,
        };
        let id = post.id;
        self.state().posts.push(post);
        id
    }

    pub(crate) fn stored(&self, id: &ObjectId) -> Option<Post> {
        self.state().posts.iter().find(|post| post.id == *id).cloned()
    }

    fn enter(&self) -> Result<MutexGuard<'_, RepoState>, DomainError> {
        let mut state = self.state();
        state.calls += 1;
        if state.fail_storage {
            return Err(DomainError::Storage("connection refused".to_string()));
        }
        Ok(state)
    }
}

pub(crate) struct PostSeed<'a> {
    pub(crate) title: &'a str,
    pub(crate) tags: &'a str,
    pub(crate) views: i64,
    pub(crate) created_on: i64,
    pub(crate) user_id: ObjectId,
    pub(crate) app_id: Option<ObjectId>,
}

impl<'a> PostSeed<'a> {
    pub(crate) fn new(title: &'a str, user_id: ObjectId) -> Self {
        Self {
            title,
            tags: "",
            views: 0,
            created_on: 1_500_000_000,
            user_id,
            app_id: None,
        }
    }

    pub(crate) fn tags(mut self, tags: &'a str) -> Self {
        self.tags = tags;
        self
    }

    pub(crate) fn views(mut self, views: i64) -> Self {
        self.views = views;
        self
    }

    pub(crate) fn created_on(mut self, created_on: i64) -> Self {
        self.created_on = created_on;
        self
    }

    pub(crate) fn app(mut self, app_id: ObjectId) -> Self {
        self.app_id = Some(app_id);
        self
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepo {
    async fn list_posts(&self, pipeline: &ListPipeline) -> Result<Vec<PostRecord>, DomainError> {
        let state = self.enter()?;
        let mut records: Vec<PostRecord> = state
            .posts
            .iter()
            .cloned()
            .map(|post| PostRecord {
                post,
                author: None,
                app: None,
            })
            .collect();

        for stage in &pipeline.stages {
            match stage {
                Stage::LookupAuthor => {
                    for record in &mut records {
                        record.author = state
                            .users
                            .iter()
                            .find(|user| user.id == record.post.user_id)
                            .cloned();
                    }
                }
                Stage::AuthorUsername(username) => records.retain(|record| {
                    record
                        .author
                        .as_ref()
                        .is_some_and(|author| author.username == *username)
                }),
                Stage::TagContains(tag) => {
                    records.retain(|record| record.post.tags.contains(tag.as_str()))
                }
                Stage::Sort(SortOrder::ViewsDesc) => {
                    records.sort_by(|a, b| b.post.views.cmp(&a.post.views))
                }
                Stage::Sort(SortOrder::CreatedOnDesc) => {
                    records.sort_by(|a, b| b.post.created_on.cmp(&a.post.created_on))
                }
                Stage::CreatedBefore(before) => {
                    records.retain(|record| record.post.created_on < *before)
                }
                Stage::TitleMatches(pattern) => {
                    let pattern = RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .expect("keyword pattern must compile");
                    records.retain(|record| pattern.is_match(&record.post.title))
                }
            }
        }

        Ok(records
            .into_iter()
            .skip(pipeline.offset as usize)
            .take(pipeline.limit as usize)
            .collect())
    }

    async fn get_post(&self, id: &ObjectId) -> Result<Option<PostRecord>, DomainError> {
        let state = self.enter()?;
        Ok(state.posts.iter().find(|post| post.id == *id).map(|post| PostRecord {
            post: post.clone(),
            author: state.users.iter().find(|u| u.id == post.user_id).cloned(),
            app: post
                .app_id
                .and_then(|app_id| state.apps.iter().find(|a| a.id == app_id).cloned()),
        }))
    }

    async fn increment_views(&self, id: &ObjectId) -> Result<(), DomainError> {
        let mut state = self.enter()?;
        if state.fail_increment {
            return Err(DomainError::Storage("write timeout".to_string()));
        }
        if let Some(post) = state.posts.iter_mut().find(|post| post.id == *id) {
            post.views += 1;
        }
        Ok(())
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool, DomainError> {
        let state = self.enter()?;
        if state.blind_title_check {
            return Ok(false);
        }
        Ok(state.posts.iter().any(|post| post.title == title))
    }

    async fn exists_by_id(&self, id: &ObjectId) -> Result<bool, DomainError> {
        let state = self.enter()?;
        Ok(state.posts.iter().any(|post| post.id == *id))
    }

    async fn insert_post(&self, post: &Post) -> Result<(), DomainError> {
        let mut state = self.enter()?;
        if state.posts.iter().any(|existing| existing.title == post.title) {
            return Err(DomainError::AlreadyExists("title".to_string()));
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn update_post(&self, id: &ObjectId, patch: PostPatch) -> Result<bool, DomainError> {
        let mut state = self.enter()?;
        if let Some(title) = &patch.title
            && state
                .posts
                .iter()
                .any(|post| post.id != *id && post.title == *title)
        {
            return Err(DomainError::AlreadyExists("title".to_string()));
        }

        let Some(post) = state.posts.iter_mut().find(|post| post.id == *id) else {
            return Ok(false);
        };
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(tags) = patch.tags {
            post.tags = tags;
        }
        post.updated_on = patch.updated_on;
        Ok(true)
    }
}
