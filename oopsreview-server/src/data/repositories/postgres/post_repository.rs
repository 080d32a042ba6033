use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::data::post_repository::{PostPatch, PostRepository};
use crate::data::query::{ListPipeline, SortOrder, Stage};
use crate::domain::app::App;
use crate::domain::error::DomainError;
use crate::domain::object_id::ObjectId;
use crate::domain::post::{Post, PostRecord};
use crate::domain::user::User;

const TITLE_UNIQUE_CONSTRAINT: &str = "posts_title_key";
const UNIQUE_VIOLATION: &str = "23505";

const POST_COLUMNS: &str = "p.id, p.title, p.content, p.tags, p.comments, p.views, \
     p.created_on, p.updated_on, p.draft, p.user_id, p.app_id, \
     u.id AS author_id, u.username AS author_username, \
     u.fullname AS author_fullname, u.avatar AS author_avatar";

const APP_COLUMNS: &str =
    "a.id AS app_ref, a.title AS app_title, a.logo AS app_logo, a.link AS app_link";

const NO_APP_COLUMNS: &str = "NULL::TEXT AS app_ref, NULL::TEXT AS app_title, \
     NULL::TEXT AS app_logo, NULL::TEXT AS app_link";

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRecordRow {
    id: String,
    title: String,
    content: String,
    tags: String,
    comments: i64,
    views: i64,
    created_on: i64,
    updated_on: i64,
    draft: bool,
    user_id: String,
    app_id: Option<String>,
    author_id: Option<String>,
    author_username: Option<String>,
    author_fullname: Option<String>,
    author_avatar: Option<String>,
    app_ref: Option<String>,
    app_title: Option<String>,
    app_logo: Option<String>,
    app_link: Option<String>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_posts(&self, pipeline: &ListPipeline) -> Result<Vec<PostRecord>, DomainError> {
        let mut query = build_list_query(pipeline);
        let rows = query
            .build_query_as::<PostRecordRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_record).collect()
    }

    async fn get_post(&self, id: &ObjectId) -> Result<Option<PostRecord>, DomainError> {
        let mut query = build_detail_query(id);
        let row = query
            .build_query_as::<PostRecordRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_record).transpose()
    }

    async fn increment_views(&self, id: &ObjectId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE posts
            SET views = views + 1
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool, DomainError> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM posts
            WHERE title = $1
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.is_some())
    }

    async fn exists_by_id(&self, id: &ObjectId) -> Result<bool, DomainError> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.is_some())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id, title, content, tags, comments, views,
                created_on, updated_on, draft, user_id, app_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id.to_string())
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.tags)
        .bind(post.comments)
        .bind(post.views)
        .bind(post.created_on)
        .bind(post.updated_on)
        .bind(post.draft)
        .bind(post.user_id.to_string())
        .bind(post.app_id.map(|id| id.to_string()))
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn update_post(&self, id: &ObjectId, patch: PostPatch) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                tags = COALESCE($4, tags),
                updated_on = $5
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.tags)
        .bind(patch.updated_on)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn build_list_query(pipeline: &ListPipeline) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(POST_COLUMNS);
    query.push(", ");
    query.push(NO_APP_COLUMNS);
    query.push(" FROM posts p");

    let mut has_where = false;

    for stage in &pipeline.stages {
        match stage {
            Stage::LookupAuthor => {
                query.push(" LEFT JOIN users u ON u.id = p.user_id");
            }
            Stage::AuthorUsername(username) => {
                push_condition(&mut query, &mut has_where);
                query.push("u.username = ");
                query.push_bind(username.clone());
            }
            Stage::TagContains(tag) => {
                push_condition(&mut query, &mut has_where);
                query.push("strpos(p.tags, ");
                query.push_bind(tag.clone());
                query.push(") > 0");
            }
            Stage::Sort(_) => {}
            Stage::CreatedBefore(before) => {
                push_condition(&mut query, &mut has_where);
                query.push("p.created_on < ");
                query.push_bind(*before);
            }
            Stage::TitleMatches(pattern) => {
                push_condition(&mut query, &mut has_where);
                query.push("p.title ~* ");
                query.push_bind(pattern.clone());
            }
        }
    }

    query.push(match pipeline.sort_order() {
        SortOrder::ViewsDesc => " ORDER BY p.views DESC, p.id DESC",
        SortOrder::CreatedOnDesc => " ORDER BY p.created_on DESC, p.id DESC",
    });
    query.push(" OFFSET ");
    query.push_bind(pipeline.offset);
    query.push(" LIMIT ");
    query.push_bind(pipeline.limit);

    query
}

fn build_detail_query(id: &ObjectId) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(POST_COLUMNS);
    query.push(", ");
    query.push(APP_COLUMNS);
    query.push(
        " FROM posts p \
         LEFT JOIN users u ON u.id = p.user_id \
         LEFT JOIN apps a ON a.id = p.app_id \
         WHERE p.id = ",
    );
    query.push_bind(id.to_string());
    query
}

fn push_condition(query: &mut QueryBuilder<'static, Postgres>, has_where: &mut bool) {
    query.push(if *has_where { " AND " } else { " WHERE " });
    *has_where = true;
}

fn map_row_to_record(row: PostRecordRow) -> Result<PostRecord, DomainError> {
    let author = match (row.author_id, row.author_username) {
        (Some(id), Some(username)) => Some(User {
            id: parse_stored_id(&id)?,
            username,
            fullname: row.author_fullname,
            avatar: row.author_avatar,
        }),
        _ => None,
    };

    let app = match (row.app_ref, row.app_title) {
        (Some(id), Some(title)) => Some(App {
            id: parse_stored_id(&id)?,
            title,
            logo: row.app_logo,
            link: row.app_link,
        }),
        _ => None,
    };

    let post = Post {
        id: parse_stored_id(&row.id)?,
        title: row.title,
        content: row.content,
        tags: row.tags,
        comments: row.comments,
        views: row.views,
        created_on: row.created_on,
        updated_on: row.updated_on,
        draft: row.draft,
        user_id: parse_stored_id(&row.user_id)?,
        app_id: row.app_id.as_deref().map(parse_stored_id).transpose()?,
    };

    Ok(PostRecord { post, author, app })
}

fn parse_stored_id(raw: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse(raw).map_err(|err| DomainError::Corrupted(format!("id {raw}: {err}")))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && is_title_conflict(db_err.code().as_deref(), db_err.constraint())
    {
        return DomainError::AlreadyExists("title".to_string());
    }
    DomainError::Storage(err.to_string())
}

fn is_title_conflict(code: Option<&str>, constraint: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION) && constraint == Some(TITLE_UNIQUE_CONSTRAINT)
}
