//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use football_blog_core::domain::{
    BlogEntry, Category, Comment, Confidence, EntryQuery, Image, Link, NewUser, Prediction,
    SortOrder, User, UserCredentials,
};
use football_blog_core::password::PasswordDigest;
use football_blog_core::ports::{DatabaseService, PortError, PortResult};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, first_name, last_name, email, created_at, updated_at";
const ENTRY_COLUMNS: &str = "id, title, authors, description, content, creation_date, edit_dates, \
     impression_count, comments_allowed, category_id, images, links, hashtags, predictions";
const COMMENT_COLUMNS: &str = "id, entry_id, author_id, content, created_at, updated_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Removes every row from every table. Used by the seed binary.
    pub async fn truncate_all(&self) -> Result<(), sqlx::Error> {
        sqlx::query("TRUNCATE comments, blog_entries, categories, users")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Maps a driver error, turning unique violations into `Conflict`.
fn map_write_error(e: sqlx::Error, conflict: &str) -> PortError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => PortError::Conflict(conflict.to_string()),
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn map_read_error(e: sqlx::Error, not_found: impl FnOnce() -> String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(not_found()),
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    #[sqlx(flatten)]
    user: UserRecord,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user: self.user.to_domain(),
            password: PasswordDigest::from_stored(self.password_hash),
        }
    }
}

#[derive(FromRow)]
struct CategoryRecord {
    id: Uuid,
    name: String,
    description: String,
}
impl CategoryRecord {
    fn to_domain(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ImageRecord {
    data: String,
    caption: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct LinkRecord {
    url: String,
    title: String,
}

#[derive(Serialize, Deserialize)]
struct PredictionRecord {
    home_team: String,
    away_team: String,
    predicted_score: String,
    match_date: DateTime<Utc>,
    confidence: i64,
}

#[derive(FromRow)]
struct EntryRecord {
    id: Uuid,
    title: String,
    authors: Vec<Uuid>,
    description: String,
    content: String,
    creation_date: DateTime<Utc>,
    edit_dates: Vec<DateTime<Utc>>,
    impression_count: i64,
    comments_allowed: bool,
    category_id: Uuid,
    images: Json<Vec<ImageRecord>>,
    links: Json<Vec<LinkRecord>>,
    hashtags: Vec<String>,
    predictions: Json<Vec<PredictionRecord>>,
}
impl EntryRecord {
    fn to_domain(self) -> PortResult<BlogEntry> {
        let predictions = self
            .predictions
            .0
            .into_iter()
            .map(|p| {
                let confidence = Confidence::new(p.confidence)
                    .map_err(|e| PortError::Unexpected(format!("Stored prediction is invalid: {e}")))?;
                Ok(Prediction {
                    home_team: p.home_team,
                    away_team: p.away_team,
                    predicted_score: p.predicted_score,
                    match_date: p.match_date,
                    confidence,
                })
            })
            .collect::<PortResult<Vec<_>>>()?;

        Ok(BlogEntry {
            id: self.id,
            title: self.title,
            authors: self.authors,
            description: self.description,
            content: self.content,
            creation_date: self.creation_date,
            edit_dates: self.edit_dates,
            impression_count: self.impression_count,
            comments_allowed: self.comments_allowed,
            category_id: self.category_id,
            images: self
                .images
                .0
                .into_iter()
                .map(|i| Image {
                    data: i.data,
                    caption: i.caption,
                })
                .collect(),
            links: self
                .links
                .0
                .into_iter()
                .map(|l| Link {
                    url: l.url,
                    title: l.title,
                })
                .collect(),
            hashtags: self.hashtags,
            predictions,
        })
    }
}

/// The JSONB payloads of an entry, ready to bind.
struct EntryDocuments {
    images: Json<Vec<ImageRecord>>,
    links: Json<Vec<LinkRecord>>,
    predictions: Json<Vec<PredictionRecord>>,
}
impl EntryDocuments {
    fn from_domain(entry: &BlogEntry) -> Self {
        Self {
            images: Json(
                entry
                    .images
                    .iter()
                    .map(|i| ImageRecord {
                        data: i.data.clone(),
                        caption: i.caption.clone(),
                    })
                    .collect(),
            ),
            links: Json(
                entry
                    .links
                    .iter()
                    .map(|l| LinkRecord {
                        url: l.url.clone(),
                        title: l.title.clone(),
                    })
                    .collect(),
            ),
            predictions: Json(
                entry
                    .predictions
                    .iter()
                    .map(|p| PredictionRecord {
                        home_team: p.home_team.clone(),
                        away_team: p.away_team.clone(),
                        predicted_score: p.predicted_score.clone(),
                        match_date: p.match_date,
                        confidence: i64::from(p.confidence.get()),
                    })
                    .collect(),
            ),
        }
    }
}

#[derive(FromRow)]
struct CommentRecord {
    id: Uuid,
    entry_id: Uuid,
    author_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl CommentRecord {
    fn to_domain(self) -> Comment {
        Comment {
            id: self.id,
            entry_id: self.entry_id,
            author_id: self.author_id,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const DUPLICATE_ENTRY: &str = "A blog entry with this title already exists for this author";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, user: &NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, username, first_name, last_name, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.password.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User already exists"))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, || format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, || "User not found".to_string()))?;
        Ok(record.to_domain())
    }

    async fn get_credentials_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, || "User not found".to_string()))?;
        Ok(record.to_domain())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(user_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_categories(&self) -> PortResult<Vec<Category>> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, description FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_category_by_id(&self, category_id: Uuid) -> PortResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, description FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, || "Category not found".to_string()))?;
        Ok(record.to_domain())
    }

    async fn get_categories_by_ids(&self, category_ids: &[Uuid]) -> PortResult<Vec<Category>> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, description FROM categories WHERE id = ANY($1)",
        )
        .bind(category_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_category(&self, category: &Category) -> PortResult<()> {
        sqlx::query("INSERT INTO categories (id, name, description) VALUES ($1, $2, $3)")
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Category with this name already exists"))?;
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> PortResult<()> {
        let result = sqlx::query("UPDATE categories SET name = $1, description = $2 WHERE id = $3")
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Category with this name already exists"))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }

    async fn find_entries(&self, query: &EntryQuery) -> PortResult<Vec<BlogEntry>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM blog_entries WHERE TRUE"));
        if let Some(author) = query.author {
            builder.push(" AND ").push_bind(author).push(" = ANY(authors)");
        }
        if let Some(min) = query.min_images {
            builder
                .push(" AND jsonb_array_length(images) >= ")
                .push_bind(min as i32);
        }
        if let Some(since) = query.created_since {
            builder.push(" AND creation_date >= ").push_bind(since);
        }
        if query.with_links {
            builder.push(" AND jsonb_array_length(links) > 0");
        }
        if query.title_in_content {
            builder.push(" AND strpos(content, title) > 0");
        }
        builder.push(match query.order {
            SortOrder::OldestFirst => " ORDER BY creation_date ASC",
            SortOrder::NewestFirst => " ORDER BY creation_date DESC",
        });
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }
        if query.offset > 0 {
            builder.push(" OFFSET ").push_bind(query.offset as i64);
        }

        let records = builder
            .build_query_as::<EntryRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_entry_by_id(&self, entry_id: Uuid) -> PortResult<BlogEntry> {
        let record = sqlx::query_as::<_, EntryRecord>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM blog_entries WHERE id = $1"
        ))
        .bind(entry_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, || "Blog entry not found".to_string()))?;
        record.to_domain()
    }

    async fn record_entry_view(&self, entry_id: Uuid) -> PortResult<BlogEntry> {
        let record = sqlx::query_as::<_, EntryRecord>(&format!(
            "UPDATE blog_entries SET impression_count = impression_count + 1 \
             WHERE id = $1 RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(entry_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, || "Blog entry not found".to_string()))?;
        record.to_domain()
    }

    async fn insert_entry(&self, entry: &BlogEntry) -> PortResult<()> {
        let docs = EntryDocuments::from_domain(entry);
        sqlx::query(&format!(
            "INSERT INTO blog_entries ({ENTRY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(entry.id)
        .bind(&entry.title)
        .bind(&entry.authors)
        .bind(&entry.description)
        .bind(&entry.content)
        .bind(entry.creation_date)
        .bind(&entry.edit_dates)
        .bind(entry.impression_count)
        .bind(entry.comments_allowed)
        .bind(entry.category_id)
        .bind(docs.images)
        .bind(docs.links)
        .bind(&entry.hashtags)
        .bind(docs.predictions)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, DUPLICATE_ENTRY))?;
        Ok(())
    }

    async fn save_entry(&self, entry: &BlogEntry) -> PortResult<()> {
        let docs = EntryDocuments::from_domain(entry);
        sqlx::query(&format!(
            "INSERT INTO blog_entries ({ENTRY_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (id) DO UPDATE SET \
               title = EXCLUDED.title, authors = EXCLUDED.authors, \
               description = EXCLUDED.description, content = EXCLUDED.content, \
               edit_dates = EXCLUDED.edit_dates, comments_allowed = EXCLUDED.comments_allowed, \
               category_id = EXCLUDED.category_id, images = EXCLUDED.images, \
               links = EXCLUDED.links, hashtags = EXCLUDED.hashtags, \
               predictions = EXCLUDED.predictions"
        ))
        .bind(entry.id)
        .bind(&entry.title)
        .bind(&entry.authors)
        .bind(&entry.description)
        .bind(&entry.content)
        .bind(entry.creation_date)
        .bind(&entry.edit_dates)
        .bind(entry.impression_count)
        .bind(entry.comments_allowed)
        .bind(entry.category_id)
        .bind(docs.images)
        .bind(docs.links)
        .bind(&entry.hashtags)
        .bind(docs.predictions)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, DUPLICATE_ENTRY))?;
        Ok(())
    }

    async fn delete_entry(&self, entry_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM blog_entries WHERE id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Blog entry not found".to_string()));
        }
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> PortResult<()> {
        sqlx::query(&format!(
            "INSERT INTO comments ({COMMENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(comment.id)
        .bind(comment.entry_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_comment_by_id(&self, comment_id: Uuid) -> PortResult<Comment> {
        let record = sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, || "Comment not found".to_string()))?;
        Ok(record.to_domain())
    }

    async fn delete_comment(&self, comment_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound("Comment not found".to_string()));
        }
        Ok(())
    }

    async fn delete_comments_for_entry(&self, entry_id: Uuid) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE entry_id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }

    async fn list_comments_for_entry(&self, entry_id: Uuid) -> PortResult<Vec<Comment>> {
        let records = sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE entry_id = $1 ORDER BY created_at DESC"
        ))
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn latest_comments_for_entries(
        &self,
        entry_ids: &[Uuid],
        limit: usize,
    ) -> PortResult<Vec<Comment>> {
        let records = sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE entry_id = ANY($1) \
             ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(entry_ids.to_vec())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
