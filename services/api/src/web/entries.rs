//! services/api/src/web/entries.rs
//!
//! Blog entry endpoints: CRUD, author and hashtag mutations, and the
//! specialty listings.
//!
//! Mutations only require a valid token; being one of the entry's authors is
//! not checked.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use football_blog_core::domain::{BlogEntry, EntryDraft, EntryQuery};
use football_blog_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::web::extract::{parse_id, require_non_empty, AppJson};
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::views::{
    present_entries, present_entry, EntryResponse, ImageBody, LinkBody, MessageResponse,
    PredictionBody,
};

//=========================================================================================
// Request Types
//=========================================================================================

/// Body for creating or fully updating an entry.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryRequest {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Category id.
    pub category: Uuid,
    /// Defaults to `true` on creation.
    pub comments_allowed: Option<bool>,
    pub images: Option<Vec<ImageBody>>,
    pub links: Option<Vec<LinkBody>>,
    pub hashtags: Option<Vec<String>>,
    pub predictions: Option<Vec<PredictionBody>>,
}

impl EntryRequest {
    fn into_draft(self) -> Result<EntryDraft, AppError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("description", &self.description)?;
        require_non_empty("content", &self.content)?;

        Ok(EntryDraft {
            title: self.title,
            description: self.description,
            content: self.content,
            category_id: self.category,
            comments_allowed: self.comments_allowed,
            images: self
                .images
                .map(|v| v.into_iter().map(ImageBody::into_domain).collect())
                .transpose()?,
            links: self
                .links
                .map(|v| v.into_iter().map(LinkBody::into_domain).collect())
                .transpose()?,
            hashtags: self.hashtags,
            predictions: self
                .predictions
                .map(|v| v.into_iter().map(PredictionBody::into_domain).collect())
                .transpose()?,
        })
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssignAuthorRequest {
    pub author_id: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct HashtagRequest {
    pub hashtag: Option<String>,
}

async fn present_list(
    state: &AppState,
    entries: Vec<BlogEntry>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    Ok(Json(present_entries(state.db.as_ref(), entries).await?))
}

//=========================================================================================
// CRUD Handlers
//=========================================================================================

/// GET /api/entries
#[utoipa::path(
    get,
    path = "/api/entries",
    tag = "entries",
    responses(
        (status = 200, description = "All entries", body = Vec<EntryResponse>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_entries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let entries = state.db.find_entries(&EntryQuery::all()).await?;
    present_list(&state, entries).await
}

/// GET /api/entries/{id} - Reads the entry and counts the view
#[utoipa::path(
    get,
    path = "/api/entries/{id}",
    tag = "entries",
    params(("id" = String, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry, with its view counter already incremented", body = EntryResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Blog entry not found", body = ErrorBody)
    )
)]
pub async fn get_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EntryResponse>, AppError> {
    let id = parse_id(&id, "blog entry")?;
    let entry = state.db.record_entry_view(id).await?;
    Ok(Json(present_entry(state.db.as_ref(), entry).await?))
}

/// POST /api/entries - The caller becomes the sole author
#[utoipa::path(
    post,
    path = "/api/entries",
    tag = "entries",
    security(("bearer_auth" = [])),
    request_body = EntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Invalid input or duplicate title for this author", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<EntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = req.into_draft()?;
    let entry = BlogEntry::create(Uuid::new_v4(), caller.id, draft, Utc::now());

    state.db.insert_entry(&entry).await?;
    info!("User {} created entry {}", caller.username, entry.id);

    let body = present_entry(state.db.as_ref(), entry).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/entries/{id} - Update, or create with this id if absent
#[utoipa::path(
    put,
    path = "/api/entries/{id}",
    tag = "entries",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Entry id")),
    request_body = EntryRequest,
    responses(
        (status = 200, description = "Entry updated or created", body = EntryResponse),
        (status = 400, description = "Invalid input or duplicate title for this author", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn upsert_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(req): AppJson<EntryRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let id = parse_id(&id, "blog entry")?;
    let draft = req.into_draft()?;
    let now = Utc::now();

    let entry = match state.db.get_entry_by_id(id).await {
        Ok(mut existing) => {
            existing.apply_update(draft, now);
            existing
        }
        Err(PortError::NotFound(_)) => {
            info!("Upsert of {} by {} creates a new entry", id, caller.username);
            BlogEntry::upserted(id, caller.id, draft, now)
        }
        Err(e) => return Err(e.into()),
    };
    state.db.save_entry(&entry).await?;

    let stored = state.db.get_entry_by_id(id).await?;
    Ok(Json(present_entry(state.db.as_ref(), stored).await?))
}

/// PATCH /api/entries/{id}/authors - Replace a single author or add a co-author
#[utoipa::path(
    patch,
    path = "/api/entries/{id}/authors",
    tag = "entries",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Entry id")),
    request_body = AssignAuthorRequest,
    responses(
        (status = 200, description = "Authors updated", body = EntryResponse),
        (status = 400, description = "Invalid author id", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Blog entry not found", body = ErrorBody)
    )
)]
pub async fn assign_author_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<AssignAuthorRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let id = parse_id(&id, "blog entry")?;
    let mut entry = state.db.get_entry_by_id(id).await?;
    let author_id = parse_id(&req.author_id, "author")?;

    entry.assign_author(author_id, Utc::now());
    state.db.save_entry(&entry).await?;

    let stored = state.db.get_entry_by_id(id).await?;
    Ok(Json(present_entry(state.db.as_ref(), stored).await?))
}

/// DELETE /api/entries/{id} - Deletes the entry and then its comments
#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    tag = "entries",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry and comments deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Blog entry not found", body = ErrorBody)
    )
)]
pub async fn delete_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "blog entry")?;
    state.db.delete_entry(id).await?;
    let removed = state.db.delete_comments_for_entry(id).await?;
    info!(
        "User {} deleted entry {} and {} comment(s)",
        caller.username, id, removed
    );

    Ok(Json(MessageResponse::new(
        "Blog entry and associated comments deleted successfully",
    )))
}

/// PATCH /api/entries/latest/hashtag - Tag the most recently created entry
#[utoipa::path(
    patch,
    path = "/api/entries/latest/hashtag",
    tag = "entries",
    security(("bearer_auth" = [])),
    request_body = HashtagRequest,
    responses(
        (status = 200, description = "The newest entry, tagged", body = EntryResponse),
        (status = 400, description = "Hashtag missing", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No entries exist", body = ErrorBody)
    )
)]
pub async fn tag_latest_entry_handler(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<HashtagRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let hashtag = req
        .hashtag
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::Validation("Hashtag is required".to_string()))?;

    let mut entry = state
        .db
        .find_entries(&EntryQuery::newest(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("No blog entries found".to_string()))?;

    if entry.add_hashtag(&hashtag, Utc::now()) {
        state.db.save_entry(&entry).await?;
        entry = state.db.get_entry_by_id(entry.id).await?;
    }

    Ok(Json(present_entry(state.db.as_ref(), entry).await?))
}

//=========================================================================================
// Listings
//=========================================================================================

/// GET /api/entries/user/{username}
#[utoipa::path(
    get,
    path = "/api/entries/user/{username}",
    tag = "entries",
    params(("username" = String, Path, description = "Author username")),
    responses(
        (status = 200, description = "Entries the user co-authors", body = Vec<EntryResponse>),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn entries_by_user_handler(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let user = state.db.get_user_by_username(&username).await?;
    let entries = state.db.find_entries(&EntryQuery::by_author(user.id)).await?;
    present_list(&state, entries).await
}

/// GET /api/entries/latest/two
#[utoipa::path(
    get,
    path = "/api/entries/latest/two",
    tag = "entries",
    responses((status = 200, description = "The two newest entries", body = Vec<EntryResponse>))
)]
pub async fn latest_entries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let entries = state.db.find_entries(&EntryQuery::newest(2)).await?;
    present_list(&state, entries).await
}

/// GET /api/entries/oldest/second
#[utoipa::path(
    get,
    path = "/api/entries/oldest/second",
    tag = "entries",
    responses(
        (status = 200, description = "The second-oldest entry", body = EntryResponse),
        (status = 404, description = "Fewer than two entries exist", body = ErrorBody)
    )
)]
pub async fn second_oldest_entry_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EntryResponse>, AppError> {
    let entry = state
        .db
        .find_entries(&EntryQuery::nth_oldest(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("No blog entry found".to_string()))?;
    Ok(Json(present_entry(state.db.as_ref(), entry).await?))
}

/// GET /api/entries/with/multiple-images
#[utoipa::path(
    get,
    path = "/api/entries/with/multiple-images",
    tag = "entries",
    responses((status = 200, description = "Entries with more than one image", body = Vec<EntryResponse>))
)]
pub async fn multiple_images_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let entries = state
        .db
        .find_entries(&EntryQuery::with_multiple_images())
        .await?;
    present_list(&state, entries).await
}

/// GET /api/entries/recent/with-links
#[utoipa::path(
    get,
    path = "/api/entries/recent/with-links",
    tag = "entries",
    responses((status = 200, description = "Entries from the last 7 days with at least one link", body = Vec<EntryResponse>))
)]
pub async fn recent_with_links_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let entries = state
        .db
        .find_entries(&EntryQuery::recent_with_links(Utc::now()))
        .await?;
    present_list(&state, entries).await
}

/// GET /api/entries/title-in-content
#[utoipa::path(
    get,
    path = "/api/entries/title-in-content",
    tag = "entries",
    responses((status = 200, description = "Entries whose content contains their title", body = Vec<EntryResponse>))
)]
pub async fn title_in_content_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EntryResponse>>, AppError> {
    let entries = state
        .db
        .find_entries(&EntryQuery::title_in_content())
        .await?;
    present_list(&state, entries).await
}
