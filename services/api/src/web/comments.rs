//! services/api/src/web/comments.rs
//!
//! Comment endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use football_blog_core::domain::EntryQuery;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::web::extract::{parse_id, require_non_empty, AppJson};
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::views::{present_comment, present_comments, CommentResponse, MessageResponse};

/// How many comments the per-user "latest" listing returns.
const LATEST_COMMENT_COUNT: usize = 2;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub entry_id: Uuid,
    pub content: String,
}

/// GET /api/comments/entry/{entry_id} - Newest first
#[utoipa::path(
    get,
    path = "/api/comments/entry/{entry_id}",
    tag = "comments",
    params(("entry_id" = String, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Comments on the entry, newest first", body = Vec<CommentResponse>),
        (status = 400, description = "Malformed id", body = ErrorBody)
    )
)]
pub async fn comments_for_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let entry_id = parse_id(&entry_id, "blog entry")?;
    let comments = state.db.list_comments_for_entry(entry_id).await?;
    Ok(Json(present_comments(state.db.as_ref(), comments, None).await?))
}

/// POST /api/comments
#[utoipa::path(
    post,
    path = "/api/comments",
    tag = "comments",
    security(("bearer_auth" = [])),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Comments are disabled on this entry", body = ErrorBody),
        (status = 404, description = "Blog entry not found", body = ErrorBody)
    )
)]
pub async fn create_comment_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_non_empty("content", &req.content)?;

    let entry = state.db.get_entry_by_id(req.entry_id).await?;
    let comment = entry.open_comment(caller.id, req.content, Utc::now())?;

    state.db.insert_comment(&comment).await?;
    info!("User {} commented on entry {}", caller.username, entry.id);

    let body = present_comment(state.db.as_ref(), comment).await?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /api/comments/latest/user/{username} - Latest comments on the user's entries
#[utoipa::path(
    get,
    path = "/api/comments/latest/user/{username}",
    tag = "comments",
    params(("username" = String, Path, description = "Username of the entries' author")),
    responses(
        (status = 200, description = "The two newest comments across the user's entries, with entry titles", body = Vec<CommentResponse>),
        (status = 404, description = "User not found or user has no entries", body = ErrorBody)
    )
)]
pub async fn latest_comments_for_user_handler(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let user = state.db.get_user_by_username(&username).await?;

    let entries = state.db.find_entries(&EntryQuery::by_author(user.id)).await?;
    if entries.is_empty() {
        return Err(AppError::NotFound(
            "No blog entries found for this user".to_string(),
        ));
    }

    let titles: HashMap<Uuid, String> = entries.into_iter().map(|e| (e.id, e.title)).collect();
    let entry_ids: Vec<Uuid> = titles.keys().copied().collect();

    let comments = state
        .db
        .latest_comments_for_entries(&entry_ids, LATEST_COMMENT_COUNT)
        .await?;
    Ok(Json(
        present_comments(state.db.as_ref(), comments, Some(&titles)).await?,
    ))
}

/// DELETE /api/comments/{id} - Authors may delete only their own comments
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Caller is not the comment's author", body = ErrorBody),
        (status = 404, description = "Comment not found", body = ErrorBody)
    )
)]
pub async fn delete_comment_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "comment")?;
    let comment = state.db.get_comment_by_id(id).await?;
    comment.ensure_deletable_by(caller.id)?;

    state.db.delete_comment(id).await?;
    info!("User {} deleted comment {}", caller.username, id);

    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
