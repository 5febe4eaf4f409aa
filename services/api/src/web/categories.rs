//! services/api/src/web/categories.rs
//!
//! Category reference data. Any authenticated caller may create or edit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use football_blog_core::domain::Category;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::web::extract::{parse_id, require_non_empty, AppJson};
use crate::web::state::AppState;
use crate::web::views::CategoryResponse;

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: String,
}

/// Partial edit; empty or absent fields are left unchanged.
#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = state.db.list_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// GET /api/categories/{id}
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category", body = CategoryResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    )
)]
pub async fn get_category_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let id = parse_id(&id, "category")?;
    let category = state.db.get_category_by_id(id).await?;
    Ok(Json(category.into()))
}

/// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid input or duplicate name", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_category_handler(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_non_empty("name", &req.name)?;
    require_non_empty("description", &req.description)?;

    let category = Category::new(req.name.trim(), req.description);
    state.db.create_category(&category).await?;
    info!("Created category {}", category.name);

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// PATCH /api/categories/{id}
#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid input or duplicate name", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    )
)]
pub async fn update_category_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let id = parse_id(&id, "category")?;
    let mut category = state.db.get_category_by_id(id).await?;

    category.apply_changes(req.name.map(|n| n.trim().to_string()), req.description);
    state.db.update_category(&category).await?;

    Ok(Json(category.into()))
}
