//! services/api/src/web/auth.rs
//!
//! User endpoints: registration, login, the current caller and the public
//! user listing.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use football_blog_core::domain::{NewUser, User};
use football_blog_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::web::extract::{require_non_empty, AppJson};
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::views::UserProfile;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("username", &self.username)?;
        require_non_empty("firstName", &self.first_name)?;
        require_non_empty("lastName", &self.last_name)?;
        require_non_empty("email", &self.email)?;
        require_non_empty("password", &self.password)?;
        Ok(())
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserProfile,
}

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    state.tokens.issue(user.id, &user.username).map_err(|e| {
        error!("Failed to sign token: {:?}", e);
        AppError::Internal("Failed to sign token".to_string())
    })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/users/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Invalid input or user already exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    // 1. Hash the password as part of building the user
    let new_user = NewUser::register(
        req.username.trim(),
        req.first_name,
        req.last_name,
        req.email.trim(),
        &req.password,
    )?;

    // 2. Persist, relying on the store's unique username/email constraints
    let user = state.db.create_user(&new_user).await?;
    info!("Registered user {}", user.username);

    // 3. Mint the token
    let token = issue_token(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /api/users/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Get user by username, normalised as on registration; an unknown user
    //    looks exactly like a wrong password
    let credentials = match state.db.get_credentials_by_username(req.username.trim()).await {
        Ok(credentials) => credentials,
        Err(PortError::NotFound(_)) => return Err(AppError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };

    // 2. Verify password
    if !credentials.password.verify(&req.password) {
        return Err(AppError::InvalidCredentials);
    }

    // 3. Mint the token
    let token = issue_token(&state, &credentials.user)?;

    Ok(Json(AuthResponse {
        token,
        user: credentials.user.into(),
    }))
}

/// GET /api/users - All users without password digests, sorted by username
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Users sorted by username", body = Vec<UserProfile>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// GET /api/users/me - The user behind the bearer token
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User no longer exists", body = ErrorBody)
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state.db.get_user_by_id(caller.id).await.map_err(|e| match e {
        PortError::NotFound(_) => AppError::NotFound("User not found".to_string()),
        other => other.into(),
    })?;
    Ok(Json(user.into()))
}
