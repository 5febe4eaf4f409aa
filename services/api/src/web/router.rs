//! services/api/src/web/router.rs
//!
//! Assembles the full HTTP application: public routes, bearer-protected
//! routes, the Swagger UI and the shared layers.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    auth, categories, comments, entries, middleware::require_auth, rest::ApiDoc, state::AppState,
};

/// Inline base64 images make entry bodies large.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    match allowed_origin.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => base.allow_origin(origin),
        Some(Err(_)) => {
            warn!("CORS_ALLOWED_ORIGIN is not a valid header value; allowing any origin");
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}

/// Builds the router with its state applied.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/users/register", post(auth::register_handler))
        .route("/api/users/login", post(auth::login_handler))
        .route("/api/users", get(auth::list_users_handler))
        .route("/api/categories", get(categories::list_categories_handler))
        .route("/api/categories/{id}", get(categories::get_category_handler))
        .route("/api/entries", get(entries::list_entries_handler))
        .route("/api/entries/{id}", get(entries::get_entry_handler))
        .route("/api/entries/user/{username}", get(entries::entries_by_user_handler))
        .route("/api/entries/latest/two", get(entries::latest_entries_handler))
        .route("/api/entries/oldest/second", get(entries::second_oldest_entry_handler))
        .route("/api/entries/with/multiple-images", get(entries::multiple_images_handler))
        .route("/api/entries/recent/with-links", get(entries::recent_with_links_handler))
        .route("/api/entries/title-in-content", get(entries::title_in_content_handler))
        .route("/api/comments/entry/{entry_id}", get(comments::comments_for_entry_handler))
        .route(
            "/api/comments/latest/user/{username}",
            get(comments::latest_comments_for_user_handler),
        );

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/users/me", get(auth::me_handler))
        .route("/api/categories", post(categories::create_category_handler))
        .route("/api/categories/{id}", patch(categories::update_category_handler))
        .route("/api/entries", post(entries::create_entry_handler))
        .route(
            "/api/entries/{id}",
            put(entries::upsert_entry_handler).delete(entries::delete_entry_handler),
        )
        .route("/api/entries/{id}/authors", patch(entries::assign_author_handler))
        .route("/api/entries/latest/hashtag", patch(entries::tag_latest_entry_handler))
        .route("/api/comments", post(comments::create_comment_handler))
        .route("/api/comments/{id}", delete(comments::delete_comment_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
