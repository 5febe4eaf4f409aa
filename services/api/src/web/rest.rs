//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification of the REST API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorBody;
use crate::web::{auth, categories, comments, entries, views};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::list_users_handler,
        auth::me_handler,
        categories::list_categories_handler,
        categories::get_category_handler,
        categories::create_category_handler,
        categories::update_category_handler,
        entries::list_entries_handler,
        entries::get_entry_handler,
        entries::create_entry_handler,
        entries::upsert_entry_handler,
        entries::assign_author_handler,
        entries::delete_entry_handler,
        entries::tag_latest_entry_handler,
        entries::entries_by_user_handler,
        entries::latest_entries_handler,
        entries::second_oldest_entry_handler,
        entries::multiple_images_handler,
        entries::recent_with_links_handler,
        entries::title_in_content_handler,
        comments::comments_for_entry_handler,
        comments::create_comment_handler,
        comments::latest_comments_for_user_handler,
        comments::delete_comment_handler,
    ),
    components(
        schemas(
            ErrorBody,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            categories::CreateCategoryRequest,
            categories::UpdateCategoryRequest,
            entries::EntryRequest,
            entries::AssignAuthorRequest,
            entries::HashtagRequest,
            comments::CreateCommentRequest,
            views::UserProfile,
            views::AuthorSummary,
            views::CategoryResponse,
            views::CategorySummary,
            views::MessageResponse,
            views::ImageBody,
            views::LinkBody,
            views::PredictionBody,
            views::EntryResponse,
            views::CommentResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Registration, login and user listing."),
        (name = "categories", description = "Category reference data."),
        (name = "entries", description = "Blog entries and their specialty listings."),
        (name = "comments", description = "Comments on blog entries.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
