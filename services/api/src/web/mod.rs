pub mod auth;
pub mod categories;
pub mod comments;
pub mod entries;
pub mod extract;
pub mod middleware;
pub mod rest;
pub mod router;
pub mod state;
pub mod token;
pub mod views;

// Re-export what the binaries and integration tests need to stand the
// server up.
pub use middleware::require_auth;
pub use router::build_router;
pub use state::AppState;
