//! crates/football_blog_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete datastore.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogEntry, Category, Comment, EntryQuery, NewUser, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A uniqueness constraint would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users ---
    /// Fails with `Conflict` when the username or email is taken.
    async fn create_user(&self, user: &NewUser) -> PortResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_username(&self, username: &str) -> PortResult<User>;

    async fn get_credentials_by_username(&self, username: &str) -> PortResult<UserCredentials>;

    /// All users, sorted by username ascending.
    async fn list_users(&self) -> PortResult<Vec<User>>;

    /// Unknown ids are skipped.
    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> PortResult<Vec<User>>;

    // --- Categories ---
    async fn list_categories(&self) -> PortResult<Vec<Category>>;

    async fn get_category_by_id(&self, category_id: Uuid) -> PortResult<Category>;

    /// Unknown ids are skipped.
    async fn get_categories_by_ids(&self, category_ids: &[Uuid]) -> PortResult<Vec<Category>>;

    /// Fails with `Conflict` when the name is taken.
    async fn create_category(&self, category: &Category) -> PortResult<()>;

    /// Fails with `NotFound` for an unknown id and `Conflict` when the new name is taken.
    async fn update_category(&self, category: &Category) -> PortResult<()>;

    // --- Blog entries ---
    async fn find_entries(&self, query: &EntryQuery) -> PortResult<Vec<BlogEntry>>;

    async fn get_entry_by_id(&self, entry_id: Uuid) -> PortResult<BlogEntry>;

    /// Atomically bumps the view counter and returns the entry as it is afterwards.
    async fn record_entry_view(&self, entry_id: Uuid) -> PortResult<BlogEntry>;

    /// Fails with `Conflict` on a duplicate id or (title, primary author) pair.
    async fn insert_entry(&self, entry: &BlogEntry) -> PortResult<()>;

    /// Inserts or fully replaces the entry with the same id.
    /// Fails with `Conflict` on a duplicate (title, primary author) pair.
    async fn save_entry(&self, entry: &BlogEntry) -> PortResult<()>;

    async fn delete_entry(&self, entry_id: Uuid) -> PortResult<()>;

    // --- Comments ---
    async fn insert_comment(&self, comment: &Comment) -> PortResult<()>;

    async fn get_comment_by_id(&self, comment_id: Uuid) -> PortResult<Comment>;

    async fn delete_comment(&self, comment_id: Uuid) -> PortResult<()>;

    /// Returns how many comments were removed.
    async fn delete_comments_for_entry(&self, entry_id: Uuid) -> PortResult<u64>;

    /// Newest first.
    async fn list_comments_for_entry(&self, entry_id: Uuid) -> PortResult<Vec<Comment>>;

    /// The `limit` newest comments across all of `entry_ids`.
    async fn latest_comments_for_entries(
        &self,
        entry_ids: &[Uuid],
        limit: usize,
    ) -> PortResult<Vec<Comment>>;
}
