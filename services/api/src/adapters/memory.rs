//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. It enforces the
//! same uniqueness rules as the SQL schema and is selected with
//! `DATABASE_URL=memory://`. The integration tests run against it.

use async_trait::async_trait;
use football_blog_core::domain::{
    BlogEntry, Category, Comment, EntryQuery, NewUser, User, UserCredentials,
};
use football_blog_core::ports::{DatabaseService, PortError, PortResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserCredentials>,
    categories: HashMap<Uuid, Category>,
    entries: HashMap<Uuid, BlogEntry>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn entry_clash(&self, entry: &BlogEntry) -> bool {
        self.entries.values().any(|other| other.clashes_with(entry))
    }

    fn category_name_taken(&self, category: &Category) -> bool {
        self.categories
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
    }
}

const DUPLICATE_ENTRY: &str = "A blog entry with this title already exists for this author";
const DUPLICATE_CATEGORY: &str = "Category with this name already exists";

#[derive(Default)]
pub struct MemoryAdapter {
    tables: RwLock<Tables>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseService for MemoryAdapter {
    async fn create_user(&self, user: &NewUser) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|c| c.user.username == user.username || c.user.email == user.email);
        if taken || tables.users.contains_key(&user.id) {
            return Err(PortError::Conflict("User already exists".to_string()));
        }
        let stored = user.to_user();
        tables.users.insert(
            user.id,
            UserCredentials {
                user: stored.clone(),
                password: user.password.clone(),
            },
        );
        Ok(stored)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<User> {
        self.get_credentials_by_username(username)
            .await
            .map(|c| c.user)
    }

    async fn get_credentials_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|c| c.user.username == username)
            .cloned()
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().map(|c| c.user.clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn get_users_by_ids(&self, user_ids: &[Uuid]) -> PortResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.users.get(id).map(|c| c.user.clone()))
            .collect())
    }

    async fn list_categories(&self) -> PortResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category_by_id(&self, category_id: Uuid) -> PortResult<Category> {
        let tables = self.tables.read().await;
        tables
            .categories
            .get(&category_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Category not found".to_string()))
    }

    async fn get_categories_by_ids(&self, category_ids: &[Uuid]) -> PortResult<Vec<Category>> {
        let tables = self.tables.read().await;
        Ok(category_ids
            .iter()
            .filter_map(|id| tables.categories.get(id).cloned())
            .collect())
    }

    async fn create_category(&self, category: &Category) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if tables.category_name_taken(category) || tables.categories.contains_key(&category.id) {
            return Err(PortError::Conflict(DUPLICATE_CATEGORY.to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(PortError::NotFound("Category not found".to_string()));
        }
        if tables.category_name_taken(category) {
            return Err(PortError::Conflict(DUPLICATE_CATEGORY.to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn find_entries(&self, query: &EntryQuery) -> PortResult<Vec<BlogEntry>> {
        let tables = self.tables.read().await;
        Ok(query.apply(tables.entries.values()))
    }

    async fn get_entry_by_id(&self, entry_id: Uuid) -> PortResult<BlogEntry> {
        let tables = self.tables.read().await;
        tables
            .entries
            .get(&entry_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Blog entry not found".to_string()))
    }

    async fn record_entry_view(&self, entry_id: Uuid) -> PortResult<BlogEntry> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .entries
            .get_mut(&entry_id)
            .ok_or_else(|| PortError::NotFound("Blog entry not found".to_string()))?;
        entry.impression_count += 1;
        Ok(entry.clone())
    }

    async fn insert_entry(&self, entry: &BlogEntry) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if tables.entries.contains_key(&entry.id) || tables.entry_clash(entry) {
            return Err(PortError::Conflict(DUPLICATE_ENTRY.to_string()));
        }
        tables.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn save_entry(&self, entry: &BlogEntry) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if tables.entry_clash(entry) {
            return Err(PortError::Conflict(DUPLICATE_ENTRY.to_string()));
        }
        // The counter and creation date belong to the stored row.
        let mut stored = entry.clone();
        if let Some(existing) = tables.entries.get(&entry.id) {
            stored.impression_count = existing.impression_count;
            stored.creation_date = existing.creation_date;
        }
        tables.entries.insert(entry.id, stored);
        Ok(())
    }

    async fn delete_entry(&self, entry_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .entries
            .remove(&entry_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound("Blog entry not found".to_string()))
    }

    async fn insert_comment(&self, comment: &Comment) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn get_comment_by_id(&self, comment_id: Uuid) -> PortResult<Comment> {
        let tables = self.tables.read().await;
        tables
            .comments
            .get(&comment_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Comment not found".to_string()))
    }

    async fn delete_comment(&self, comment_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&comment_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound("Comment not found".to_string()))
    }

    async fn delete_comments_for_entry(&self, entry_id: Uuid) -> PortResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|_, c| c.entry_id != entry_id);
        Ok((before - tables.comments.len()) as u64)
    }

    async fn list_comments_for_entry(&self, entry_id: Uuid) -> PortResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.entry_id == entry_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn latest_comments_for_entries(
        &self,
        entry_ids: &[Uuid],
        limit: usize,
    ) -> PortResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| entry_ids.contains(&c.entry_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments.truncate(limit);
        Ok(comments)
    }
}
