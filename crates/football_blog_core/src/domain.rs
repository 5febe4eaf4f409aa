//! crates/football_blog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application together with
//! the lifecycle rules that govern them.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::password::PasswordDigest;
use crate::ports::PortResult;

//=========================================================================================
// Users
//=========================================================================================

/// Represents a user - used throughout app. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password: PasswordDigest,
}

/// A user about to be registered. The only way to build one is
/// [`NewUser::register`], which always hashes the password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: PasswordDigest,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn register(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> PortResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: PasswordDigest::hash(password)?,
            created_at: Utc::now(),
        })
    }

    /// The public part of the user as it will look once stored.
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

//=========================================================================================
// Categories
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Applies a partial edit. Empty values leave the field untouched.
    pub fn apply_changes(&mut self, name: Option<String>, description: Option<String>) {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            self.description = description;
        }
    }
}

//=========================================================================================
// Blog entries and their embedded records
//=========================================================================================

/// An inline image, stored as an encoded payload (usually a base64 data URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub data: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: String,
}

/// Star rating attached to a prediction, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Confidence(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("confidence must be between 1 and 5, got {0}")]
pub struct InvalidConfidence(pub i64);

impl Confidence {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, InvalidConfidence> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidConfidence(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A forecast for a single football match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub predicted_score: String,
    pub match_date: DateTime<Utc>,
    pub confidence: Confidence,
}

/// A blog post. `authors` is never empty and its first element is the
/// primary author used by the (title, primary author) uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogEntry {
    pub id: Uuid,
    pub title: String,
    pub authors: Vec<Uuid>,
    pub description: String,
    pub content: String,
    pub creation_date: DateTime<Utc>,
    pub edit_dates: Vec<DateTime<Utc>>,
    pub impression_count: i64,
    pub comments_allowed: bool,
    pub category_id: Uuid,
    pub images: Vec<Image>,
    pub links: Vec<Link>,
    pub hashtags: Vec<String>,
    pub predictions: Vec<Prediction>,
}

/// The caller-supplied part of an entry, used both for creation and for
/// full updates. Optional fields fall back to defaults on creation and are
/// left untouched on update.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_id: Uuid,
    pub comments_allowed: Option<bool>,
    pub images: Option<Vec<Image>>,
    pub links: Option<Vec<Link>>,
    pub hashtags: Option<Vec<String>>,
    pub predictions: Option<Vec<Prediction>>,
}

impl BlogEntry {
    /// Builds a brand new entry with `author` as its sole author.
    pub fn create(id: Uuid, author: Uuid, draft: EntryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            authors: vec![author],
            description: draft.description,
            content: draft.content,
            creation_date: now,
            edit_dates: Vec::new(),
            impression_count: 0,
            comments_allowed: draft.comments_allowed.unwrap_or(true),
            category_id: draft.category_id,
            images: draft.images.unwrap_or_default(),
            links: draft.links.unwrap_or_default(),
            hashtags: draft.hashtags.unwrap_or_default(),
            predictions: draft.predictions.unwrap_or_default(),
        }
    }

    /// Upsert path for an id that does not exist yet: a fresh entry whose
    /// edit history already holds the upsert itself.
    pub fn upserted(id: Uuid, author: Uuid, draft: EntryDraft, now: DateTime<Utc>) -> Self {
        let mut entry = Self::create(id, author, draft, now);
        entry.record_edit(now);
        entry
    }

    /// Replaces the required fields, and the optional ones only when present.
    pub fn apply_update(&mut self, draft: EntryDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.description = draft.description;
        self.content = draft.content;
        self.category_id = draft.category_id;
        if let Some(allowed) = draft.comments_allowed {
            self.comments_allowed = allowed;
        }
        if let Some(images) = draft.images {
            self.images = images;
        }
        if let Some(links) = draft.links {
            self.links = links;
        }
        if let Some(hashtags) = draft.hashtags {
            self.hashtags = hashtags;
        }
        if let Some(predictions) = draft.predictions {
            self.predictions = predictions;
        }
        self.record_edit(now);
    }

    pub fn record_edit(&mut self, now: DateTime<Utc>) {
        self.edit_dates.push(now);
    }

    /// Co-author handling: an entry with several authors gains `author` (once),
    /// a single-author entry has its author replaced.
    pub fn assign_author(&mut self, author: Uuid, now: DateTime<Utc>) {
        if self.authors.len() > 1 {
            if !self.authors.contains(&author) {
                self.authors.push(author);
            }
        } else {
            self.authors = vec![author];
        }
        self.record_edit(now);
    }

    /// Adds a hashtag unless it is already present. Returns whether the entry changed.
    pub fn add_hashtag(&mut self, hashtag: &str, now: DateTime<Utc>) -> bool {
        if self.hashtags.iter().any(|h| h == hashtag) {
            return false;
        }
        self.hashtags.push(hashtag.to_string());
        self.record_edit(now);
        true
    }

    pub fn primary_author(&self) -> Option<Uuid> {
        self.authors.first().copied()
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.authors.contains(&user_id)
    }

    pub fn has_multiple_images(&self) -> bool {
        self.images.len() > 1
    }

    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }

    /// Literal, case-sensitive substring check.
    pub fn mentions_own_title(&self) -> bool {
        self.content.contains(&self.title)
    }

    /// Whether (title, primary author) collides with `other`.
    pub fn clashes_with(&self, other: &BlogEntry) -> bool {
        self.id != other.id
            && self.title == other.title
            && self.primary_author() == other.primary_author()
    }

    /// Opens a new comment on this entry, provided comments are allowed.
    pub fn open_comment(
        &self,
        author_id: Uuid,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Comment, LifecycleError> {
        if !self.comments_allowed {
            return Err(LifecycleError::CommentsClosed);
        }
        Ok(Comment {
            id: Uuid::new_v4(),
            entry_id: self.id,
            author_id,
            content: content.into(),
            created_at: now,
            updated_at: now,
        })
    }
}

//=========================================================================================
// Entry queries
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// A filter over blog entries, ordered by creation date and then paged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub author: Option<Uuid>,
    pub min_images: Option<usize>,
    pub created_since: Option<DateTime<Utc>>,
    pub with_links: bool,
    pub title_in_content: bool,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl EntryQuery {
    pub const RECENT_WINDOW_DAYS: i64 = 7;

    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_author(author: Uuid) -> Self {
        Self {
            author: Some(author),
            ..Self::default()
        }
    }

    pub fn with_multiple_images() -> Self {
        Self {
            min_images: Some(2),
            ..Self::default()
        }
    }

    /// Entries from the last week that carry at least one link.
    pub fn recent_with_links(now: DateTime<Utc>) -> Self {
        Self {
            created_since: Some(now - Duration::days(Self::RECENT_WINDOW_DAYS)),
            with_links: true,
            ..Self::default()
        }
    }

    pub fn title_in_content() -> Self {
        Self {
            title_in_content: true,
            ..Self::default()
        }
    }

    pub fn newest(limit: usize) -> Self {
        Self {
            order: SortOrder::NewestFirst,
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// The entry at `position` (zero based) when sorted oldest first.
    pub fn nth_oldest(position: usize) -> Self {
        Self {
            order: SortOrder::OldestFirst,
            offset: position,
            limit: Some(1),
            ..Self::default()
        }
    }

    /// Whether `entry` passes the filter part of the query (ordering and
    /// paging are applied separately).
    pub fn matches(&self, entry: &BlogEntry) -> bool {
        if let Some(author) = self.author {
            if !entry.is_authored_by(author) {
                return false;
            }
        }
        if let Some(min) = self.min_images {
            if entry.images.len() < min {
                return false;
            }
        }
        if let Some(since) = self.created_since {
            if entry.creation_date < since {
                return false;
            }
        }
        if self.with_links && !entry.has_links() {
            return false;
        }
        if self.title_in_content && !entry.mentions_own_title() {
            return false;
        }
        true
    }

    /// Runs the whole query over an in-memory collection.
    pub fn apply<'a, I>(&self, entries: I) -> Vec<BlogEntry>
    where
        I: IntoIterator<Item = &'a BlogEntry>,
    {
        let mut selected: Vec<BlogEntry> = entries
            .into_iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        match self.order {
            SortOrder::OldestFirst => selected.sort_by_key(|e| e.creation_date),
            SortOrder::NewestFirst => {
                selected.sort_by_key(|e| std::cmp::Reverse(e.creation_date))
            }
        }
        let paged = selected.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => paged.take(limit).collect(),
            None => paged.collect(),
        }
    }
}

//=========================================================================================
// Comments
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Only the author of a comment may delete it.
    pub fn ensure_deletable_by(&self, user_id: Uuid) -> Result<(), LifecycleError> {
        if self.author_id == user_id {
            Ok(())
        } else {
            Err(LifecycleError::NotCommentAuthor)
        }
    }
}

/// Transitions refused by the entry/comment lifecycle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Comments are not allowed for this blog entry")]
    CommentsClosed,
    #[error("You can only delete your own comments")]
    NotCommentAuthor,
}
