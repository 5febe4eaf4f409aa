//! services/api/src/web/views.rs
//!
//! JSON shapes shared by the handlers, and the projections that resolve
//! author and category references for responses.

use chrono::{DateTime, Utc};
use football_blog_core::domain::{
    BlogEntry, Category, Comment, Confidence, Image, Link, Prediction, User,
};
use football_blog_core::ports::{DatabaseService, PortError, PortResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::web::extract::require_non_empty;

//=========================================================================================
// Users and categories
//=========================================================================================

/// A user without the password digest.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// The author projection embedded in entries and comments.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

/// Plain acknowledgement, e.g. after a delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//=========================================================================================
// Embedded entry records (used in both directions)
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ImageBody {
    /// Inline payload, usually a base64 data URL.
    pub data: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LinkBody {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PredictionBody {
    pub home_team: String,
    pub away_team: String,
    #[schema(example = "2-1")]
    pub predicted_score: String,
    pub match_date: DateTime<Utc>,
    /// Star rating from 1 to 5.
    #[schema(minimum = 1, maximum = 5)]
    pub confidence: i64,
}

impl ImageBody {
    pub fn into_domain(self) -> Result<Image, AppError> {
        require_non_empty("image data", &self.data)?;
        Ok(Image {
            data: self.data,
            caption: self.caption,
        })
    }
}

impl LinkBody {
    pub fn into_domain(self) -> Result<Link, AppError> {
        require_non_empty("link url", &self.url)?;
        require_non_empty("link title", &self.title)?;
        Ok(Link {
            url: self.url,
            title: self.title,
        })
    }
}

impl PredictionBody {
    pub fn into_domain(self) -> Result<Prediction, AppError> {
        require_non_empty("homeTeam", &self.home_team)?;
        require_non_empty("awayTeam", &self.away_team)?;
        require_non_empty("predictedScore", &self.predicted_score)?;
        Ok(Prediction {
            home_team: self.home_team,
            away_team: self.away_team,
            predicted_score: self.predicted_score,
            match_date: self.match_date,
            confidence: Confidence::new(self.confidence)?,
        })
    }
}

impl From<&Image> for ImageBody {
    fn from(image: &Image) -> Self {
        Self {
            data: image.data.clone(),
            caption: image.caption.clone(),
        }
    }
}

impl From<&Link> for LinkBody {
    fn from(link: &Link) -> Self {
        Self {
            url: link.url.clone(),
            title: link.title.clone(),
        }
    }
}

impl From<&Prediction> for PredictionBody {
    fn from(p: &Prediction) -> Self {
        Self {
            home_team: p.home_team.clone(),
            away_team: p.away_team.clone(),
            predicted_score: p.predicted_score.clone(),
            match_date: p.match_date,
            confidence: i64::from(p.confidence.get()),
        }
    }
}

//=========================================================================================
// Entries and comments
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: Uuid,
    pub title: String,
    pub authors: Vec<AuthorSummary>,
    pub description: String,
    pub content: String,
    pub creation_date: DateTime<Utc>,
    pub edit_dates: Vec<DateTime<Utc>>,
    pub impression_count: i64,
    pub comments_allowed: bool,
    /// `null` when the referenced category no longer exists.
    pub category: Option<CategorySummary>,
    pub images: Vec<ImageBody>,
    pub links: Vec<LinkBody>,
    pub hashtags: Vec<String>,
    pub predictions: Vec<PredictionBody>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub entry_id: Uuid,
    /// Present on the "latest comments" listing only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_title: Option<String>,
    /// `null` when the author no longer exists.
    pub author: Option<AuthorSummary>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

async fn authors_by_id(
    db: &dyn DatabaseService,
    ids: impl Iterator<Item = Uuid>,
) -> PortResult<HashMap<Uuid, AuthorSummary>> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let users = db.get_users_by_ids(&ids).await?;
    Ok(users.iter().map(|u| (u.id, AuthorSummary::from(u))).collect())
}

/// Resolves authors and categories for a batch of entries, keeping their order.
pub async fn present_entries(
    db: &dyn DatabaseService,
    entries: Vec<BlogEntry>,
) -> PortResult<Vec<EntryResponse>> {
    let authors = authors_by_id(db, entries.iter().flat_map(|e| e.authors.iter().copied())).await?;
    let category_ids = unique_ids(entries.iter().map(|e| e.category_id));
    let categories: HashMap<Uuid, CategorySummary> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        db.get_categories_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, CategorySummary { id: c.id, name: c.name }))
            .collect()
    };

    Ok(entries
        .into_iter()
        .map(|entry| EntryResponse {
            id: entry.id,
            authors: entry
                .authors
                .iter()
                .filter_map(|id| authors.get(id).cloned())
                .collect(),
            category: categories.get(&entry.category_id).cloned(),
            images: entry.images.iter().map(ImageBody::from).collect(),
            links: entry.links.iter().map(LinkBody::from).collect(),
            predictions: entry.predictions.iter().map(PredictionBody::from).collect(),
            title: entry.title,
            description: entry.description,
            content: entry.content,
            creation_date: entry.creation_date,
            edit_dates: entry.edit_dates,
            impression_count: entry.impression_count,
            comments_allowed: entry.comments_allowed,
            hashtags: entry.hashtags,
        })
        .collect())
}

pub async fn present_entry(db: &dyn DatabaseService, entry: BlogEntry) -> PortResult<EntryResponse> {
    present_entries(db, vec![entry])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| PortError::Unexpected("Entry projection came back empty".to_string()))
}

/// Resolves comment authors. With `entry_titles`, each comment also carries
/// the title of the entry it belongs to.
pub async fn present_comments(
    db: &dyn DatabaseService,
    comments: Vec<Comment>,
    entry_titles: Option<&HashMap<Uuid, String>>,
) -> PortResult<Vec<CommentResponse>> {
    let authors = authors_by_id(db, comments.iter().map(|c| c.author_id)).await?;
    Ok(comments
        .into_iter()
        .map(|c| CommentResponse {
            id: c.id,
            entry_id: c.entry_id,
            entry_title: entry_titles.and_then(|titles| titles.get(&c.entry_id).cloned()),
            author: authors.get(&c.author_id).cloned(),
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
        })
        .collect())
}

pub async fn present_comment(db: &dyn DatabaseService, comment: Comment) -> PortResult<CommentResponse> {
    present_comments(db, vec![comment], None)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| PortError::Unexpected("Comment projection came back empty".to_string()))
}
