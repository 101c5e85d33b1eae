use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single comment node. Replies are owned by their parent, so one
/// article's comments form a forest of trees; `parent_id` is kept as
/// informational metadata and is never used for traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub text: String,
    pub parent_id: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub replies: Vec<Comment>,
    pub edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1))]
    pub text: String,
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1))]
    pub text: String,
}

/// One row of the article index: an article key plus its recursive
/// comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub article_id: String,
    pub comment_count: usize,
}
