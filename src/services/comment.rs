use crate::{
    error::{AppError, Result},
    models::comment::*,
};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

/// All mutable state behind one lock: the per-article forests plus the
/// process-wide id counter, so every operation is atomic as a whole.
struct Forest {
    discussions: HashMap<String, Vec<Comment>>,
    next_id: u64,
}

impl Forest {
    fn new() -> Self {
        Self {
            discussions: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory store for nested discussion threads. Each article key owns
/// an ordered list of root comments; replies live inside their parent's
/// `replies` list, so locating a comment is always a depth-first
/// pre-order walk over the article's forest.
#[derive(Clone)]
pub struct CommentService {
    forest: Arc<Mutex<Forest>>,
}

impl CommentService {
    pub fn new() -> Self {
        Self {
            forest: Arc::new(Mutex::new(Forest::new())),
        }
    }

    /// Root comments for an article, in creation order. Unknown article
    /// keys yield an empty list without creating an entry.
    pub fn list_comments(&self, article_id: &str) -> Vec<Comment> {
        let forest = self.forest.lock();
        forest
            .discussions
            .get(article_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn create_comment(
        &self,
        article_id: &str,
        request: CreateCommentRequest,
    ) -> Result<Comment> {
        debug!("Creating comment for article: {}", article_id);

        request.validate()?;

        let mut forest = self.forest.lock();

        // Resolve the parent before touching the counter or the mapping,
        // so a failed append leaves no id gap and no empty article entry.
        if let Some(parent_id) = request.parent_id {
            let roots = forest
                .discussions
                .get(article_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if find_comment(roots, parent_id).is_none() {
                return Err(AppError::not_found("Parent comment"));
            }
        }

        let id = forest.next_id;
        forest.next_id += 1;

        let comment = Comment {
            id,
            author: request.author,
            text: request.text,
            parent_id: request.parent_id,
            timestamp: Utc::now(),
            replies: Vec::new(),
            edited: false,
            edited_at: None,
        };

        let roots = forest.discussions.entry(article_id.to_string()).or_default();
        match request.parent_id {
            Some(parent_id) => {
                // Verified above under the same lock, so this cannot miss.
                let parent = find_comment_mut(roots, parent_id)
                    .ok_or_else(|| AppError::not_found("Parent comment"))?;
                parent.replies.push(comment.clone());
            }
            None => roots.push(comment.clone()),
        }

        Ok(comment)
    }

    pub fn update_comment(
        &self,
        article_id: &str,
        comment_id: u64,
        request: UpdateCommentRequest,
    ) -> Result<Comment> {
        debug!("Updating comment {} on article: {}", comment_id, article_id);

        request.validate()?;

        let mut forest = self.forest.lock();
        let roots = forest
            .discussions
            .get_mut(article_id)
            .ok_or_else(|| AppError::not_found("Article"))?;
        let comment = find_comment_mut(roots, comment_id)
            .ok_or_else(|| AppError::not_found("Comment"))?;

        comment.text = request.text;
        comment.edited = true;
        comment.edited_at = Some(Utc::now());

        Ok(comment.clone())
    }

    /// Removes a comment and its entire reply subtree. The article entry
    /// stays in the mapping even when its last comment is removed.
    pub fn delete_comment(&self, article_id: &str, comment_id: u64) -> Result<()> {
        debug!("Deleting comment {} on article: {}", comment_id, article_id);

        let mut forest = self.forest.lock();
        let roots = forest
            .discussions
            .get_mut(article_id)
            .ok_or_else(|| AppError::not_found("Article"))?;

        if !remove_comment(roots, comment_id) {
            return Err(AppError::not_found("Comment"));
        }

        Ok(())
    }

    /// Total comments for one article, counting every level of replies.
    pub fn count_comments(&self, article_id: &str) -> usize {
        let forest = self.forest.lock();
        forest
            .discussions
            .get(article_id)
            .map(|roots| count_comments(roots))
            .unwrap_or(0)
    }

    /// Every known article key with its recursive comment count.
    pub fn list_articles(&self) -> Vec<ArticleSummary> {
        let forest = self.forest.lock();
        forest
            .discussions
            .iter()
            .map(|(article_id, roots)| ArticleSummary {
                article_id: article_id.clone(),
                comment_count: count_comments(roots),
            })
            .collect()
    }
}

impl Default for CommentService {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first pre-order search: each node before its replies, siblings
/// in list order. Ids are unique so the first match is the only one.
fn find_comment(comments: &[Comment], comment_id: u64) -> Option<&Comment> {
    for comment in comments {
        if comment.id == comment_id {
            return Some(comment);
        }
        if let Some(found) = find_comment(&comment.replies, comment_id) {
            return Some(found);
        }
    }
    None
}

fn find_comment_mut(comments: &mut [Comment], comment_id: u64) -> Option<&mut Comment> {
    for comment in comments.iter_mut() {
        if comment.id == comment_id {
            return Some(comment);
        }
        if let Some(found) = find_comment_mut(&mut comment.replies, comment_id) {
            return Some(found);
        }
    }
    None
}

/// Detaches the first pre-order match from whichever list owns it,
/// dropping its whole subtree. Returns false when no id matched.
fn remove_comment(comments: &mut Vec<Comment>, comment_id: u64) -> bool {
    for i in 0..comments.len() {
        if comments[i].id == comment_id {
            comments.remove(i);
            return true;
        }
        if remove_comment(&mut comments[i].replies, comment_id) {
            return true;
        }
    }
    false
}

fn count_comments(comments: &[Comment]) -> usize {
    comments
        .iter()
        .map(|comment| 1 + count_comments(&comment.replies))
        .sum()
}
