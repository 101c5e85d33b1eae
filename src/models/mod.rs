pub mod comment;

pub use comment::{ArticleSummary, Comment, CreateCommentRequest, UpdateCommentRequest};
