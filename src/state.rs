use crate::{config::Config, services::comment::CommentService};

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,

    /// The in-memory comment forest store
    pub comment_service: CommentService,
}
