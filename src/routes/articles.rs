use crate::{
    error::Result,
    models::comment::*,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_articles))
        .route(
            "/:article_id/comments",
            get(get_comments).post(create_comment),
        )
        .route(
            "/:article_id/comments/:comment_id",
            put(update_comment).delete(delete_comment),
        )
}

async fn list_articles(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let articles = state.comment_service.list_articles();

    Ok(Json(json!({
        "articles": articles
    })))
}

async fn get_comments(
    State(state): State<Arc<AppState>>,
    Path(article_id): Path<String>,
) -> Result<Json<Value>> {
    let comments = state.comment_service.list_comments(&article_id);

    Ok(Json(json!({
        "article_id": article_id,
        "comments": comments
    })))
}

async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(article_id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    let comment = state.comment_service.create_comment(&article_id, request)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path((article_id, comment_id)): Path<(String, u64)>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>> {
    let comment = state
        .comment_service
        .update_comment(&article_id, comment_id, request)?;

    Ok(Json(comment))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((article_id, comment_id)): Path<(String, u64)>,
) -> Result<Json<Value>> {
    state.comment_service.delete_comment(&article_id, comment_id)?;

    Ok(Json(json!({
        "message": "Comment deleted",
        "comment_id": comment_id
    })))
}
