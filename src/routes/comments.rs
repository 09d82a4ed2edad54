use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::models::Comment;
use crate::db::{comments, posts, wire_timestamp};
use crate::error::{AppError, AppResult};
use crate::routes::{require, require_id};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comment", get(list))
        .route("/comment/create", post(create))
        .route("/comment/edit", post(edit))
        .route("/comment/delete", delete(remove))
}

#[derive(Deserialize)]
struct PostIdQuery {
    post_id: Option<i64>,
}

#[derive(Deserialize)]
struct CreateCommentRequest {
    post_id: Option<i64>,
    nickname: Option<String>,
    content: Option<String>,
    id: Option<String>,
}

#[derive(Deserialize)]
struct EditCommentRequest {
    comment_id: Option<i64>,
    content: Option<String>,
}

#[derive(Deserialize)]
struct CommentIdQuery {
    comment_id: Option<i64>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<PostIdQuery>,
) -> AppResult<Json<Vec<Comment>>> {
    let post_id = require_id(query.post_id, "post_id")?;
    let conn = state.db.get()?;
    Ok(Json(comments::for_post(&conn, post_id)?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCommentRequest>,
) -> AppResult<Json<Comment>> {
    let new = comments::NewComment {
        post_id: require_id(body.post_id, "post_id")?,
        nickname: require(body.nickname, "nickname")?,
        content: require(body.content, "content")?,
        author_id: require(body.id, "id")?,
    };
    let conn = state.db.get()?;
    // Commenting on a missing post is a 404, not a foreign-key 500
    if posts::get(&conn, new.post_id)?.is_none() {
        return Err(AppError::post_not_found());
    }
    let created = comments::create(&conn, &new, &wire_timestamp())?;
    tracing::info!(
        comment_id = created.comment_id,
        post_id = created.post_id,
        "comment created"
    );
    Ok(Json(created))
}

async fn edit(
    State(state): State<AppState>,
    Json(body): Json<EditCommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment_id = require_id(body.comment_id, "comment_id")?;
    let content = require(body.content, "content")?;
    let conn = state.db.get()?;
    let updated = comments::update_content(&conn, comment_id, &content, &wire_timestamp())?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;
    Ok(Json(updated))
}

async fn remove(
    State(state): State<AppState>,
    Query(query): Query<CommentIdQuery>,
) -> AppResult<Json<Value>> {
    let comment_id = require_id(query.comment_id, "comment_id")?;
    let conn = state.db.get()?;
    if !comments::delete(&conn, comment_id)? {
        return Err(AppError::NotFound("Comment not found.".to_string()));
    }
    Ok(Json(json!({ "deleted_comment_id": comment_id })))
}
