use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::models::Post;
use crate::db::{posts, wire_timestamp};
use crate::error::{AppError, AppResult};
use crate::routes::{require, require_id};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/post", get(list))
        .route("/post/check", get(check))
        .route("/post/create", post(create))
        .route("/post/edit", post(edit))
        .route("/post/delete", delete(remove))
        .route("/post/increase-views", post(increase_views))
}

#[derive(Deserialize)]
struct PostIdQuery {
    post_id: Option<i64>,
}

#[derive(Deserialize)]
struct CreatePostRequest {
    title: Option<String>,
    nickname: Option<String>,
    content: Option<String>,
    id: Option<String>,
}

#[derive(Deserialize)]
struct EditPostRequest {
    post_id: Option<i64>,
    title: Option<String>,
    nickname: Option<String>,
    content: Option<String>,
    id: Option<String>,
}

#[derive(Deserialize)]
struct IncreaseViewsRequest {
    post_id: Option<i64>,
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get()?;
    Ok(Json(posts::list(&conn)?))
}

async fn check(
    State(state): State<AppState>,
    Query(query): Query<PostIdQuery>,
) -> AppResult<Json<Post>> {
    let post_id = require_id(query.post_id, "post_id")?;
    let conn = state.db.get()?;
    let post = posts::get(&conn, post_id)?.ok_or_else(AppError::post_not_found)?;
    Ok(Json(post))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreatePostRequest>,
) -> AppResult<Json<Post>> {
    let new = posts::NewPost {
        title: require(body.title, "title")?,
        nickname: require(body.nickname, "nickname")?,
        content: require(body.content, "content")?,
        author_id: require(body.id, "id")?,
    };
    let conn = state.db.get()?;
    let created = posts::create(&conn, &new, &wire_timestamp())?;
    tracing::info!(post_id = created.post_id, "post created");
    Ok(Json(created))
}

async fn edit(
    State(state): State<AppState>,
    Json(body): Json<EditPostRequest>,
) -> AppResult<Json<Post>> {
    let post_id = require_id(body.post_id, "post_id")?;
    let new = posts::NewPost {
        title: require(body.title, "title")?,
        nickname: require(body.nickname, "nickname")?,
        content: require(body.content, "content")?,
        author_id: require(body.id, "id")?,
    };
    let conn = state.db.get()?;
    let updated =
        posts::update(&conn, post_id, &new, &wire_timestamp())?.ok_or_else(AppError::post_not_found)?;
    Ok(Json(updated))
}

async fn remove(
    State(state): State<AppState>,
    Query(query): Query<PostIdQuery>,
) -> AppResult<Json<Value>> {
    let post_id = require_id(query.post_id, "post_id")?;
    let mut conn = state.db.get()?;
    if !posts::delete_cascade(&mut conn, post_id)? {
        return Err(AppError::post_not_found());
    }
    tracing::info!(post_id, "post deleted with its comments");
    Ok(Json(json!({ "deleted_post_id": post_id })))
}

async fn increase_views(
    State(state): State<AppState>,
    Json(body): Json<IncreaseViewsRequest>,
) -> AppResult<Json<Post>> {
    let post_id = require_id(body.post_id, "post_id")?;
    let conn = state.db.get()?;
    let post = posts::increment_views(&conn, post_id)?.ok_or_else(AppError::post_not_found)?;
    Ok(Json(post))
}
