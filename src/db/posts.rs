use rusqlite::{params, Connection, Row};

use crate::db::models::Post;

pub struct NewPost {
    pub title: String,
    pub nickname: String,
    pub content: String,
    pub author_id: String,
}

fn post_from_row(row: &Row) -> rusqlite::Result<Post> {
    Ok(Post {
        post_id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        nickname: row.get(3)?,
        author_id: row.get(4)?,
        view_count: row.get(5)?,
        uploaded_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const POST_COLUMNS: &str =
    "post_id, title, content, nickname, author_id, view_count, uploaded_at, updated_at";

/// All posts, newest first.
pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY post_id DESC"
    ))?;
    let rows = stmt.query_map([], post_from_row)?;
    rows.collect()
}

pub fn get(conn: &Connection, post_id: i64) -> rusqlite::Result<Option<Post>> {
    let result = conn.query_row(
        &format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?1"),
        params![post_id],
        post_from_row,
    );
    match result {
        Ok(post) => Ok(Some(post)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Insert a post and return it. `post_id` is server-assigned.
pub fn create(conn: &Connection, new: &NewPost, timestamp: &str) -> rusqlite::Result<Post> {
    conn.execute(
        "INSERT INTO posts (title, content, nickname, author_id, uploaded_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![new.title, new.content, new.nickname, new.author_id, timestamp],
    )?;
    let post_id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?1"),
        params![post_id],
        post_from_row,
    )
}

/// Full overwrite of the mutable fields. Returns `None` if the post does
/// not exist.
pub fn update(
    conn: &Connection,
    post_id: i64,
    new: &NewPost,
    timestamp: &str,
) -> rusqlite::Result<Option<Post>> {
    let changed = conn.execute(
        "UPDATE posts SET title = ?1, content = ?2, nickname = ?3, author_id = ?4, updated_at = ?5
         WHERE post_id = ?6",
        params![new.title, new.content, new.nickname, new.author_id, timestamp, post_id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get(conn, post_id)
}

/// Additive increment, never a read-modify-write: concurrent calls each
/// add exactly 1. Returns the updated post, `None` if it does not exist.
pub fn increment_views(conn: &Connection, post_id: i64) -> rusqlite::Result<Option<Post>> {
    let changed = conn.execute(
        "UPDATE posts SET view_count = view_count + 1 WHERE post_id = ?1",
        params![post_id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get(conn, post_id)
}

/// Delete a post and its comments in one transaction, so a failure cannot
/// leave orphaned comments. Returns whether the post existed.
pub fn delete_cascade(conn: &mut Connection, post_id: i64) -> rusqlite::Result<bool> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM comments WHERE post_id = ?1", params![post_id])?;
    let deleted = tx.execute("DELETE FROM posts WHERE post_id = ?1", params![post_id])?;
    tx.commit()?;
    Ok(deleted > 0)
}
