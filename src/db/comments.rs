use rusqlite::{params, Connection, Row};

use crate::db::models::Comment;

pub struct NewComment {
    pub post_id: i64,
    pub nickname: String,
    pub content: String,
    pub author_id: String,
}

fn comment_from_row(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        comment_id: row.get(0)?,
        post_id: row.get(1)?,
        nickname: row.get(2)?,
        content: row.get(3)?,
        author_id: row.get(4)?,
        uploaded_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const COMMENT_COLUMNS: &str =
    "comment_id, post_id, nickname, content, author_id, uploaded_at, updated_at";

/// Comments for a post, newest first.
pub fn for_post(conn: &Connection, post_id: i64) -> rusqlite::Result<Vec<Comment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?1 ORDER BY comment_id DESC"
    ))?;
    let rows = stmt.query_map(params![post_id], comment_from_row)?;
    rows.collect()
}

pub fn get(conn: &Connection, comment_id: i64) -> rusqlite::Result<Option<Comment>> {
    let result = conn.query_row(
        &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?1"),
        params![comment_id],
        comment_from_row,
    );
    match result {
        Ok(comment) => Ok(Some(comment)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn create(conn: &Connection, new: &NewComment, timestamp: &str) -> rusqlite::Result<Comment> {
    conn.execute(
        "INSERT INTO comments (post_id, nickname, content, author_id, uploaded_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![new.post_id, new.nickname, new.content, new.author_id, timestamp],
    )?;
    let comment_id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?1"),
        params![comment_id],
        comment_from_row,
    )
}

/// Content-only edit. Returns `None` if the comment does not exist.
pub fn update_content(
    conn: &Connection,
    comment_id: i64,
    content: &str,
    timestamp: &str,
) -> rusqlite::Result<Option<Comment>> {
    let changed = conn.execute(
        "UPDATE comments SET content = ?1, updated_at = ?2 WHERE comment_id = ?3",
        params![content, timestamp, comment_id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get(conn, comment_id)
}

/// Returns whether the comment existed.
pub fn delete(conn: &Connection, comment_id: i64) -> rusqlite::Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM comments WHERE comment_id = ?1",
        params![comment_id],
    )?;
    Ok(deleted > 0)
}
