pub mod comments;
pub mod data;
pub mod posts;

use crate::error::{AppError, AppResult};

// The original service accepted whatever the client sent and let the
// database blow up; required fields are checked explicitly instead so the
// client gets a 400 with the field name.

pub(crate) fn require(field: Option<String>, name: &str) -> AppResult<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::BadRequest(format!(
            "missing required field: {name}"
        ))),
    }
}

pub(crate) fn require_id(field: Option<i64>, name: &str) -> AppResult<i64> {
    field.ok_or_else(|| AppError::BadRequest(format!("missing required field: {name}")))
}
