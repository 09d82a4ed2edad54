use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub post_id: i64,
    pub title: String,
    pub content: String,
    pub nickname: String,
    /// Author identifier (the dashboard's `id` field).
    #[serde(rename = "id")]
    pub author_id: String,
    pub view_count: i64,
    pub uploaded_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub post_id: i64,
    pub nickname: String,
    pub content: String,
    #[serde(rename = "id")]
    pub author_id: String,
    pub uploaded_at: String,
    pub updated_at: String,
}

/// One sensor observation for a region at a time-of-day. Readings recur
/// daily; `time` is "HH:MM:SS", not a full timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub name: String,
    pub time: String,
    pub car_count: i64,
    pub people_count: i64,
    pub car_speed_max: i64,
    pub car_speed_mean: i64,
}
