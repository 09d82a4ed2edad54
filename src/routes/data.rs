use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Local, NaiveTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config::SafetyConfig;
use crate::db::readings;
use crate::error::{AppError, AppResult};
use crate::routes::require;
use crate::safety::{self, Accumulated, ScoredReading, TimeWindow};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/data/now", get(now))
        .route("/data/accumulate", get(accumulate))
        .route("/data/nowTotal", get(now_total))
}

#[derive(Deserialize)]
struct RegionQuery {
    region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Totals {
    pub today_max: Option<i64>,
    pub car_total: i64,
    pub people_total: i64,
}

/// The reading nearest `now` under the configured window mode, scored with
/// `now_scale`.
pub fn current_reading(
    conn: &Connection,
    safety_cfg: &SafetyConfig,
    region: &str,
    now: NaiveTime,
) -> AppResult<ScoredReading> {
    let window = TimeWindow::for_mode(safety_cfg.window_mode, now, safety_cfg.window_minutes);
    let rows = readings::in_window(conn, region, &window)?;
    let reading = safety::closest_reading(rows, now)
        .ok_or_else(|| AppError::NotFound("Reading not found.".to_string()))?;
    Ok(safety::score_reading(reading, safety_cfg.now_scale))
}

/// Today's readings up to `now` with scores and running totals, from a
/// single selection. Both accumulate endpoints are served from this.
pub fn accumulated(
    conn: &Connection,
    safety_cfg: &SafetyConfig,
    region: &str,
    now: NaiveTime,
) -> AppResult<Accumulated> {
    let rows = readings::up_to(conn, region, now)?;
    Ok(safety::accumulate(rows, safety_cfg.accumulate_scale))
}

async fn now(
    State(state): State<AppState>,
    Query(query): Query<RegionQuery>,
) -> AppResult<Json<ScoredReading>> {
    let region = require(query.region, "region")?;
    let conn = state.db.get()?;
    let scored = current_reading(&conn, &state.config.safety, &region, Local::now().time())?;
    Ok(Json(scored))
}

async fn accumulate(
    State(state): State<AppState>,
    Query(query): Query<RegionQuery>,
) -> AppResult<Json<Vec<ScoredReading>>> {
    let region = require(query.region, "region")?;
    let conn = state.db.get()?;
    let acc = accumulated(&conn, &state.config.safety, &region, Local::now().time())?;
    Ok(Json(acc.readings))
}

async fn now_total(
    State(state): State<AppState>,
    Query(query): Query<RegionQuery>,
) -> AppResult<Json<Totals>> {
    let region = require(query.region, "region")?;
    let conn = state.db.get()?;
    let acc = accumulated(&conn, &state.config.safety, &region, Local::now().time())?;
    Ok(Json(Totals {
        today_max: acc.today_max,
        car_total: acc.car_total,
        people_total: acc.people_total,
    }))
}
