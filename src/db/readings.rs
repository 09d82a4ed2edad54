use chrono::NaiveTime;
use rusqlite::{params, Connection, Row};

use crate::db::models::SensorReading;
use crate::safety::TimeWindow;

fn reading_from_row(row: &Row) -> rusqlite::Result<SensorReading> {
    Ok(SensorReading {
        name: row.get(0)?,
        time: row.get(1)?,
        car_count: row.get(2)?,
        people_count: row.get(3)?,
        car_speed_max: row.get(4)?,
        car_speed_mean: row.get(5)?,
    })
}

const READING_COLUMNS: &str = "name, time, car_count, people_count, car_speed_max, car_speed_mean";

/// Readings for a region inside a time window, ascending by time. The
/// stored `time` is zero-padded `HH:MM:SS`, so string comparison orders
/// correctly against the window's bounds.
pub fn in_window(
    conn: &Connection,
    region: &str,
    window: &TimeWindow,
) -> rusqlite::Result<Vec<SensorReading>> {
    let (start, end) = window.sql_bounds();
    let mut stmt = conn.prepare(&format!(
        "SELECT {READING_COLUMNS} FROM readings
         WHERE name = ?1 AND time >= ?2 AND time < ?3
         ORDER BY time"
    ))?;
    let rows = stmt.query_map(params![region, start, end], reading_from_row)?;
    rows.collect()
}

/// All of a region's readings so far today, ascending by time.
pub fn up_to(
    conn: &Connection,
    region: &str,
    now: NaiveTime,
) -> rusqlite::Result<Vec<SensorReading>> {
    let bound = now.format("%H:%M:%S").to_string();
    let mut stmt = conn.prepare(&format!(
        "SELECT {READING_COLUMNS} FROM readings
         WHERE name = ?1 AND time <= ?2
         ORDER BY time"
    ))?;
    let rows = stmt.query_map(params![region, bound], reading_from_row)?;
    rows.collect()
}

#[cfg(test)]
pub(crate) fn seed(conn: &Connection, reading: &SensorReading) {
    conn.execute(
        "INSERT INTO readings (name, time, car_count, people_count, car_speed_max, car_speed_mean)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            reading.name,
            reading.time,
            reading.car_count,
            reading.people_count,
            reading.car_speed_max,
            reading.car_speed_mean
        ],
    )
    .unwrap();
}
