//! Safety scoring and time-window aggregation over sensor readings.
//!
//! The score is inversely proportional to traffic volume and speed and is
//! used as the dashboard's risk indicator. Two selection strategies exist
//! for "the reading near now" and they are not equivalent; they are kept
//! as distinct modes rather than merged.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::db::models::SensorReading;

const SECS_PER_DAY: u32 = 24 * 60 * 60;

/// Integer safety score for one reading.
///
/// `floor(scale / ((car_count + 1) * (people_count + 1) * (car_speed_max + car_speed_mean)))`
///
/// The count factors carry a +1 offset; the speed term does not, so an
/// all-idle reading (both speeds zero) would otherwise divide by zero. The
/// denominator is clamped to 1, making the score total over non-negative
/// inputs: an empty road scores the full `scale`.
pub fn safety_score(reading: &SensorReading, scale: i64) -> i64 {
    let denominator = (reading.car_count + 1)
        * (reading.people_count + 1)
        * (reading.car_speed_max + reading.car_speed_mean);
    scale / denominator.max(1)
}

/// How `/data/now` picks its time window around the current time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Symmetric band: `[now - w, now + w)` for `w = window_minutes`.
    #[default]
    Band,
    /// The enclosing ten-minute bucket: now rounded down by its
    /// minute-mod-10 and second components, bucket width fixed at 10m.
    TenMinuteBucket,
}

/// Half-open time-of-day window `[start, end)`, clamped to a single day.
/// No midnight wraparound: a reading at 23:59 is not near 00:01.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start_secs: u32,
    end_secs: u32,
}

impl TimeWindow {
    pub fn for_mode(mode: WindowMode, now: NaiveTime, window_minutes: u32) -> Self {
        match mode {
            WindowMode::Band => Self::band(now, window_minutes),
            WindowMode::TenMinuteBucket => Self::ten_minute_bucket(now),
        }
    }

    pub fn band(now: NaiveTime, window_minutes: u32) -> Self {
        let now_secs = now.num_seconds_from_midnight();
        let w = window_minutes * 60;
        Self {
            start_secs: now_secs.saturating_sub(w),
            end_secs: (now_secs + w).min(SECS_PER_DAY),
        }
    }

    pub fn ten_minute_bucket(now: NaiveTime) -> Self {
        let offset = (now.minute() % 10) * 60 + now.second();
        let start_secs = now.num_seconds_from_midnight() - offset;
        Self {
            start_secs,
            end_secs: (start_secs + 600).min(SECS_PER_DAY),
        }
    }

    /// Bounds as zero-padded `HH:MM:SS` strings, suitable for lexicographic
    /// comparison against the stored `time` column. The end bound may be
    /// the sentinel `24:00:00`, which sorts after every valid time.
    pub fn sql_bounds(&self) -> (String, String) {
        (fmt_secs(self.start_secs), fmt_secs(self.end_secs))
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        let s = t.num_seconds_from_midnight();
        self.start_secs <= s && s < self.end_secs
    }
}

fn fmt_secs(secs: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

/// Pick the single reading a window query returns. The source left the
/// zero- and multi-match cases undefined; the policy here is: none → `None`
/// (the handler maps this to 404), several → closest `time` to `now`, ties
/// broken toward the later reading. Rows with an unparseable `time` are
/// skipped.
pub fn closest_reading(readings: Vec<SensorReading>, now: NaiveTime) -> Option<SensorReading> {
    let now_secs = now.num_seconds_from_midnight() as i64;
    readings
        .into_iter()
        .filter_map(|r| {
            let t = NaiveTime::parse_from_str(&r.time, "%H:%M:%S").ok()?;
            let secs = t.num_seconds_from_midnight() as i64;
            Some(((secs - now_secs).abs(), secs, r))
        })
        // min_by_key keeps the first of equal keys; negate seconds so the
        // later reading wins a distance tie
        .min_by_key(|(dist, secs, _)| (*dist, -secs))
        .map(|(_, _, r)| r)
}

/// A reading with its derived score attached, as the dashboard receives it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredReading {
    #[serde(flatten)]
    pub reading: SensorReading,
    pub safety_score: i64,
}

pub fn score_reading(reading: SensorReading, scale: i64) -> ScoredReading {
    let safety_score = safety_score(&reading, scale);
    ScoredReading {
        reading,
        safety_score,
    }
}

/// Running totals over today's readings up to now, computed in one pass
/// together with the per-reading scores. `today_max` is `None` when no
/// readings have arrived yet; the totals are zero.
#[derive(Debug, Clone, Serialize)]
pub struct Accumulated {
    pub readings: Vec<ScoredReading>,
    pub today_max: Option<i64>,
    pub car_total: i64,
    pub people_total: i64,
}

pub fn accumulate(readings: Vec<SensorReading>, scale: i64) -> Accumulated {
    let mut today_max = None;
    let mut car_total = 0;
    let mut people_total = 0;

    let readings = readings
        .into_iter()
        .map(|r| {
            today_max = Some(today_max.map_or(r.car_speed_max, |m: i64| m.max(r.car_speed_max)));
            car_total += r.car_count;
            people_total += r.people_count;
            score_reading(r, scale)
        })
        .collect();

    Accumulated {
        readings,
        today_max,
        car_total,
        people_total,
    }
}
