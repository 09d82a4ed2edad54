use chrono::NaiveTime;
use rusqlite::params;
use tempfile::TempDir;

use trafficboard::config::SafetyConfig;
use trafficboard::db::{self, comments, posts};
use trafficboard::error::AppError;
use trafficboard::routes::data;
use trafficboard::state::DbPool;

fn setup() -> (TempDir, DbPool) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let pool = db::create_pool(&db_path).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");
    (temp_dir, pool)
}

fn seed_reading(
    pool: &DbPool,
    region: &str,
    time: &str,
    car: i64,
    people: i64,
    max: i64,
    mean: i64,
) {
    let conn = pool.get().unwrap();
    conn.execute(
        "INSERT INTO readings (name, time, car_count, people_count, car_speed_max, car_speed_mean)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![region, time, car, people, max, mean],
    )
    .unwrap();
}

fn at(time: &str) -> NaiveTime {
    NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap()
}

#[test]
fn post_lifecycle_with_comment_cascade() {
    let (_tmp, pool) = setup();
    let mut conn = pool.get().unwrap();

    // Create a post, comment on it a few times
    let post = posts::create(
        &conn,
        &posts::NewPost {
            title: "Crosswalk near the school".to_string(),
            nickname: "dokyeong".to_string(),
            content: "Cars are not slowing down here.".to_string(),
            author_id: "user-1".to_string(),
        },
        &db::wire_timestamp(),
    )
    .unwrap();

    for i in 0..3 {
        comments::create(
            &conn,
            &comments::NewComment {
                post_id: post.post_id,
                nickname: format!("neighbor-{i}"),
                content: "Agreed.".to_string(),
                author_id: format!("user-{}", i + 2),
            },
            &db::wire_timestamp(),
        )
        .unwrap();
    }
    assert_eq!(comments::for_post(&conn, post.post_id).unwrap().len(), 3);

    // Views accumulate additively
    posts::increment_views(&conn, post.post_id).unwrap();
    let viewed = posts::increment_views(&conn, post.post_id).unwrap().unwrap();
    assert_eq!(viewed.view_count, 2);

    // Cascade delete removes the comments with the post
    assert!(posts::delete_cascade(&mut conn, post.post_id).unwrap());
    assert!(posts::get(&conn, post.post_id).unwrap().is_none());
    assert!(comments::for_post(&conn, post.post_id).unwrap().is_empty());
}

#[test]
fn comment_edit_is_content_only() {
    let (_tmp, pool) = setup();
    let conn = pool.get().unwrap();

    let post = posts::create(
        &conn,
        &posts::NewPost {
            title: "t".to_string(),
            nickname: "n".to_string(),
            content: "c".to_string(),
            author_id: "user-1".to_string(),
        },
        "2024-1-1 0:0:0",
    )
    .unwrap();
    let comment = comments::create(
        &conn,
        &comments::NewComment {
            post_id: post.post_id,
            nickname: "neighbor".to_string(),
            content: "first draft".to_string(),
            author_id: "user-2".to_string(),
        },
        "2024-1-1 0:0:0",
    )
    .unwrap();

    let edited = comments::update_content(&conn, comment.comment_id, "second draft", "2024-1-2 9:5:2")
        .unwrap()
        .unwrap();
    assert_eq!(edited.content, "second draft");
    assert_eq!(edited.nickname, "neighbor");
    assert_eq!(edited.updated_at, "2024-1-2 9:5:2");
}

#[test]
fn data_now_returns_scored_nearest_reading() {
    let (_tmp, pool) = setup();
    seed_reading(&pool, "gangnam", "12:28:00", 2, 3, 40, 30);
    seed_reading(&pool, "gangnam", "12:33:00", 8, 2, 55, 45);
    seed_reading(&pool, "mapo", "12:30:00", 1, 1, 10, 5);

    let conn = pool.get().unwrap();
    let scored =
        data::current_reading(&conn, &SafetyConfig::default(), "gangnam", at("12:29:00")).unwrap();
    assert_eq!(scored.reading.time, "12:28:00");
    // floor(10_000_000 / (3 * 4 * 70))
    assert_eq!(scored.safety_score, 11904);
}

#[test]
fn data_now_with_no_nearby_reading_is_not_found() {
    let (_tmp, pool) = setup();
    seed_reading(&pool, "gangnam", "08:00:00", 1, 1, 10, 5);

    let conn = pool.get().unwrap();
    let err = data::current_reading(&conn, &SafetyConfig::default(), "gangnam", at("12:00:00"))
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn accumulate_serves_list_and_totals_from_one_pass() {
    let (_tmp, pool) = setup();
    seed_reading(&pool, "gangnam", "06:00:00", 3, 2, 10, 8);
    seed_reading(&pool, "gangnam", "09:00:00", 5, 4, 25, 18);
    seed_reading(&pool, "gangnam", "11:30:00", 1, 1, 5, 3);
    // Later than "now": excluded from today's running totals
    seed_reading(&pool, "gangnam", "18:00:00", 50, 50, 120, 90);

    let conn = pool.get().unwrap();
    let acc =
        data::accumulated(&conn, &SafetyConfig::default(), "gangnam", at("12:00:00")).unwrap();

    assert_eq!(acc.readings.len(), 3);
    assert_eq!(acc.today_max, Some(25));
    assert_eq!(acc.car_total, 9);
    assert_eq!(acc.people_total, 7);

    // Each row carries its score at the accumulate scale
    for scored in &acc.readings {
        assert!(scored.safety_score >= 0);
    }
    // floor(1_000_000 / (4 * 3 * 18))
    assert_eq!(acc.readings[0].safety_score, 1_000_000 / (4 * 3 * 18));
}

#[test]
fn accumulate_before_first_reading_is_empty_with_null_max() {
    let (_tmp, pool) = setup();
    seed_reading(&pool, "gangnam", "10:00:00", 3, 2, 10, 8);

    let conn = pool.get().unwrap();
    let acc =
        data::accumulated(&conn, &SafetyConfig::default(), "gangnam", at("00:30:00")).unwrap();
    assert!(acc.readings.is_empty());
    assert_eq!(acc.today_max, None);
    assert_eq!(acc.car_total, 0);
    assert_eq!(acc.people_total, 0);
}
