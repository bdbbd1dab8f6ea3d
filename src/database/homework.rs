//! Contains all database functions for the `homework` table.

use super::models::{HomeworkRecord, NewHomework};
use sqlx::SqliteExecutor;

const HOMEWORK_COLUMNS: &str =
    r#"ref_number, subject, details, due_date, "type", image_url, created_at"#;

/// Highest reference number currently stored, or `None` for an empty table.
pub async fn max_ref_number<'e>(exec: impl SqliteExecutor<'e>) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(ref_number) FROM homework")
        .fetch_one(exec)
        .await
}

/// Inserts one row and returns it exactly as stored.
pub async fn insert_homework<'e>(
    exec: impl SqliteExecutor<'e>,
    ref_number: i64,
    homework: &NewHomework,
) -> Result<HomeworkRecord, sqlx::Error> {
    sqlx::query_as::<_, HomeworkRecord>(&format!(
        r#"INSERT INTO homework (ref_number, subject, details, due_date, "type", image_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {HOMEWORK_COLUMNS}"#
    ))
    .bind(ref_number)
    .bind(&homework.subject)
    .bind(&homework.details)
    .bind(&homework.due_date)
    .bind(&homework.kind)
    .bind(homework.image_url.as_deref())
    .fetch_one(exec)
    .await
}

pub async fn fetch_all_homework<'e>(
    exec: impl SqliteExecutor<'e>,
) -> Result<Vec<HomeworkRecord>, sqlx::Error> {
    sqlx::query_as::<_, HomeworkRecord>(&format!(
        "SELECT {HOMEWORK_COLUMNS} FROM homework ORDER BY ref_number ASC"
    ))
    .fetch_all(exec)
    .await
}
