//! Task database operations

use chrono::NaiveDate;
use shared::models::{Task, TaskCreate, TaskStatus, TaskUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgConnection, PgPool};

use super::BoxError;

pub async fn list(
    pool: &PgPool,
    store_id: Option<i64>,
    status: Option<TaskStatus>,
    due_date: Option<NaiveDate>,
) -> Result<Vec<Task>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM tasks
        WHERE ($1::BIGINT IS NULL OR store_id = $1)
          AND ($2::task_status IS NULL OR status = $2)
          AND ($3::DATE IS NULL OR due_date = $3)
        ORDER BY due_date NULLS LAST, due_time NULLS LAST, created_at
        "#,
    )
    .bind(store_id)
    .bind(status)
    .bind(due_date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: TaskCreate) -> Result<Task, BoxError> {
    let task = Task::from_create(snowflake_id(), data, now_millis())?;
    sqlx::query(
        r#"
        INSERT INTO tasks (
            id, store_id, title, category, assigned_role, due_date, due_time,
            recurring, status, priority, completed_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(task.id)
    .bind(task.store_id)
    .bind(&task.title)
    .bind(&task.category)
    .bind(&task.assigned_role)
    .bind(task.due_date)
    .bind(&task.due_time)
    .bind(task.recurring)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.completed_at)
    .bind(task.created_at)
    .bind(task.updated_at)
    .execute(pool)
    .await?;
    Ok(task)
}

async fn write(conn: &mut PgConnection, task: &Task) -> Result<(), BoxError> {
    sqlx::query(
        r#"
        UPDATE tasks
        SET title = $2, category = $3, assigned_role = $4, due_date = $5, due_time = $6,
            recurring = $7, status = $8, priority = $9, completed_at = $10, updated_at = $11
        WHERE id = $1
        "#,
    )
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.category)
    .bind(&task.assigned_role)
    .bind(task.due_date)
    .bind(&task.due_time)
    .bind(task.recurring)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.completed_at)
    .bind(task.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update(pool: &PgPool, id: i64, data: TaskUpdate) -> Result<Option<Task>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<Task> = sqlx::query_as("SELECT * FROM tasks WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(mut task) = existing else {
        return Ok(None);
    };
    task.apply_update(data, now_millis())?;
    write(&mut tx, &task).await?;
    tx.commit().await?;
    Ok(Some(task))
}

/// Mark completed; completing twice keeps the first timestamp
pub async fn complete(pool: &PgPool, id: i64) -> Result<Option<Task>, BoxError> {
    let mut tx = pool.begin().await?;
    let existing: Option<Task> = sqlx::query_as("SELECT * FROM tasks WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(mut task) = existing else {
        return Ok(None);
    };
    task.set_status(TaskStatus::Completed, now_millis());
    write(&mut tx, &task).await?;
    tx.commit().await?;
    Ok(Some(task))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
