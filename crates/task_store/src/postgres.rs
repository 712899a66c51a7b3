//! PostgreSQL task store.
//!
//! Expects the following tables:
//!
//! ```sql
//! CREATE TABLE device (
//!     deviceid SERIAL PRIMARY KEY
//! );
//!
//! CREATE TABLE task (
//!     taskid      SERIAL PRIMARY KEY,
//!     entry_date  TIMESTAMP NOT NULL DEFAULT NOW(),
//!     description TEXT NOT NULL,
//!     priority    TEXT NOT NULL CHECK (priority IN ('critical', 'important', 'slight')),
//!     mode        TEXT NOT NULL CHECK (mode IN ('open', 'done')),
//!     deviceid    INTEGER NOT NULL REFERENCES device (deviceid)
//! );
//! ```
//!
//! PostgreSQL names the column constraints `task_priority_check`,
//! `task_mode_check` and `task_deviceid_fkey`, which is what
//! [`Constraint`](crate::Constraint) recognizes.
//!
//! `entry_date` is always selected as `timestamptz`, so the store reads both
//! `TIMESTAMP` and `TIMESTAMPTZ` columns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{NewTask, Task, TaskUpdate};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    FromRow, PgPool, Postgres, QueryBuilder,
};

use crate::{TaskFilter, TaskStore, TaskStoreError, TaskStoreResult};

const TASK_COLUMNS: &str =
    "taskid, entry_date::timestamptz AS entry_date, description, priority, mode, deviceid";

const LIST_ORDER: &str = " ORDER BY CASE LOWER(priority) \
                          WHEN 'critical' THEN 1 \
                          WHEN 'important' THEN 2 \
                          ELSE 3 END ASC, entry_date DESC, taskid DESC";

/// Row type for the `task` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub taskid: i32,
    pub entry_date: DateTime<Utc>,
    pub description: String,
    pub priority: String,
    pub mode: String,
    pub deviceid: i32,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            taskid: row.taskid,
            entry_date: row.entry_date,
            description: row.description,
            priority: row.priority,
            mode: row.mode,
            deviceid: row.deviceid,
        }
    }
}

/// Task store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    /// Connects to the database and creates the pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> TaskStoreResult<Self> {
        let options: PgConnectOptions = database_url.parse()?;
        Self::connect_with(options, max_connections).await
    }

    /// Creates the pool from parsed connection options.
    pub async fn connect_with(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> TaskStoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(max_connections, "Database pool ready");

        Ok(Self { pool })
    }
}

/// Builds the select for [`TaskStore::list_tasks`].
fn list_statement(filter: &TaskFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM task"));
    if let Some(device_id) = filter.device_id {
        builder.push(" WHERE deviceid = ").push_bind(device_id);
    }
    builder.push(LIST_ORDER);
    builder
}

/// Builds a single UPDATE covering the populated slots of `update`, or
/// `None` when there is nothing to set.
fn update_statement(id: i32, update: &TaskUpdate) -> Option<QueryBuilder<'static, Postgres>> {
    if update.is_empty() {
        return None;
    }

    let mut builder = QueryBuilder::new("UPDATE task SET ");
    let mut assignments = builder.separated(", ");
    if let Some(description) = &update.description {
        assignments.push("description = ");
        assignments.push_bind_unseparated(description.clone());
    }
    if let Some(priority) = &update.priority {
        assignments.push("priority = LOWER(");
        assignments.push_bind_unseparated(priority.clone());
        assignments.push_unseparated(")");
    }
    if let Some(mode) = &update.mode {
        assignments.push("mode = LOWER(");
        assignments.push_bind_unseparated(mode.clone());
        assignments.push_unseparated(")");
    }
    builder
        .push(" WHERE taskid = ")
        .push_bind(id)
        .push(format!(" RETURNING {TASK_COLUMNS}"));

    Some(builder)
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let sql = format!(
            "INSERT INTO task (description, priority, mode, deviceid)
             VALUES ($1, LOWER($2), LOWER($3), $4)
             RETURNING {TASK_COLUMNS}"
        );
        let row: TaskRow = sqlx::query_as(&sql)
            .bind(&task.description)
            .bind(&task.priority)
            .bind(&task.mode)
            .bind(task.deviceid)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let mut statement = list_statement(&filter);
        let rows: Vec<TaskRow> = statement
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn get_task(&self, id: i32) -> TaskStoreResult<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM task WHERE taskid = $1");
        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Task::from))
    }

    async fn update_task(&self, id: i32, update: TaskUpdate) -> TaskStoreResult<Task> {
        let Some(mut statement) = update_statement(id, &update) else {
            return self
                .get_task(id)
                .await?
                .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()));
        };

        let row: Option<TaskRow> = statement
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Task::from)
            .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()))
    }

    async fn delete_task(&self, id: i32) -> TaskStoreResult<Task> {
        let sql = format!("DELETE FROM task WHERE taskid = $1 RETURNING {TASK_COLUMNS}");
        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Task::from)
            .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()))
    }

    async fn device_exists(&self, id: i32) -> TaskStoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM device WHERE deviceid = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
