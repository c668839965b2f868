//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - `tasks` table bootstrap through one embedded migration
//! - Blocking Diesel calls run on the tokio blocking pool
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use tracing::debug;

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, TaskRepository};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

mod models;
mod schema;

use models::{NewTaskRow, TaskChangeset, TaskRow};
use schema::tasks;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the variables read and their defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed task repository.
///
/// The pool is built lazily: constructing the repository never touches the
/// network, so a database that is down at startup only surfaces when
/// [`TaskRepository::initialize`] or a request runs.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a repository for the configured database.
    ///
    /// # Errors
    /// `RepositoryError::ConfigurationError` if the database URL is empty.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        if config.database_url.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres repository requires a database URL",
            ));
        }

        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build_unchecked(manager);

        Ok(Self { pool })
    }

    /// Run one database operation on a pooled connection.
    ///
    /// Diesel is synchronous, so the closure runs on the blocking pool. The
    /// operation is attempted once; failures are returned as-is.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
            debug!(operation, "running postgres operation");
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

/// Map a Diesel error for an operation on one task.
fn task_error(err: diesel::result::Error, operation: &str, id: TaskId) -> RepositoryError {
    match err {
        diesel::result::Error::NotFound => RepositoryError::not_found_with_context(
            format!("Task {} does not exist", id),
            ErrorContext::for_task(operation, id),
        ),
        other => RepositoryError::from(other)
            .with_operation(operation)
            .with_task_id(id),
    }
}

fn fetch_task(conn: &mut PgConnection, id: TaskId, operation: &str) -> RepositoryResult<Task> {
    tasks::table
        .find(id.value())
        .select(TaskRow::as_select())
        .first::<TaskRow>(conn)
        .map(Task::from)
        .map_err(|e| task_error(e, operation, id))
}

#[async_trait]
impl TaskRepository for PostgresRepository {
    async fn initialize(&self) -> RepositoryResult<()> {
        let applied = self
            .with_conn("run_migrations", |conn| {
                conn.run_pending_migrations(MIGRATIONS)
                    .map(|versions| versions.len())
                    .map_err(|e| {
                        RepositoryError::internal_with_context(
                            format!("Migration failed: {}", e),
                            ErrorContext::new("run_migrations"),
                        )
                    })
            })
            .await?;
        debug!(applied, "postgres schema ready");
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(|e| RepositoryError::from(e).with_operation("health_check"))
        })
        .await
    }

    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        self.with_conn("list_tasks", |conn| {
            let rows = tasks::table
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("list_tasks"))?;
            Ok(rows.into_iter().map(Task::from).collect())
        })
        .await
    }

    async fn get_task(&self, id: TaskId) -> RepositoryResult<Task> {
        self.with_conn("get_task", move |conn| fetch_task(conn, id, "get_task"))
            .await
    }

    async fn insert_task(&self, task: NewTask) -> RepositoryResult<Task> {
        self.with_conn("insert_task", move |conn| {
            diesel::insert_into(tasks::table)
                .values(NewTaskRow::from(task))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(conn)
                .map(Task::from)
                .map_err(|e| RepositoryError::from(e).with_operation("insert_task"))
        })
        .await
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> RepositoryResult<Task> {
        let changeset = TaskChangeset::from(patch);
        self.with_conn("update_task", move |conn| {
            // Diesel refuses an UPDATE with an empty SET clause.
            if changeset.is_empty() {
                return fetch_task(conn, id, "update_task");
            }
            diesel::update(tasks::table.find(id.value()))
                .set(&changeset)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(conn)
                .map(Task::from)
                .map_err(|e| task_error(e, "update_task", id))
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<Task> {
        self.with_conn("delete_task", move |conn| {
            diesel::delete(tasks::table.find(id.value()))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(conn)
                .map(Task::from)
                .map_err(|e| task_error(e, "delete_task", id))
        })
        .await
    }
}
