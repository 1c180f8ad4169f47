//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::dsl::exists;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, warn};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, FleetRepository, RepositoryError, RepositoryResult, ScheduleRepository,
};
use crate::models::{
    Driver, NewSchedule, ResourceFilter, Schedule, ScheduleId, ScheduleQuery, Shuttle,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
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
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
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
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
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

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Migration failed: {}", e),
                    ErrorContext::new("run_migrations"),
                )
            })?;
        }

        Ok(Self { pool, config })
    }

    /// Execute a database operation on the blocking pool, retrying transient
    /// failures with exponential backoff.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    warn!(
                        "Retrying {} (attempt {}/{}) after {:?}",
                        operation,
                        attempt + 1,
                        max_retries + 1,
                        retry_delay
                    );
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new(operation)
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e.with_operation(operation)),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
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

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn schedule_not_found(id: ScheduleId, operation: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Schedule {} not found", id),
        ErrorContext::new(operation)
            .with_entity("schedule")
            .with_entity_id(id),
    )
}

/// Live schedules on the query's date whose start time lies in its window,
/// narrowed by resource and exclusion.
fn window_query(query: &ScheduleQuery) -> schedules::BoxedQuery<'static, Pg> {
    let mut q = schedules::table
        .filter(schedules::deleted_at.is_null())
        .filter(schedules::service_date.eq(query.date))
        .filter(schedules::start_time.between(query.window.start, query.window.end))
        .into_boxed();

    q = match query.resource {
        ResourceFilter::Any => q,
        ResourceFilter::Driver(driver_id) => q.filter(schedules::driver_id.eq(driver_id.value())),
        ResourceFilter::Shuttle(shuttle_id) => {
            q.filter(schedules::shuttle_id.eq(shuttle_id.value()))
        }
        ResourceFilter::DriverOrShuttle {
            driver_id,
            shuttle_id,
        } => q.filter(
            schedules::driver_id
                .eq(driver_id.value())
                .or(schedules::shuttle_id.eq(shuttle_id.value())),
        ),
    };

    if let Some(exclude_id) = query.exclude_id {
        q = q.filter(schedules::id.ne(exclude_id.value()));
    }
    q
}

#[async_trait]
impl ScheduleRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn exists_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<bool> {
        let query = *query;
        debug!("exists_in_window {:?}", query);
        self.with_conn("exists_in_window", move |conn| {
            diesel::select(exists(window_query(&query)))
                .get_result::<bool>(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn first_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<Option<Schedule>> {
        let query = *query;
        self.with_conn("first_in_window", move |conn| {
            window_query(&query)
                .order((schedules::start_time.asc(), schedules::id.asc()))
                .select(ScheduleRow::as_select())
                .first(conn)
                .optional()
                .map(|row| row.map(Schedule::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_in_window(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Schedule>> {
        let query = *query;
        self.with_conn("find_in_window", move |conn| {
            window_query(&query)
                .order((schedules::start_time.asc(), schedules::id.asc()))
                .select(ScheduleRow::as_select())
                .load(conn)
                .map(|rows| rows.into_iter().map(Schedule::from).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_schedule(&self, schedule: &NewSchedule) -> RepositoryResult<Schedule> {
        let fields = ScheduleFieldsRow::from(schedule);
        self.with_conn("create_schedule", move |conn| {
            diesel::insert_into(schedules::table)
                .values(&fields)
                .returning(ScheduleRow::as_returning())
                .get_result(conn)
                .map(Schedule::from)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_schedule(&self, id: ScheduleId) -> RepositoryResult<Schedule> {
        self.with_conn("get_schedule", move |conn| {
            schedules::table
                .filter(schedules::id.eq(id.value()))
                .filter(schedules::deleted_at.is_null())
                .select(ScheduleRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(Schedule::from)
                .ok_or_else(|| schedule_not_found(id, "get_schedule"))
        })
        .await
    }

    async fn update_schedule(
        &self,
        id: ScheduleId,
        schedule: &NewSchedule,
    ) -> RepositoryResult<Schedule> {
        let fields = ScheduleFieldsRow::from(schedule);
        self.with_conn("update_schedule", move |conn| {
            diesel::update(
                schedules::table
                    .filter(schedules::id.eq(id.value()))
                    .filter(schedules::deleted_at.is_null()),
            )
            .set(&fields)
            .returning(ScheduleRow::as_returning())
            .get_result(conn)
            .optional()
            .map_err(map_diesel_error)?
            .map(Schedule::from)
            .ok_or_else(|| schedule_not_found(id, "update_schedule"))
        })
        .await
    }

    async fn soft_delete_schedule(&self, id: ScheduleId) -> RepositoryResult<()> {
        self.with_conn("soft_delete_schedule", move |conn| {
            let affected = diesel::update(
                schedules::table
                    .filter(schedules::id.eq(id.value()))
                    .filter(schedules::deleted_at.is_null()),
            )
            .set(schedules::deleted_at.eq(Some(Utc::now())))
            .execute(conn)
            .map_err(map_diesel_error)?;

            if affected == 0 {
                return Err(schedule_not_found(id, "soft_delete_schedule"));
            }
            Ok(())
        })
        .await
    }

    async fn list_schedules_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Schedule>> {
        self.with_conn("list_schedules_for_date", move |conn| {
            schedules::table
                .filter(schedules::deleted_at.is_null())
                .filter(schedules::service_date.eq(date))
                .order((schedules::start_time.asc(), schedules::id.asc()))
                .select(ScheduleRow::as_select())
                .load(conn)
                .map(|rows| rows.into_iter().map(Schedule::from).collect())
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl FleetRepository for PostgresRepository {
    async fn list_shuttles(&self) -> RepositoryResult<Vec<Shuttle>> {
        self.with_conn("list_shuttles", |conn| {
            shuttles::table
                .order(shuttles::id.asc())
                .select(ShuttleRow::as_select())
                .load(conn)
                .map(|rows| rows.into_iter().map(Shuttle::from).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_drivers(&self) -> RepositoryResult<Vec<Driver>> {
        self.with_conn("list_drivers", |conn| {
            drivers::table
                .left_join(user_profiles::table)
                .order(drivers::id.asc())
                .select((
                    drivers::id,
                    (user_profiles::first_name, user_profiles::last_name).nullable(),
                ))
                .load::<DriverRow>(conn)
                .map(|rows| rows.into_iter().map(driver_from_row).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn shuttles_free_in(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Shuttle>> {
        let query = query.with_resource(ResourceFilter::Any);
        self.with_conn("shuttles_free_in", move |conn| {
            let busy = window_query(&query).select(schedules::shuttle_id);
            shuttles::table
                .filter(shuttles::id.ne_all(busy))
                .order(shuttles::id.asc())
                .select(ShuttleRow::as_select())
                .load(conn)
                .map(|rows| rows.into_iter().map(Shuttle::from).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn drivers_free_in(&self, query: &ScheduleQuery) -> RepositoryResult<Vec<Driver>> {
        let query = query.with_resource(ResourceFilter::Any);
        self.with_conn("drivers_free_in", move |conn| {
            let busy = window_query(&query).select(schedules::driver_id);
            drivers::table
                .left_join(user_profiles::table)
                .filter(drivers::id.ne_all(busy))
                .order(drivers::id.asc())
                .select((
                    drivers::id,
                    (user_profiles::first_name, user_profiles::last_name).nullable(),
                ))
                .load::<DriverRow>(conn)
                .map(|rows| rows.into_iter().map(driver_from_row).collect())
                .map_err(map_diesel_error)
        })
        .await
    }
}
