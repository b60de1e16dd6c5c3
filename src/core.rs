//! Core Lumin functionality
//!
//! The [`Lumin`] coordinator owns the connection pool and the application
//! config, and hands the executor to model queries.

use std::time::Duration;

use config::{AppConfig, PaginationConfig};
use model_object::{Model, ModelError, Paginated, PgExecutor, Query, Row};
use sqlx::PgPool;
use tracing::{error, info};

use crate::debug_log;
use crate::errors::LuminError;

/// Main Lumin coordinator that manages the database connection
pub struct Lumin {
    executor: PgExecutor,
    config: AppConfig,
}

impl Lumin {
    /// Create new Lumin with database connection
    pub async fn new(config: AppConfig) -> Result<Self, LuminError> {
        config.validate()?;
        let database = &config.database;

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        // Set max lifetime if specified
        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = pool_options
            .connect(&database.connection_string())
            .await
            .map_err(|err| {
                error!(
                    host = %database.host,
                    database = %database.database,
                    error = %err,
                    "Failed to connect to database"
                );
                err
            })?;

        info!(
            host = %database.host,
            database = %database.database,
            max_connections = database.max_connections,
            "Database pool ready"
        );

        Ok(Self {
            executor: PgExecutor::new(pool),
            config,
        })
    }

    /// Build a coordinator around an existing pool
    pub fn with_pool(pool: PgPool, config: AppConfig) -> Self {
        Self {
            executor: PgExecutor::new(pool),
            config,
        }
    }

    /// A coordinator without a database; every query fails with
    /// [`ModelError::ConnectionUnavailable`]
    pub fn disconnected(config: AppConfig) -> Self {
        Self {
            executor: PgExecutor::unavailable(),
            config,
        }
    }

    /// Executor to pass to model queries
    pub fn database(&self) -> &PgExecutor {
        &self.executor
    }

    /// Get database pool reference
    pub fn pool(&self) -> Option<&PgPool> {
        self.executor.pool()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.config.pagination
    }

    /// Paginate `query` using the configured default page size when none is
    /// given. Requested sizes above the configured maximum are capped.
    pub async fn paginate<M: Model>(
        &self,
        query: Query<M>,
        per_page: Option<u64>,
        page: u64,
    ) -> Result<Paginated<Row>, ModelError> {
        let per_page = self.config.pagination.resolve(per_page);
        debug_log!(table = %query.schema().table, per_page, page, "Paginating");
        query.paginate(&self.executor, per_page, page).await
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), LuminError> {
        let pool = self.pool().ok_or(ModelError::ConnectionUnavailable)?;
        sqlx::query("SELECT 1").fetch_one(pool).await?;
        Ok(())
    }
}
