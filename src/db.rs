use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::{
    config::Config,
    service::AppState,
    store::{
        MySqlAttendanceStore, MySqlEmployeeStore,
        mysql::{CREATE_ATTENDANCE_SQL, CREATE_EMPLOYEES_SQL},
    },
};

/// Connects and makes sure both tables exist.
pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    for ddl in [CREATE_EMPLOYEES_SQL, CREATE_ATTENDANCE_SQL] {
        sqlx::query(ddl)
            .execute(&pool)
            .await
            .context("Failed to create schema")?;
    }

    Ok(pool)
}

/// Picks the storage backend from `DATABASE_URL`.
pub async fn init_state(config: &Config) -> Result<AppState> {
    match &config.database_url {
        Some(url) => {
            let pool = init_db(url).await?;
            info!("Using MySQL storage");

            Ok(AppState::new(
                Arc::new(MySqlEmployeeStore::new(pool.clone())),
                Arc::new(MySqlAttendanceStore::new(pool)),
            ))
        }
        None => {
            warn!("DATABASE_URL not set, records are kept in memory and lost on restart");

            Ok(AppState::in_memory())
        }
    }
}
