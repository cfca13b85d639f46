pub mod postgres;
pub mod migrations;
pub mod repositories;

pub use postgres::{PostgresPool, create_postgres_pool, health_check as postgres_health_check};
pub use repositories::*;
pub use vivae_utils::DatabaseConfig;

use anyhow::Result;

/// Connect with the `database` section of the loaded `AppConfig` and apply migrations.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<PostgresPool> {
    let pool = create_postgres_pool(
        &config.postgres_url,
        config.max_connections,
        config.connection_timeout(),
    )
    .await?;

    migrations::run_postgres_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vivae_utils::AppConfig;

    #[test]
    fn test_loaded_database_section_drives_the_pool() {
        let config = AppConfig::default();
        let database: &DatabaseConfig = &config.database;

        assert_eq!(database.max_connections, 10);
        assert_eq!(database.connection_timeout(), Duration::from_secs(30));
    }
}
