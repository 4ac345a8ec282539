use crate::config::DatabaseConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    // 内存 SQLite 每个连接都是独立的库，只能使用单连接
    if config.url.starts_with("sqlite::memory:") {
        opt.min_connections(1).max_connections(1);
    }

    let pool = Database::connect(opt).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}

/// 单元测试使用的内存数据库（已执行迁移）
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = create_pool(&config).await.expect("create sqlite pool");
    run_migrations(&pool).await.expect("run migrations");
    pool
}
