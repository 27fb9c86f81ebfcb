//! Database migrations
//!
//! Migrations are embedded from `migrations/` at compile time and tracked
//! by sqlx in the `_sqlx_migrations` table. Each file runs in its own
//! transaction.

use sqlx::migrate::Migrator;

use crate::{dao::PoolType, error::Error};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply every pending migration in version order.
pub async fn run_migrations(pool: &PoolType) -> Result<(), Error> {
    tracing::info!("Running database migrations...");

    let applied: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT version FROM _sqlx_migrations WHERE success = true
        "#,
    )
    .fetch_all(pool)
    .await
    .unwrap_or_default();

    MIGRATOR.run(pool).await?;

    let pending: Vec<_> = MIGRATOR
        .iter()
        .filter(|migration| !applied.contains(&migration.version))
        .collect();

    if pending.is_empty() {
        tracing::info!("No new migrations to apply");
    } else {
        for migration in &pending {
            tracing::info!(
                "Applied migration: V{:03}__{}",
                migration.version,
                migration.description
            );
        }
        tracing::info!("Successfully applied {} migration(s)", pending.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_embedded() {
        let versions: Vec<i64> =
            MIGRATOR.iter().map(|migration| migration.version).collect();

        assert_eq!(versions.len(), 5, "Expected 5 migrations");
        assert_eq!(versions.first(), Some(&1));
        assert_eq!(versions.last(), Some(&5));

        let mut prev_version = 0;
        for version in &versions {
            assert!(
                *version > prev_version,
                "Migrations must have unique ascending version numbers"
            );
            prev_version = *version;
        }
    }

    #[test]
    fn test_every_table_is_created() {
        let sql: String = MIGRATOR
            .iter()
            .map(|migration| migration.sql.to_string())
            .collect();

        for table in [
            "users",
            "user_profile",
            "pricing_settings",
            "reservation",
            "push_subscription",
        ] {
            assert!(
                sql.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                "missing table {}",
                table
            );
        }
    }
}
