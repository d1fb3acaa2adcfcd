//! Migrate command - accounts schema management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Connect without the auto-migration the server startup does; each
    // action drives the migrator explicitly.
    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Applying pending migrations");
            db.run_migrations().await?;
            tracing::info!("Accounts schema is up to date");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back the last migration");
            db.rollback_migration().await?;
            tracing::info!("Rollback complete");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let marker = if applied { "[applied]" } else { "[pending]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping the accounts schema and re-running all migrations");
            db.fresh_migrations().await?;
            tracing::info!("Fresh accounts schema ready");
        }
    }

    Ok(())
}
