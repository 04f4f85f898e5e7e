use anyhow::Context;
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use smart_inventory::{config, db, migrator::Migrator};

#[derive(Parser, Debug)]
#[command(
    name = "migration",
    about = "Apply, roll back or inspect the smart-inventory schema migrations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<MigrationCommand>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum MigrationCommand {
    /// Apply pending migrations (default)
    Up {
        /// Number of pending migrations to apply; all when omitted
        #[arg(short = 'n', long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(short = 'n', long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop every table and re-apply all migrations
    Fresh,
    /// Show which migrations have been applied
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("Connecting to database: {}", cfg.database_url());
    let pool = db::establish_connection_from_app_config(&cfg).await?;

    match cli.command.unwrap_or(MigrationCommand::Up { steps: None }) {
        MigrationCommand::Up { steps } => {
            Migrator::up(&pool, steps).await?;
            info!("Migration completed successfully");
        }
        MigrationCommand::Down { steps } => {
            Migrator::down(&pool, Some(steps)).await?;
            info!(steps, "Rolled back migrations");
        }
        MigrationCommand::Fresh => {
            Migrator::fresh(&pool).await?;
            info!("Schema dropped and re-created");
        }
        MigrationCommand::Status => {
            Migrator::status(&pool).await?;
        }
    }

    db::close_pool(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_up() {
        let cli = Cli::try_parse_from(["migration"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn down_rolls_back_one_step_by_default() {
        let cli = Cli::try_parse_from(["migration", "down"]).unwrap();
        assert_eq!(cli.command, Some(MigrationCommand::Down { steps: 1 }));
    }

    #[test]
    fn down_accepts_a_step_count() {
        let cli = Cli::try_parse_from(["migration", "down", "--steps", "3"]).unwrap();
        assert_eq!(cli.command, Some(MigrationCommand::Down { steps: 3 }));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["migration", "sideways"]).is_err());
    }
}
