use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[derive(Parser, Debug)]
#[command(name = "migration")]
#[command(about = "Apply or roll back the Loanbook schema")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./loanbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations (the default).
    Up {
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations, the last one unless `--steps` says otherwise.
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop every table, then apply all migrations.
    Fresh,
    /// Roll back all migrations.
    Reset,
    /// Print which migrations are applied.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command.unwrap_or(Command::Up { steps: None }) {
        Command::Up { steps } => Migrator::up(&db, steps).await?,
        Command::Down { steps } => Migrator::down(&db, Some(steps)).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Reset => Migrator::reset(&db).await?,
        Command::Status => Migrator::status(&db).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_up_on_the_local_database() {
        let cli = Cli::try_parse_from(["migration"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn down_rolls_back_one_step_by_default() {
        let cli = Cli::try_parse_from(["migration", "down"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Down { steps: 1 })));

        let cli = Cli::try_parse_from(["migration", "up", "--steps", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Up { steps: Some(2) })));
    }
}
