use engine::{LoanListParams, LoanService, LoanStore, seed};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "loanbook={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let store = match open_store(&server.database).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };
    let service = LoanService::builder().repository(store).build();

    if server.seed {
        seed_if_empty(&service).await?;
    }

    let addr = format!("{}:{}", server.bind, server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };

    server::run_with_listener(service, server.allowed_origins, listener).await?;
    Ok(())
}

async fn open_store(
    config: &Database,
) -> Result<LoanStore, Box<dyn std::error::Error + Send + Sync>> {
    let path = match config {
        Database::Memory => {
            tracing::info!("using in-memory loan store");
            return Ok(LoanStore::memory());
        }
        Database::Sqlite(path) => path,
    };

    tracing::info!("using sqlite loan store at {path}");
    let database = sea_orm::Database::connect(format!("sqlite:{}?mode=rwc", path)).await?;
    Migrator::up(&database, None).await?;
    Ok(LoanStore::database(database))
}

async fn seed_if_empty(
    service: &LoanService<LoanStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let existing = service.loans(LoanListParams::default()).await?;
    if existing.total > 0 {
        tracing::info!("skipping demo data, {} active loans found", existing.total);
        return Ok(());
    }

    let created = seed::seed(service, seed::DEMO_LOAN_COUNT).await?;
    tracing::info!("seeded {created} demo loans");
    Ok(())
}
