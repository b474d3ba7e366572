use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{
    Currency, EngineError, Loan, LoanListParams, LoanNumber, LoanService, LoanStore, SortBy,
    SortDir, seed, validation,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "loanbook_admin")]
#[command(about = "Admin utilities for Loanbook (seed and inspect loans)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./loanbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create demo loans `LN-001…`, skipping numbers already in use.
    Seed(SeedArgs),
    /// List active loans.
    List(ListArgs),
    /// Show one active loan.
    Show(LoanArgs),
    /// Soft-delete an active loan.
    Deactivate(LoanArgs),
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long, default_value_t = seed::DEMO_LOAN_COUNT)]
    count: u32,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    page: Option<u64>,
    #[arg(long)]
    page_size: Option<u64>,
    /// One of `loanNumber`, `amount`, `outstandingAmount`, `emi`.
    #[arg(long, value_parser = parse_sort_by)]
    sort_by: Option<SortBy>,
    /// `asc` or `desc`.
    #[arg(long, value_parser = parse_sort_dir)]
    sort_dir: Option<SortDir>,
}

#[derive(Args, Debug)]
struct LoanArgs {
    /// Loan number, e.g. `LN-001`.
    loan_number: String,
}

fn parse_sort_by(raw: &str) -> Result<SortBy, String> {
    match raw {
        "loanNumber" => Ok(SortBy::LoanNumber),
        "amount" => Ok(SortBy::Amount),
        "outstandingAmount" => Ok(SortBy::OutstandingAmount),
        "emi" => Ok(SortBy::Emi),
        other => Err(format!("unsupported sort column: {other}")),
    }
}

fn parse_sort_dir(raw: &str) -> Result<SortDir, String> {
    match raw {
        "asc" => Ok(SortDir::Asc),
        "desc" => Ok(SortDir::Desc),
        other => Err(format!("unsupported sort direction: {other}")),
    }
}

fn loan_number_or_exit(raw: &str) -> LoanNumber {
    match validation::validate_loan_number(raw) {
        Ok(number) => number,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

fn print_loan(loan: &Loan) {
    let money = |m: engine::Money| m.display(Currency::Mvr);
    println!("loan number:  {}", loan.loan_number);
    println!("id:           {}", loan.id);
    println!("amount:       {}", money(loan.amount));
    println!("period:       {} .. {}", loan.start_date, loan.end_date);
    println!("emi:          {}", money(loan.emi));
    println!("outstanding:  {}", money(loan.outstanding_amount));
    println!("overdue:      {}", money(loan.overdue_amount));
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let service = LoanService::builder()
        .repository(LoanStore::database(db))
        .build();

    match cli.command {
        Command::Seed(args) => {
            let created = seed::seed(&service, args.count).await?;
            println!("created {created} loans");
        }
        Command::List(args) => {
            if let Err(err) = validation::validate_list_query(args.page, args.page_size) {
                eprintln!("{err}");
                std::process::exit(2);
            }

            let listing = service
                .loans(LoanListParams {
                    page: args.page,
                    page_size: args.page_size,
                    sort_by: args.sort_by,
                    sort_dir: args.sort_dir,
                })
                .await?;

            for loan in &listing.items {
                println!(
                    "{:<10} {:>20} {:>20} {:>20}",
                    loan.loan_number.as_str(),
                    loan.amount.display(Currency::Mvr),
                    loan.outstanding_amount.display(Currency::Mvr),
                    loan.overdue_amount.display(Currency::Mvr),
                );
            }
            println!(
                "page {} ({} per page), {} active loans",
                listing.page, listing.page_size, listing.total
            );
        }
        Command::Show(args) => {
            let loan_number = loan_number_or_exit(&args.loan_number);
            match service.loan(&loan_number).await {
                Ok(loan) => print_loan(&loan),
                Err(EngineError::NotFound(_)) => {
                    eprintln!("loan not found: {loan_number}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Deactivate(args) => {
            let loan_number = loan_number_or_exit(&args.loan_number);
            match service.deactivate_loan(&loan_number).await {
                Ok(()) => println!("deactivated loan: {loan_number}"),
                Err(EngineError::NotFound(_)) => {
                    eprintln!("loan not found: {loan_number}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}
