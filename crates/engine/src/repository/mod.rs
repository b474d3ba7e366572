//! Storage contract for loans and its implementations.
//!
//! [`LoanRepository`] is what the [`LoanService`](crate::LoanService) depends
//! on. Two variants satisfy it:
//!
//! - [`MemoryLoanRepository`]: a `Vec` behind a lock, used by tests and by the
//!   `memory` database setting.
//! - [`DbLoanRepository`]: the `loans` table through sea-orm.
//!
//! [`LoanStore`] wraps either one so binaries can pick at runtime.

use std::future::Future;

use sea_orm::DatabaseConnection;

use crate::{Loan, LoanNumber, Money, ResultEngine};

mod db;
mod memory;

pub use db::DbLoanRepository;
pub use memory::MemoryLoanRepository;

/// Upper bound for a page of results.
pub const MAX_PAGE_SIZE: u64 = 50;

/// Column a page of loans can be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    LoanNumber,
    Amount,
    OutstandingAmount,
    Emi,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// Parameters of [`LoanRepository::find_page`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u64,
    pub offset: u64,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
}

/// A slice of active loans plus the total number of active loans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoanPage {
    pub items: Vec<Loan>,
    pub total: u64,
}

/// Sums over active loans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoanAggregates {
    pub total_amount: Money,
    pub total_outstanding: Money,
    pub total_overdue: Money,
}

/// Persistence operations the service needs.
///
/// Each method is a single atomic statement against the store. Callers decide
/// active-only semantics for point lookups; everything else only sees active
/// rows.
pub trait LoanRepository: Send + Sync {
    /// Active loans ordered by `sort_by`/`sort_dir`, ties broken by loan
    /// number ascending.
    fn find_page(&self, query: PageQuery) -> impl Future<Output = ResultEngine<LoanPage>> + Send;

    fn aggregates(&self) -> impl Future<Output = ResultEngine<LoanAggregates>> + Send;

    /// Looks a loan up by number, active or not.
    ///
    /// When a number has been reused, the active record wins over
    /// soft-deleted ones, and among soft-deleted ones the most recent wins.
    fn find_by_loan_number(
        &self,
        loan_number: &LoanNumber,
    ) -> impl Future<Output = ResultEngine<Option<Loan>>> + Send;

    /// Inserts a fully formed record.
    ///
    /// Fails with `Conflict` when an active loan already uses the number.
    fn create(&self, loan: &Loan) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Replaces the mutable fields of the active loan with this number.
    fn update(
        &self,
        loan_number: &LoanNumber,
        loan: &Loan,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Soft-deletes the active loan with this number. Idempotent.
    fn deactivate(&self, loan_number: &LoanNumber)
    -> impl Future<Output = ResultEngine<()>> + Send;
}

/// Runtime choice between the repository variants.
#[derive(Debug)]
pub enum LoanStore {
    InMemory(MemoryLoanRepository),
    Persistent(DbLoanRepository),
}

impl LoanStore {
    pub fn memory() -> Self {
        Self::InMemory(MemoryLoanRepository::default())
    }

    pub fn database(db: DatabaseConnection) -> Self {
        Self::Persistent(DbLoanRepository::new(db))
    }
}

impl LoanRepository for LoanStore {
    async fn find_page(&self, query: PageQuery) -> ResultEngine<LoanPage> {
        match self {
            Self::InMemory(repo) => repo.find_page(query).await,
            Self::Persistent(repo) => repo.find_page(query).await,
        }
    }

    async fn aggregates(&self) -> ResultEngine<LoanAggregates> {
        match self {
            Self::InMemory(repo) => repo.aggregates().await,
            Self::Persistent(repo) => repo.aggregates().await,
        }
    }

    async fn find_by_loan_number(&self, loan_number: &LoanNumber) -> ResultEngine<Option<Loan>> {
        match self {
            Self::InMemory(repo) => repo.find_by_loan_number(loan_number).await,
            Self::Persistent(repo) => repo.find_by_loan_number(loan_number).await,
        }
    }

    async fn create(&self, loan: &Loan) -> ResultEngine<()> {
        match self {
            Self::InMemory(repo) => repo.create(loan).await,
            Self::Persistent(repo) => repo.create(loan).await,
        }
    }

    async fn update(&self, loan_number: &LoanNumber, loan: &Loan) -> ResultEngine<()> {
        match self {
            Self::InMemory(repo) => repo.update(loan_number, loan).await,
            Self::Persistent(repo) => repo.update(loan_number, loan).await,
        }
    }

    async fn deactivate(&self, loan_number: &LoanNumber) -> ResultEngine<()> {
        match self {
            Self::InMemory(repo) => repo.deactivate(loan_number).await,
            Self::Persistent(repo) => repo.deactivate(loan_number).await,
        }
    }
}
