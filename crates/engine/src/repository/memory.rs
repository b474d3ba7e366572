use std::cmp::Ordering;

use tokio::sync::RwLock;

use crate::{EngineError, Loan, LoanNumber, ResultEngine};

use super::{LoanAggregates, LoanPage, LoanRepository, PageQuery, SortBy, SortDir};

/// In-process loan store.
///
/// Rows are never removed; soft-deleted loans stay in the list with
/// `is_active == false`, as they would in the table.
#[derive(Debug, Default)]
pub struct MemoryLoanRepository {
    loans: RwLock<Vec<Loan>>,
}

impl MemoryLoanRepository {
    /// Builds a store that already contains `loans`.
    pub fn with_loans(loans: Vec<Loan>) -> Self {
        Self {
            loans: RwLock::new(loans),
        }
    }
}

fn compare(a: &Loan, b: &Loan, sort_by: SortBy, sort_dir: SortDir) -> Ordering {
    let primary = match sort_by {
        SortBy::LoanNumber => a.loan_number.cmp(&b.loan_number),
        SortBy::Amount => a.amount.cmp(&b.amount),
        SortBy::OutstandingAmount => a.outstanding_amount.cmp(&b.outstanding_amount),
        SortBy::Emi => a.emi.cmp(&b.emi),
    };
    let primary = match sort_dir {
        SortDir::Asc => primary,
        SortDir::Desc => primary.reverse(),
    };
    primary.then_with(|| a.loan_number.cmp(&b.loan_number))
}

impl LoanRepository for MemoryLoanRepository {
    async fn find_page(&self, query: PageQuery) -> ResultEngine<LoanPage> {
        let loans = self.loans.read().await;
        let mut active: Vec<&Loan> = loans.iter().filter(|l| l.is_active).collect();
        active.sort_by(|a, b| compare(a, b, query.sort_by, query.sort_dir));

        let total = active.len() as u64;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let items = active
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(LoanPage { items, total })
    }

    async fn aggregates(&self) -> ResultEngine<LoanAggregates> {
        let loans = self.loans.read().await;
        loans
            .iter()
            .filter(|l| l.is_active)
            .try_fold(LoanAggregates::default(), |acc, loan| {
                Some(LoanAggregates {
                    total_amount: acc.total_amount.checked_add(loan.amount)?,
                    total_outstanding: acc
                        .total_outstanding
                        .checked_add(loan.outstanding_amount)?,
                    total_overdue: acc.total_overdue.checked_add(loan.overdue_amount)?,
                })
            })
            .ok_or_else(EngineError::totals_overflow)
    }

    async fn find_by_loan_number(&self, loan_number: &LoanNumber) -> ResultEngine<Option<Loan>> {
        let loans = self.loans.read().await;
        let found = loans
            .iter()
            .filter(|l| &l.loan_number == loan_number)
            .max_by_key(|l| (l.is_active, l.id))
            .cloned();
        Ok(found)
    }

    async fn create(&self, loan: &Loan) -> ResultEngine<()> {
        let mut loans = self.loans.write().await;
        if loan.is_active
            && loans
                .iter()
                .any(|l| l.is_active && l.loan_number == loan.loan_number)
        {
            return Err(EngineError::loan_number_taken());
        }
        loans.push(loan.clone());
        Ok(())
    }

    async fn update(&self, loan_number: &LoanNumber, loan: &Loan) -> ResultEngine<()> {
        let mut loans = self.loans.write().await;
        if let Some(existing) = loans
            .iter_mut()
            .find(|l| l.is_active && &l.loan_number == loan_number)
        {
            existing.amount = loan.amount;
            existing.start_date = loan.start_date;
            existing.end_date = loan.end_date;
            existing.emi = loan.emi;
            existing.outstanding_amount = loan.outstanding_amount;
            existing.overdue_amount = loan.overdue_amount;
        }
        Ok(())
    }

    async fn deactivate(&self, loan_number: &LoanNumber) -> ResultEngine<()> {
        let mut loans = self.loans.write().await;
        loans
            .iter_mut()
            .filter(|l| &l.loan_number == loan_number)
            .for_each(|l| l.is_active = false);
        Ok(())
    }
}
