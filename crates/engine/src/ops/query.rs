use crate::{
    EngineError, Loan, LoanNumber, ResultEngine,
    repository::{LoanAggregates, LoanRepository, MAX_PAGE_SIZE, PageQuery, SortBy, SortDir},
};

use super::LoanService;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest offset storage accepts (SQL offsets are signed 64-bit).
const MAX_OFFSET: u64 = i64::MAX as u64;

/// What a caller asks of [`LoanService::loans`]. Missing values take defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoanListParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_by: Option<SortBy>,
    pub sort_dir: Option<SortDir>,
}

/// A page of active loans, with the page/page size actually applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoanListing {
    pub items: Vec<Loan>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<R: LoanRepository> LoanService<R> {
    /// Lists active loans a page at a time.
    ///
    /// `page` is clamped to `>= 1` and `page_size` to `[1, 50]`; sorting
    /// defaults to loan number ascending. Pages past the end are empty but
    /// still carry the total.
    pub async fn loans(&self, params: LoanListParams) -> ResultEngine<LoanListing> {
        let page = params.page.unwrap_or(1).max(1);
        let page_size = params
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let found = self
            .repository
            .find_page(PageQuery {
                limit: page_size,
                offset: (page - 1).saturating_mul(page_size).min(MAX_OFFSET),
                sort_by: params.sort_by.unwrap_or_default(),
                sort_dir: params.sort_dir.unwrap_or_default(),
            })
            .await?;

        Ok(LoanListing {
            items: found.items,
            total: found.total,
            page,
            page_size,
        })
    }

    /// Totals of amount, outstanding and overdue over active loans.
    pub async fn aggregates(&self) -> ResultEngine<LoanAggregates> {
        self.repository.aggregates().await
    }

    /// Returns the active loan with this number.
    pub async fn loan(&self, loan_number: &LoanNumber) -> ResultEngine<Loan> {
        self.active_loan(loan_number)
            .await?
            .ok_or_else(EngineError::loan_not_found)
    }

    pub(super) async fn active_loan(&self, loan_number: &LoanNumber) -> ResultEngine<Option<Loan>> {
        Ok(self
            .repository
            .find_by_loan_number(loan_number)
            .await?
            .filter(|loan| loan.is_active))
    }
}
