//! Deterministic demo data.
//!
//! Values are derived arithmetically from the index so that every run yields
//! the same book, and every generated loan satisfies the loan invariants.

use chrono::{Days, Months, NaiveDate};

use crate::{
    EngineError, LoanInput, LoanNumber, LoanService, Money, ResultEngine,
    repository::LoanRepository,
};

/// Number of loans seeded when nobody asks for a specific count.
pub const DEMO_LOAN_COUNT: u32 = 30;

/// Builds the `index`-th demo loan (`LN-001` for index 0).
pub fn demo_loan(index: u32) -> Option<LoanInput> {
    let i = i64::from(index);

    let amount = 50_000 + (i * 97_331) % 950_001;
    let term_months = 3 + (i * 17) % 178;
    let rate_percent = 4 + i % 9;
    let repayable = amount * (100 + rate_percent) / 100;
    let emi = ((repayable + term_months / 2) / term_months).max(500);
    let outstanding = amount * (20 + (i * 13) % 71) / 100;
    let overdue = if i % 2 == 0 {
        (amount * (i % 25) / 100).max(50).min(outstanding)
    } else {
        0
    };

    let anchor = NaiveDate::from_ymd_opt(2024, 1, 1)?;
    let start_date = anchor.checked_sub_days(Days::new(((i * 23) % 730) as u64))?;
    let end_date = start_date.checked_add_months(Months::new(term_months as u32))?;

    Some(LoanInput {
        loan_number: LoanNumber::from_index(index + 1),
        amount: Money::from_major(amount),
        start_date,
        end_date,
        emi: Money::from_major(emi),
        outstanding_amount: Money::from_major(outstanding),
        overdue_amount: Money::from_major(overdue),
    })
}

/// The first `count` demo loans.
pub fn demo_loans(count: u32) -> Vec<LoanInput> {
    (0..count).filter_map(demo_loan).collect()
}

/// Creates `count` demo loans through the service.
///
/// Numbers that are already taken by an active loan are skipped. Returns how
/// many loans were created.
pub async fn seed<R: LoanRepository>(service: &LoanService<R>, count: u32) -> ResultEngine<usize> {
    let mut created = 0;
    for input in demo_loans(count) {
        match service.create_loan(input).await {
            Ok(_) => created += 1,
            Err(EngineError::Conflict(_)) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_loans_respect_invariants() {
        let loans = demo_loans(200);
        assert_eq!(loans.len(), 200);
        for loan in loans {
            assert!(loan.emi.is_positive(), "{}", loan.loan_number);
            assert!(loan.emi <= loan.amount, "{}", loan.loan_number);
            assert!(!loan.outstanding_amount.is_negative());
            assert!(loan.outstanding_amount <= loan.amount);
            assert!(!loan.overdue_amount.is_negative());
            assert!(loan.overdue_amount <= loan.outstanding_amount);
            assert!(loan.start_date < loan.end_date);
        }
    }

    #[test]
    fn numbering_starts_at_one() {
        let loans = demo_loans(2);
        assert_eq!(loans[0].loan_number.as_str(), "LN-001");
        assert_eq!(loans[1].loan_number.as_str(), "LN-002");
    }

    #[test]
    fn demo_data_is_stable() {
        assert_eq!(demo_loan(4), demo_loan(4));
    }
}
