use crate::{
    EngineError, Loan, LoanInput, LoanNumber, ResultEngine, repository::LoanRepository,
};

use super::LoanService;

impl<R: LoanRepository> LoanService<R> {
    /// Creates a new active loan.
    ///
    /// Fails with `Conflict` when an active loan already uses the number. A
    /// soft-deleted loan with the same number does not block creation; the
    /// new record gets its own id.
    pub async fn create_loan(&self, input: LoanInput) -> ResultEngine<Loan> {
        if self.active_loan(&input.loan_number).await?.is_some() {
            return Err(EngineError::loan_number_taken());
        }

        let loan = Loan::new(input);
        self.repository.create(&loan).await?;
        Ok(loan)
    }

    /// Replaces every field of an active loan but its id, number and state.
    ///
    /// The loan number is immutable: a payload carrying a different number
    /// is a `Conflict`, whether or not the target exists.
    pub async fn update_loan(&self, loan_number: &LoanNumber, input: LoanInput) -> ResultEngine<Loan> {
        if &input.loan_number != loan_number {
            return Err(EngineError::Conflict(
                "Loan number cannot be changed".to_string(),
            ));
        }

        let mut loan = self
            .active_loan(loan_number)
            .await?
            .ok_or_else(EngineError::loan_not_found)?;
        loan.apply(input);

        self.repository.update(loan_number, &loan).await?;
        Ok(loan)
    }

    /// Soft-deletes an active loan. One way: there is no reactivation.
    pub async fn deactivate_loan(&self, loan_number: &LoanNumber) -> ResultEngine<()> {
        if self.active_loan(loan_number).await?.is_none() {
            return Err(EngineError::loan_not_found());
        }
        self.repository.deactivate(loan_number).await
    }
}
