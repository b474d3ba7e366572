//! Loan records: domain types, boundary validation, storage and the service
//! enforcing the lifecycle rules.
//!
//! The usual wiring is:
//!
//! ```rust
//! use engine::{LoanService, LoanStore};
//!
//! let service = LoanService::builder().repository(LoanStore::memory()).build();
//! # let _ = service;
//! ```

pub use currency::Currency;
pub use error::EngineError;
pub use loan_number::{InvalidLoanNumber, LoanNumber};
pub use loans::{Loan, LoanInput};
pub use money::{Money, ParseMoneyError};
pub use ops::{DEFAULT_PAGE_SIZE, LoanListParams, LoanListing, LoanService, LoanServiceBuilder};
pub use repository::{
    DbLoanRepository, LoanAggregates, LoanPage, LoanRepository, LoanStore, MAX_PAGE_SIZE,
    MemoryLoanRepository, PageQuery, SortBy, SortDir,
};

mod currency;
mod error;
mod loan_number;
mod loans;
mod money;
mod ops;
mod repository;
pub mod seed;
pub mod validation;

pub type ResultEngine<T> = Result<T, EngineError>;
