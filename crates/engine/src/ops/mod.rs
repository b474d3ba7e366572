use crate::repository::LoanRepository;

mod query;
mod write;

pub use query::{DEFAULT_PAGE_SIZE, LoanListParams, LoanListing};

/// Business rules for loans on top of a [`LoanRepository`].
///
/// The service assumes its input has been validated at the boundary (see
/// [`crate::validation`]) and only enforces identity, existence, uniqueness
/// and lifecycle rules. Soft-deleted loans are invisible to every read and
/// write path.
#[derive(Debug)]
pub struct LoanService<R> {
    repository: R,
}

impl LoanService<()> {
    /// Return a builder for `LoanService`. Help to build the struct.
    pub fn builder() -> LoanServiceBuilder<()> {
        LoanServiceBuilder { repository: () }
    }
}

impl<R: LoanRepository> LoanService<R> {
    /// The repository the service writes through.
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

/// The builder for `LoanService`
pub struct LoanServiceBuilder<R> {
    repository: R,
}

impl<R> LoanServiceBuilder<R> {
    /// Pass the required repository
    pub fn repository<T: LoanRepository>(self, repository: T) -> LoanServiceBuilder<T> {
        LoanServiceBuilder { repository }
    }
}

impl<R: LoanRepository> LoanServiceBuilder<R> {
    /// Construct `LoanService`
    pub fn build(self) -> LoanService<R> {
        LoanService {
            repository: self.repository,
        }
    }
}
