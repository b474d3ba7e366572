use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, SqlErr, sea_query::Expr,
};

use crate::{EngineError, Loan, LoanNumber, Money, ResultEngine, loans};

use super::{LoanAggregates, LoanPage, LoanRepository, PageQuery, SortBy, SortDir};

/// Loan store backed by the `loans` table.
///
/// Uniqueness of active loan numbers is enforced by the partial unique index
/// created in the migrations; a violation is reported as `Conflict`.
#[derive(Debug, Clone)]
pub struct DbLoanRepository {
    database: DatabaseConnection,
}

impl DbLoanRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    fn active() -> Select<loans::Entity> {
        loans::Entity::find().filter(loans::Column::IsActive.eq(true))
    }
}

/// SQLite aborts `SUM` over integers with this error instead of wrapping.
fn is_integer_overflow(err: &DbErr) -> bool {
    err.to_string().contains("integer overflow")
}

fn sort_column(sort_by: SortBy) -> loans::Column {
    match sort_by {
        SortBy::LoanNumber => loans::Column::LoanNumber,
        SortBy::Amount => loans::Column::Amount,
        SortBy::OutstandingAmount => loans::Column::OutstandingAmount,
        SortBy::Emi => loans::Column::Emi,
    }
}

fn sort_order(sort_dir: SortDir) -> Order {
    match sort_dir {
        SortDir::Asc => Order::Asc,
        SortDir::Desc => Order::Desc,
    }
}

impl LoanRepository for DbLoanRepository {
    async fn find_page(&self, query: PageQuery) -> ResultEngine<LoanPage> {
        let total = Self::active().count(&self.database).await?;

        let models = Self::active()
            .order_by(sort_column(query.sort_by), sort_order(query.sort_dir))
            .order_by_asc(loans::Column::LoanNumber)
            .limit(query.limit)
            .offset(query.offset)
            .all(&self.database)
            .await?;

        let items = models
            .into_iter()
            .map(Loan::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(LoanPage { items, total })
    }

    async fn aggregates(&self) -> ResultEngine<LoanAggregates> {
        let sums: Option<(Option<i64>, Option<i64>, Option<i64>)> = Self::active()
            .select_only()
            .column_as(loans::Column::Amount.sum(), "total_amount")
            .column_as(loans::Column::OutstandingAmount.sum(), "total_outstanding")
            .column_as(loans::Column::OverdueAmount.sum(), "total_overdue")
            .into_tuple()
            .one(&self.database)
            .await
            .map_err(|err| {
                if is_integer_overflow(&err) {
                    EngineError::totals_overflow()
                } else {
                    err.into()
                }
            })?;

        // SUM over zero rows is NULL.
        let (amount, outstanding, overdue) = sums.unwrap_or_default();
        Ok(LoanAggregates {
            total_amount: Money::new(amount.unwrap_or_default()),
            total_outstanding: Money::new(outstanding.unwrap_or_default()),
            total_overdue: Money::new(overdue.unwrap_or_default()),
        })
    }

    async fn find_by_loan_number(&self, loan_number: &LoanNumber) -> ResultEngine<Option<Loan>> {
        loans::Entity::find()
            .filter(loans::Column::LoanNumber.eq(loan_number.as_str()))
            .order_by_desc(loans::Column::IsActive)
            .order_by_desc(loans::Column::Id)
            .one(&self.database)
            .await?
            .map(Loan::try_from)
            .transpose()
    }

    async fn create(&self, loan: &Loan) -> ResultEngine<()> {
        match loans::ActiveModel::from(loan).insert(&self.database).await {
            Ok(_) => Ok(()),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(EngineError::loan_number_taken())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update(&self, loan_number: &LoanNumber, loan: &Loan) -> ResultEngine<()> {
        loans::Entity::update_many()
            .col_expr(loans::Column::Amount, Expr::value(loan.amount.minor()))
            .col_expr(loans::Column::StartDate, Expr::value(loan.start_date))
            .col_expr(loans::Column::EndDate, Expr::value(loan.end_date))
            .col_expr(loans::Column::Emi, Expr::value(loan.emi.minor()))
            .col_expr(
                loans::Column::OutstandingAmount,
                Expr::value(loan.outstanding_amount.minor()),
            )
            .col_expr(
                loans::Column::OverdueAmount,
                Expr::value(loan.overdue_amount.minor()),
            )
            .filter(loans::Column::LoanNumber.eq(loan_number.as_str()))
            .filter(loans::Column::IsActive.eq(true))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn deactivate(&self, loan_number: &LoanNumber) -> ResultEngine<()> {
        loans::Entity::update_many()
            .col_expr(loans::Column::IsActive, Expr::value(false))
            .filter(loans::Column::LoanNumber.eq(loan_number.as_str()))
            .filter(loans::Column::IsActive.eq(true))
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
