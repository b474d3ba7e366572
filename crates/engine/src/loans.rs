//! The module contains the `Loan` struct and its storage model.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, LoanNumber, Money, ResultEngine};

/// A loan facility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loan {
    /// Stable identifier for this record.
    ///
    /// A UUIDv7 generated at creation, so ids sort by creation time. A loan
    /// number reused after a soft-delete gets a fresh id.
    pub id: Uuid,
    pub loan_number: LoanNumber,
    /// Principal sanctioned.
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Periodic installment.
    pub emi: Money,
    pub outstanding_amount: Money,
    /// Portion of `outstanding_amount` that is past due.
    pub overdue_amount: Money,
    /// `false` once the loan has been soft-deleted.
    pub is_active: bool,
}

/// Everything a caller provides to create or update a loan.
///
/// `id` and `is_active` are owned by the engine and therefore absent. Values
/// are expected to be validated already (see [`crate::validation`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoanInput {
    pub loan_number: LoanNumber,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub emi: Money,
    pub outstanding_amount: Money,
    pub overdue_amount: Money,
}

impl Loan {
    /// Creates a new active loan with a freshly generated id.
    pub fn new(input: LoanInput) -> Self {
        Self::with_id(Uuid::now_v7(), input)
    }

    pub fn with_id(id: Uuid, input: LoanInput) -> Self {
        Self {
            id,
            loan_number: input.loan_number,
            amount: input.amount,
            start_date: input.start_date,
            end_date: input.end_date,
            emi: input.emi,
            outstanding_amount: input.outstanding_amount,
            overdue_amount: input.overdue_amount,
            is_active: true,
        }
    }

    /// Replaces every mutable field, keeping `id`, `loan_number` and `is_active`.
    pub fn apply(&mut self, input: LoanInput) {
        self.amount = input.amount;
        self.start_date = input.start_date;
        self.end_date = input.end_date;
        self.emi = input.emi;
        self.outstanding_amount = input.outstanding_amount;
        self.overdue_amount = input.overdue_amount;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub loan_number: String,
    pub amount: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub emi: i64,
    pub outstanding_amount: i64,
    pub overdue_amount: i64,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Loan> for ActiveModel {
    fn from(value: &Loan) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            loan_number: ActiveValue::Set(value.loan_number.to_string()),
            amount: ActiveValue::Set(value.amount.minor()),
            start_date: ActiveValue::Set(value.start_date),
            end_date: ActiveValue::Set(value.end_date),
            emi: ActiveValue::Set(value.emi.minor()),
            outstanding_amount: ActiveValue::Set(value.outstanding_amount.minor()),
            overdue_amount: ActiveValue::Set(value.overdue_amount.minor()),
            is_active: ActiveValue::Set(value.is_active),
        }
    }
}

impl TryFrom<Model> for Loan {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| DbErr::Custom(format!("invalid loan id: {}", model.id)))?;
        let loan_number = model
            .loan_number
            .parse::<LoanNumber>()
            .map_err(|_| DbErr::Custom(format!("invalid loan number: {}", model.loan_number)))?;

        Ok(Self {
            id,
            loan_number,
            amount: Money::new(model.amount),
            start_date: model.start_date,
            end_date: model.end_date,
            emi: Money::new(model.emi),
            outstanding_amount: Money::new(model.outstanding_amount),
            overdue_amount: Money::new(model.overdue_amount),
            is_active: model.is_active,
        })
    }
}
