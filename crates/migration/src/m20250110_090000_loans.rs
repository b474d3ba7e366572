//! Creates the `loans` table.
//!
//! Rows are never deleted: soft-deleted loans keep their row with
//! `is_active = false`. Loan numbers are unique among active rows only, which
//! a plain `UNIQUE` constraint cannot express, so the index is partial.

use sea_orm::{ConnectionTrait, DbErr, Statement};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Loans {
    Table,
    Id,
    LoanNumber,
    Amount,
    StartDate,
    EndDate,
    Emi,
    OutstandingAmount,
    OverdueAmount,
    IsActive,
}

const ACTIVE_LOAN_NUMBER_INDEX: &str = "idx-loans-active_loan_number";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Loans::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Loans::LoanNumber).string().not_null())
                    // Money columns hold minor units (laari).
                    .col(ColumnDef::new(Loans::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Loans::StartDate).date().not_null())
                    .col(ColumnDef::new(Loans::EndDate).date().not_null())
                    .col(ColumnDef::new(Loans::Emi).big_integer().not_null())
                    .col(
                        ColumnDef::new(Loans::OutstandingAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Loans::OverdueAmount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Loans::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-loans-loan_number")
                    .table(Loans::Table)
                    .col(Loans::LoanNumber)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        let backend = db.get_database_backend();
        db.execute(Statement::from_string(
            backend,
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{ACTIVE_LOAN_NUMBER_INDEX}\" ON loans (loan_number) WHERE is_active;"
            ),
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await?;
        Ok(())
    }
}
